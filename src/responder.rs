//! Forum responder - answers new questions once and replies again when mentioned.

mod bookkeeping;
mod intake;
mod locks;
mod mention;
mod reply;
mod scan;

#[cfg(test)]
mod fake;

use chrono::{Local, NaiveDateTime};
use log::{debug, error};
use poise::serenity_prelude::{ChannelId, ForumTagId};

use crate::config::Config;
use crate::platform::{CompletionProvider, ForumPlatform, ThreadSnapshot};
use crate::schedule::is_allowed_time;

pub use intake::IntakeOutcome;
pub use mention::build_transcript;

use locks::ThreadLocks;

/// Source of the current local time.
pub type Clock = fn() -> NaiveDateTime;

pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Channel and tag ids the responder works with.
#[derive(Debug, Clone, Copy)]
pub struct ResponderSettings {
    pub question_channel_id: ChannelId,
    pub ai_replied_tag_id: ForumTagId,
    pub human_replied_tag_id: ForumTagId,
}

impl From<&Config> for ResponderSettings {
    fn from(config: &Config) -> Self {
        Self {
            question_channel_id: config.question_channel_id,
            ai_replied_tag_id: config.ai_replied_tag_id,
            human_replied_tag_id: config.human_replied_tag_id,
        }
    }
}

/// A message posted somewhere the bot can see.
#[derive(Debug, Clone, Copy)]
pub struct PostedMessage {
    pub channel_id: ChannelId,
    pub author_is_bot: bool,
    pub mentions_bot: bool,
}

pub struct ResponderWorkflow<P, C> {
    platform: P,
    provider: C,
    settings: ResponderSettings,
    clock: Clock,
    locks: ThreadLocks,
}

impl<P: ForumPlatform, C: CompletionProvider> ResponderWorkflow<P, C> {
    pub fn new(platform: P, provider: C, settings: ResponderSettings, clock: Clock) -> Self {
        Self {
            platform,
            provider,
            settings,
            clock,
            locks: ThreadLocks::default(),
        }
    }

    fn allowed_now(&self) -> bool {
        is_allowed_time(&(self.clock)())
    }

    fn is_question_thread(&self, thread: &ThreadSnapshot) -> bool {
        thread.parent_id == Some(self.settings.question_channel_id)
    }

    /// Entry point for newly created threads.
    pub async fn on_thread_created(&self, thread: ThreadSnapshot) {
        if !self.allowed_now() {
            debug!("Outside posting hours, ignoring new thread {}", thread.id);
            return;
        }
        if !self.is_question_thread(&thread) {
            return;
        }
        if thread.has_tag(self.settings.ai_replied_tag_id) {
            debug!("Thread {} already answered", thread.id);
            return;
        }
        self.handle_thread(thread.id).await;
    }

    /// Entry point for every new message.
    pub async fn on_message(&self, message: PostedMessage) {
        if message.author_is_bot {
            return;
        }

        let thread = match self.platform.thread(message.channel_id).await {
            Ok(Some(thread)) => thread,
            Ok(None) => return,
            Err(e) => {
                error!(
                    "Failed to resolve channel {} for new message: {}",
                    message.channel_id, e
                );
                return;
            }
        };

        if message.mentions_bot {
            self.reply_to_mention(&thread).await;
        } else {
            self.mark_human_replied(&thread).await;
        }
    }
}

//! First answer for a question thread.

use log::{debug, error, info};
use poise::serenity_prelude::ChannelId;

use crate::error::Result;
use crate::platform::{CompletionProvider, ForumPlatform};

use super::ResponderWorkflow;

/// The question is expected among the first few messages of a thread.
const INTAKE_MESSAGE_LIMIT: u8 = 10;

/// What happened to a thread passed to [`ResponderWorkflow::handle_thread`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeOutcome {
    Replied,
    AlreadyReplied,
    NotAThread,
    NoHumanMessage,
    /// The question has no text, e.g. an attachment-only post.
    EmptyQuestion,
    NoReply,
    Failed,
}

impl<P: ForumPlatform, C: CompletionProvider> ResponderWorkflow<P, C> {
    /// Answers the first human message of `thread` once and tags the thread.
    ///
    /// Errors are logged here so that one thread never affects another.
    pub async fn handle_thread(&self, thread: ChannelId) -> IntakeOutcome {
        match self.take_in_thread(thread).await {
            Ok(outcome) => {
                debug!("Intake of thread {thread} finished: {outcome:?}");
                outcome
            }
            Err(e) => {
                error!("Failed to handle thread {thread}: {e}");
                IntakeOutcome::Failed
            }
        }
    }

    async fn take_in_thread(&self, thread_id: ChannelId) -> Result<IntakeOutcome> {
        let _guard = self.locks.lock(thread_id).await;

        // Tags may have changed since the caller looked at them.
        let Some(thread) = self.platform.thread(thread_id).await? else {
            return Ok(IntakeOutcome::NotAThread);
        };
        if thread.has_tag(self.settings.ai_replied_tag_id) {
            return Ok(IntakeOutcome::AlreadyReplied);
        }

        let messages = self
            .platform
            .recent_messages(thread_id, INTAKE_MESSAGE_LIMIT)
            .await?;
        let Some(question) = messages.into_iter().rev().find(|m| !m.author_is_bot) else {
            return Ok(IntakeOutcome::NoHumanMessage);
        };
        if question.content.trim().is_empty() {
            debug!("First message {} in thread {} has no text", question.id, thread_id);
            return Ok(IntakeOutcome::EmptyQuestion);
        }

        info!(
            "Generating answer for thread {} from {}: {}",
            thread_id, question.author_name, question.content
        );
        let Some(reply) = self.generate_reply(&question.content).await else {
            return Ok(IntakeOutcome::NoReply);
        };

        self.platform.send_message(thread_id, &reply).await?;
        self.platform
            .set_applied_tags(thread_id, thread.tags_with(self.settings.ai_replied_tag_id))
            .await?;
        info!("Answered thread {thread_id}");

        Ok(IntakeOutcome::Replied)
    }
}

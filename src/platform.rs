//! Seams between the responder and the services it drives.
//!
//! The responder only talks to Discord through [`ForumPlatform`] and to the
//! language model through [`CompletionProvider`], so both can be swapped for
//! in-memory fakes.

use std::future::Future;

use poise::serenity_prelude::{ChannelId, ForumTagId, MessageId};

use crate::error::Result;

/// Snapshot of a forum thread as last read from the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadSnapshot {
    pub id: ChannelId,
    pub parent_id: Option<ChannelId>,
    pub applied_tags: Vec<ForumTagId>,
}

impl ThreadSnapshot {
    pub fn has_tag(&self, tag: ForumTagId) -> bool {
        self.applied_tags.contains(&tag)
    }

    /// Current tags plus `tag`, keeping the existing order.
    pub fn tags_with(&self, tag: ForumTagId) -> Vec<ForumTagId> {
        let mut tags = self.applied_tags.clone();
        if !tags.contains(&tag) {
            tags.push(tag);
        }
        tags
    }
}

/// A message read from a thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadMessage {
    pub id: MessageId,
    pub author_name: String,
    pub author_is_bot: bool,
    pub content: String,
}

/// Input for one completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyRequest {
    pub system_prompt: String,
    pub user_text: String,
}

/// Chat platform operations used by the responder.
pub trait ForumPlatform: Send + Sync + 'static {
    /// Whether `channel` exists and is a forum channel.
    fn is_forum_channel(&self, channel: ChannelId) -> impl Future<Output = Result<bool>> + Send;

    /// Active (non-archived) threads whose parent is `channel`.
    fn active_threads(
        &self,
        channel: ChannelId,
    ) -> impl Future<Output = Result<Vec<ThreadSnapshot>>> + Send;

    /// Fresh snapshot of `channel`, or `None` when it is not a thread.
    fn thread(
        &self,
        channel: ChannelId,
    ) -> impl Future<Output = Result<Option<ThreadSnapshot>>> + Send;

    /// Up to `limit` messages of `thread`, most recent first.
    fn recent_messages(
        &self,
        thread: ChannelId,
        limit: u8,
    ) -> impl Future<Output = Result<Vec<ThreadMessage>>> + Send;

    fn send_message(&self, thread: ChannelId, text: &str)
    -> impl Future<Output = Result<()>> + Send;

    /// Replaces the applied tags of `thread`.
    fn set_applied_tags(
        &self,
        thread: ChannelId,
        tags: Vec<ForumTagId>,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Language model completion operations used by the responder.
pub trait CompletionProvider: Send + Sync + 'static {
    /// Returns the generated text. Quota exhaustion surfaces as
    /// [`BotError::QuotaExhausted`](crate::error::BotError::QuotaExhausted).
    fn complete(&self, request: ReplyRequest) -> impl Future<Output = Result<String>> + Send;
}

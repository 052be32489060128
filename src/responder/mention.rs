//! Follow-up replies when a human mentions the bot in a thread.

use log::{debug, error, info};

use crate::error::Result;
use crate::persona::mention_reply;
use crate::platform::{CompletionProvider, ForumPlatform, ThreadMessage, ThreadSnapshot};

use super::ResponderWorkflow;

/// Discord returns at most 100 messages per request.
const TRANSCRIPT_MESSAGE_LIMIT: u8 = 100;

/// Builds a chronological `author: content` transcript of the human messages.
///
/// `messages` are expected most recent first, as the platform returns them.
pub fn build_transcript(messages: &[ThreadMessage]) -> String {
    messages
        .iter()
        .rev()
        .filter(|m| !m.author_is_bot)
        .map(|m| format!("{}: {}", m.author_name, m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

impl<P: ForumPlatform, C: CompletionProvider> ResponderWorkflow<P, C> {
    pub(super) async fn reply_to_mention(&self, thread: &ThreadSnapshot) {
        if !self.allowed_now() {
            debug!("Outside posting hours, ignoring mention in thread {}", thread.id);
            return;
        }
        info!("Mentioned in thread {}", thread.id);

        if let Err(e) = self.send_mention_reply(thread).await {
            error!("Failed to reply to mention in thread {}: {}", thread.id, e);
        }
    }

    async fn send_mention_reply(&self, thread: &ThreadSnapshot) -> Result<()> {
        let messages = self
            .platform
            .recent_messages(thread.id, TRANSCRIPT_MESSAGE_LIMIT)
            .await?;
        let transcript = build_transcript(&messages);
        debug!(
            "Transcript for thread {} has {} lines",
            thread.id,
            transcript.lines().count()
        );

        let Some(reply) = self.generate_reply(&transcript).await else {
            return Ok(());
        };

        self.platform
            .send_message(thread.id, &mention_reply(&reply))
            .await?;
        info!("Replied to mention in thread {}", thread.id);
        Ok(())
    }
}

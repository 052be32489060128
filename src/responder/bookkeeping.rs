//! Human-replied tag bookkeeping.

use log::{error, info};

use crate::error::Result;
use crate::platform::{CompletionProvider, ForumPlatform, ThreadSnapshot};

use super::ResponderWorkflow;

impl<P: ForumPlatform, C: CompletionProvider> ResponderWorkflow<P, C> {
    /// Tags a question thread as human-replied. Runs at any hour.
    ///
    /// Threads outside the question channel are skipped: the tag only exists
    /// in that forum.
    pub(super) async fn mark_human_replied(&self, thread: &ThreadSnapshot) {
        if !self.is_question_thread(thread) || thread.has_tag(self.settings.human_replied_tag_id) {
            return;
        }
        if let Err(e) = self.add_human_replied_tag(thread).await {
            error!("Failed to tag thread {} as human-replied: {}", thread.id, e);
        }
    }

    async fn add_human_replied_tag(&self, thread: &ThreadSnapshot) -> Result<()> {
        let _guard = self.locks.lock(thread.id).await;

        let Some(current) = self.platform.thread(thread.id).await? else {
            return Ok(());
        };
        let tag = self.settings.human_replied_tag_id;
        if current.has_tag(tag) {
            return Ok(());
        }

        self.platform
            .set_applied_tags(current.id, current.tags_with(tag))
            .await?;
        info!("Tagged thread {} as human-replied", current.id);
        Ok(())
    }
}

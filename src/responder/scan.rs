use log::{debug, info, warn};

use crate::error::Result;
use crate::platform::{CompletionProvider, ForumPlatform};

use super::{IntakeOutcome, ResponderWorkflow};

impl<P: ForumPlatform, C: CompletionProvider> ResponderWorkflow<P, C> {
    /// Answers every active, unanswered thread in the question channel.
    ///
    /// Returns how many threads received a reply. Skipped entirely outside
    /// posting hours.
    pub async fn startup_scan(&self) -> Result<usize> {
        if !self.allowed_now() {
            info!("Outside posting hours, skipping startup scan");
            return Ok(0);
        }

        let channel = self.settings.question_channel_id;
        if !self.platform.is_forum_channel(channel).await? {
            warn!("Channel {channel} is not a forum channel, skipping startup scan");
            return Ok(0);
        }

        let threads = self.platform.active_threads(channel).await?;
        debug!("Startup scan found {} active threads", threads.len());

        let mut replied = 0;
        for thread in threads {
            if thread.has_tag(self.settings.ai_replied_tag_id) {
                continue;
            }
            if self.handle_thread(thread.id).await == IntakeOutcome::Replied {
                replied += 1;
            }
        }

        info!("Startup scan answered {replied} threads");
        Ok(replied)
    }
}

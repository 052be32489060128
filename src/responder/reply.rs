//! Persona-wrapped reply generation.

use log::{debug, error, info, warn};

use crate::error::BotError;
use crate::persona::SYSTEM_PROMPT;
use crate::platform::{CompletionProvider, ForumPlatform, ReplyRequest};

use super::ResponderWorkflow;

impl<P: ForumPlatform, C: CompletionProvider> ResponderWorkflow<P, C> {
    /// Generates a persona reply for `text`.
    ///
    /// Returns `None` when the provider is out of quota, fails, or produces
    /// nothing; callers treat all three as "no reply this time".
    pub async fn generate_reply(&self, text: &str) -> Option<String> {
        let request = ReplyRequest {
            system_prompt: SYSTEM_PROMPT.to_string(),
            user_text: text.to_string(),
        };
        debug!("Generating reply for {} characters of input", text.len());

        match self.provider.complete(request).await {
            Ok(reply) if reply.trim().is_empty() => {
                warn!("Completion returned an empty reply");
                None
            }
            Ok(reply) => Some(reply),
            Err(BotError::QuotaExhausted) => {
                info!("OpenAI quota exhausted, skipping reply");
                None
            }
            Err(e) => {
                error!("Failed to generate reply: {e}");
                None
            }
        }
    }
}

//! Common types used throughout the cosmobot crate.

use serde::Serialize;

/// Role of a message in a chat completion request.
///
/// Maps to `OpenAI` API message roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the human user
    User,
    /// System prompt or instructions
    System,
}

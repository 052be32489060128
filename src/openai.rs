use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{BotError, Result};
use crate::platform::{CompletionProvider, ReplyRequest};
use crate::types::MessageRole;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

// Replies are meant to be 3-6 sentences, well under Discord's 2000 character limit.
const MAX_TOKENS: u32 = 400;

const TEMPERATURE: f32 = 0.4;

const QUOTA_ERROR_CODE: &str = "insufficient_quota";

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    temperature: f32,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: MessageRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

// The role of a choice is always "assistant"; only the text matters.
#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: Option<String>,
    #[serde(default, rename = "type")]
    error_type: Option<String>,
}

/// Returns true when an error body reports that the account is out of quota.
fn is_quota_error(body: &str) -> bool {
    serde_json::from_str::<ErrorResponse>(body).is_ok_and(|response| {
        response.error.code.as_deref() == Some(QUOTA_ERROR_CODE)
            || response.error.error_type.as_deref() == Some(QUOTA_ERROR_CODE)
    })
}

fn build_request(model: &str, request: ReplyRequest) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: model.to_string(),
        temperature: TEMPERATURE,
        max_tokens: MAX_TOKENS,
        messages: vec![
            Message {
                role: MessageRole::System,
                content: Some(request.system_prompt),
            },
            Message {
                role: MessageRole::User,
                content: Some(request.user_text),
            },
        ],
    }
}

pub struct OpenAiClient {
    api_key: String,
    client: reqwest::Client,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            model,
        }
    }

    pub async fn chat(&self, request: ReplyRequest) -> Result<String> {
        let request = build_request(&self.model, request);
        debug!(
            "Sending request to OpenAI API with {} messages (model {})",
            request.messages.len(),
            request.model
        );

        let response = self
            .client
            .post(OPENAI_API_URL)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {e}"));
            if is_quota_error(&message) {
                return Err(BotError::QuotaExhausted);
            }
            return Err(BotError::OpenAiApi { status, message });
        }

        let api_response: ChatCompletionResponse = response.json().await?;

        let reply = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| BotError::OpenAiResponse("No choices in response".to_string()))?
            .message
            .content
            .unwrap_or_default();

        debug!("Received response from OpenAI API");
        Ok(reply)
    }
}

impl CompletionProvider for OpenAiClient {
    async fn complete(&self, request: ReplyRequest) -> Result<String> {
        self.chat(request).await
    }
}

use std::env::{self, VarError};

use log::{debug, error, info};
use poise::serenity_prelude::{ChannelId, ForumTagId};

use crate::error::{BotError, Result};

const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub question_channel_id: ChannelId,
    pub ai_replied_tag_id: ForumTagId,
    pub human_replied_tag_id: ForumTagId,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        debug!("Loading configuration from environment");
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key))
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> std::result::Result<String, VarError>,
    {
        let require = |key: &str| {
            lookup(key).map_err(|e| {
                error!("Failed to load {key} from environment: {e}");
                BotError::EnvVar(e)
            })
        };

        let discord_token = require("DISCORD_TOKEN")?;
        let openai_api_key = require("OPENAI_API_KEY")?;
        let openai_model = match lookup("OPENAI_MODEL") {
            Ok(model) if !model.trim().is_empty() => model,
            _ => DEFAULT_OPENAI_MODEL.to_string(),
        };

        let question_channel_id =
            ChannelId::new(parse_id("QUESTION_CHANNEL_ID", &require("QUESTION_CHANNEL_ID")?)?);
        let ai_replied_tag_id =
            ForumTagId::new(parse_id("AI_REPLIED_TAG_ID", &require("AI_REPLIED_TAG_ID")?)?);
        let human_replied_tag_id = ForumTagId::new(parse_id(
            "HUMAN_REPLIED_TAG_ID",
            &require("HUMAN_REPLIED_TAG_ID")?,
        )?);

        if ai_replied_tag_id == human_replied_tag_id {
            error!("AI_REPLIED_TAG_ID and HUMAN_REPLIED_TAG_ID must differ");
            return Err(BotError::Config(
                "AI_REPLIED_TAG_ID and HUMAN_REPLIED_TAG_ID point to the same tag".to_string(),
            ));
        }

        info!("Configuration loaded successfully");
        debug!("Discord token length: {} characters", discord_token.len());
        debug!(
            "OpenAI API key length: {} characters",
            openai_api_key.len()
        );
        debug!("OpenAI model: {openai_model}");
        debug!("Question channel: {question_channel_id}");
        debug!("AI-replied tag: {ai_replied_tag_id}, human-replied tag: {human_replied_tag_id}");

        Ok(Self {
            discord_token,
            openai_api_key,
            openai_model,
            question_channel_id,
            ai_replied_tag_id,
            human_replied_tag_id,
        })
    }
}

/// Parses a Discord snowflake. Zero is rejected since serenity ids are non-zero.
fn parse_id(key: &str, value: &str) -> Result<u64> {
    match value.trim().parse::<u64>() {
        Ok(id) if id != 0 => Ok(id),
        _ => {
            error!("{key} is not a valid Discord id: {value:?}");
            Err(BotError::Config(format!(
                "{key} must be a non-zero numeric Discord id"
            )))
        }
    }
}

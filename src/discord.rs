//! Discord implementation of [`ForumPlatform`] on top of the serenity HTTP client.

use std::sync::Arc;

use log::debug;
use poise::serenity_prelude::{
    Channel, ChannelId, ChannelType, EditThread, ForumTagId, GetMessages, GuildChannel, Http,
    Message as SerenityMessage,
};

use crate::error::Result;
use crate::platform::{ForumPlatform, ThreadMessage, ThreadSnapshot};

pub struct DiscordPlatform {
    http: Arc<Http>,
}

impl DiscordPlatform {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    async fn guild_channel(&self, channel: ChannelId) -> Result<Option<GuildChannel>> {
        match channel.to_channel(self.http.as_ref()).await? {
            Channel::Guild(guild_channel) => Ok(Some(guild_channel)),
            _ => Ok(None),
        }
    }
}

fn is_thread(channel: &GuildChannel) -> bool {
    matches!(
        channel.kind,
        ChannelType::PublicThread | ChannelType::PrivateThread | ChannelType::NewsThread
    )
}

fn is_archived(channel: &GuildChannel) -> bool {
    channel
        .thread_metadata
        .as_ref()
        .is_some_and(|metadata| metadata.archived)
}

/// Converts a gateway thread payload into a snapshot.
pub fn thread_snapshot(channel: &GuildChannel) -> ThreadSnapshot {
    ThreadSnapshot {
        id: channel.id,
        parent_id: channel.parent_id,
        applied_tags: channel.applied_tags.clone(),
    }
}

fn thread_message(message: &SerenityMessage) -> ThreadMessage {
    ThreadMessage {
        id: message.id,
        author_name: message.author.name.clone(),
        author_is_bot: message.author.bot,
        content: message.content.clone(),
    }
}

impl ForumPlatform for DiscordPlatform {
    async fn is_forum_channel(&self, channel: ChannelId) -> Result<bool> {
        Ok(self
            .guild_channel(channel)
            .await?
            .is_some_and(|c| c.kind == ChannelType::Forum))
    }

    async fn active_threads(&self, channel: ChannelId) -> Result<Vec<ThreadSnapshot>> {
        let Some(forum) = self.guild_channel(channel).await? else {
            return Ok(Vec::new());
        };

        let data = forum.guild_id.get_active_threads(self.http.as_ref()).await?;
        let threads: Vec<ThreadSnapshot> = data
            .threads
            .iter()
            .filter(|thread| thread.parent_id == Some(channel) && !is_archived(thread))
            .map(thread_snapshot)
            .collect();

        debug!(
            "Found {} active threads in channel {} ({} guild-wide)",
            threads.len(),
            channel,
            data.threads.len()
        );
        Ok(threads)
    }

    async fn thread(&self, channel: ChannelId) -> Result<Option<ThreadSnapshot>> {
        Ok(self
            .guild_channel(channel)
            .await?
            .filter(is_thread)
            .as_ref()
            .map(thread_snapshot))
    }

    async fn recent_messages(&self, thread: ChannelId, limit: u8) -> Result<Vec<ThreadMessage>> {
        let messages = thread
            .messages(self.http.as_ref(), GetMessages::new().limit(limit))
            .await?;
        debug!("Fetched {} messages from thread {}", messages.len(), thread);
        Ok(messages.iter().map(thread_message).collect())
    }

    async fn send_message(&self, thread: ChannelId, text: &str) -> Result<()> {
        thread.say(self.http.as_ref(), text).await?;
        Ok(())
    }

    async fn set_applied_tags(&self, thread: ChannelId, tags: Vec<ForumTagId>) -> Result<()> {
        thread
            .edit_thread(self.http.as_ref(), EditThread::new().applied_tags(tags))
            .await?;
        Ok(())
    }
}

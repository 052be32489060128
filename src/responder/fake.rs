//! In-memory platform and provider used by the responder tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use chrono::{NaiveDate, NaiveDateTime};
use poise::serenity_prelude::{ChannelId, ForumTagId, MessageId};

use crate::error::{BotError, Result};
use crate::platform::{CompletionProvider, ForumPlatform, ReplyRequest, ThreadMessage, ThreadSnapshot};

use super::{Clock, ResponderSettings, ResponderWorkflow};

pub const FORUM: u64 = 1;
pub const AI_TAG: ForumTagId = ForumTagId::new(100);
pub const HUMAN_TAG: ForumTagId = ForumTagId::new(200);
pub const OTHER_TAG: ForumTagId = ForumTagId::new(300);

/// Wednesday 2026-10-21 10:00.
pub fn wednesday_morning() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 21)
        .and_then(|d| d.and_hms_opt(10, 0, 0))
        .expect("valid datetime")
}

pub fn settings() -> ResponderSettings {
    ResponderSettings {
        question_channel_id: ChannelId::new(FORUM),
        ai_replied_tag_id: AI_TAG,
        human_replied_tag_id: HUMAN_TAG,
    }
}

pub fn workflow_at(
    platform: FakePlatform,
    provider: ScriptedProvider,
    clock: Clock,
) -> ResponderWorkflow<FakePlatform, ScriptedProvider> {
    ResponderWorkflow::new(platform, provider, settings(), clock)
}

#[derive(Default)]
struct PlatformState {
    forums: HashSet<ChannelId>,
    threads: HashMap<ChannelId, ThreadSnapshot>,
    archived: HashSet<ChannelId>,
    // chronological
    messages: HashMap<ChannelId, Vec<ThreadMessage>>,
    sent: Vec<(ChannelId, String)>,
    tag_updates: Vec<(ChannelId, Vec<ForumTagId>)>,
    failing_fetches: HashSet<ChannelId>,
    next_message_id: u64,
}

pub struct FakePlatform {
    state: Mutex<PlatformState>,
}

impl FakePlatform {
    pub fn new() -> Self {
        let platform = Self {
            state: Mutex::new(PlatformState::default()),
        };
        platform.state().forums.insert(ChannelId::new(FORUM));
        platform
    }

    fn state(&self) -> std::sync::MutexGuard<'_, PlatformState> {
        self.state.lock().expect("fake platform state poisoned")
    }

    pub fn add_thread(&self, id: u64, tags: &[ForumTagId]) -> ThreadSnapshot {
        self.add_thread_in(id, FORUM, tags)
    }

    pub fn add_thread_in(&self, id: u64, parent: u64, tags: &[ForumTagId]) -> ThreadSnapshot {
        let thread = ThreadSnapshot {
            id: ChannelId::new(id),
            parent_id: Some(ChannelId::new(parent)),
            applied_tags: tags.to_vec(),
        };
        self.state().threads.insert(thread.id, thread.clone());
        thread
    }

    pub fn archive(&self, id: u64) {
        self.state().archived.insert(ChannelId::new(id));
    }

    pub fn make_not_forum(&self) {
        self.state().forums.clear();
    }

    pub fn fail_fetches_for(&self, id: u64) {
        self.state().failing_fetches.insert(ChannelId::new(id));
    }

    pub fn push_message(&self, thread: u64, author: &str, is_bot: bool, content: &str) {
        let mut state = self.state();
        state.next_message_id += 1;
        let message = ThreadMessage {
            id: MessageId::new(state.next_message_id),
            author_name: author.to_string(),
            author_is_bot: is_bot,
            content: content.to_string(),
        };
        state
            .messages
            .entry(ChannelId::new(thread))
            .or_default()
            .push(message);
    }

    pub fn sent(&self) -> Vec<(ChannelId, String)> {
        self.state().sent.clone()
    }

    pub fn tag_updates(&self) -> Vec<(ChannelId, Vec<ForumTagId>)> {
        self.state().tag_updates.clone()
    }

    pub fn tags_of(&self, id: u64) -> Vec<ForumTagId> {
        self.state()
            .threads
            .get(&ChannelId::new(id))
            .map(|t| t.applied_tags.clone())
            .unwrap_or_default()
    }

    fn lookup_failure(channel: ChannelId) -> BotError {
        BotError::Config(format!("fake lookup failure for {channel}"))
    }
}

impl ForumPlatform for FakePlatform {
    async fn is_forum_channel(&self, channel: ChannelId) -> Result<bool> {
        Ok(self.state().forums.contains(&channel))
    }

    async fn active_threads(&self, channel: ChannelId) -> Result<Vec<ThreadSnapshot>> {
        let state = self.state();
        let mut threads: Vec<ThreadSnapshot> = state
            .threads
            .values()
            .filter(|t| t.parent_id == Some(channel) && !state.archived.contains(&t.id))
            .cloned()
            .collect();
        threads.sort_by_key(|t| t.id);
        Ok(threads)
    }

    async fn thread(&self, channel: ChannelId) -> Result<Option<ThreadSnapshot>> {
        let thread = self.state().threads.get(&channel).cloned();
        // A real tag read is a network call; other handlers may run meanwhile.
        tokio::task::yield_now().await;
        Ok(thread)
    }

    async fn recent_messages(&self, thread: ChannelId, limit: u8) -> Result<Vec<ThreadMessage>> {
        let state = self.state();
        if state.failing_fetches.contains(&thread) {
            return Err(Self::lookup_failure(thread));
        }
        Ok(state
            .messages
            .get(&thread)
            .map(|messages| {
                messages
                    .iter()
                    .rev()
                    .take(usize::from(limit))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn send_message(&self, thread: ChannelId, text: &str) -> Result<()> {
        self.state().sent.push((thread, text.to_string()));
        Ok(())
    }

    async fn set_applied_tags(&self, thread: ChannelId, tags: Vec<ForumTagId>) -> Result<()> {
        let mut state = self.state();
        if let Some(snapshot) = state.threads.get_mut(&thread) {
            snapshot.applied_tags.clone_from(&tags);
        }
        state.tag_updates.push((thread, tags));
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum ProviderBehavior {
    Reply(String),
    QuotaExhausted,
    Fail,
}

pub struct ScriptedProvider {
    behavior: ProviderBehavior,
    requests: Mutex<Vec<ReplyRequest>>,
}

impl ScriptedProvider {
    pub fn new(behavior: ProviderBehavior) -> Self {
        Self {
            behavior,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ReplyRequest> {
        self.requests
            .lock()
            .expect("provider requests poisoned")
            .clone()
    }
}

impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, request: ReplyRequest) -> Result<String> {
        self.requests
            .lock()
            .expect("provider requests poisoned")
            .push(request);
        // Let concurrently polled handlers interleave like real network calls would.
        tokio::task::yield_now().await;
        match &self.behavior {
            ProviderBehavior::Reply(text) => Ok(text.clone()),
            ProviderBehavior::QuotaExhausted => Err(BotError::QuotaExhausted),
            ProviderBehavior::Fail => Err(BotError::OpenAiResponse("scripted failure".to_string())),
        }
    }
}

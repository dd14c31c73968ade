//! In-memory stand-ins for Slack, Drive, the puzzle store and SQS.
#![allow(dead_code)]

use async_trait::async_trait;
use herring::HerringError;
use herring::core::models::{Puzzle, QueuedJob};
use herring::core::puzzle_store::PuzzleStore;
use herring::core::queue::TaskQueue;
use herring::sheets::SheetService;
use herring::slack::{ChatPlatform, PostOptions};
use herring::worker::{Dispatcher, PuzzleJobs};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCall {
    Join(String),
    Post {
        channel_id: String,
        text: String,
        options: PostOptions,
    },
    Create(String),
    SetTopic {
        channel_id: String,
        topic: String,
    },
}

/// Channel ids are `C-<name>`, so tests can tell where a post went.
pub fn channel_id(name: &str) -> String {
    format!("C-{name}")
}

#[derive(Default)]
pub struct FakeChat {
    calls: Mutex<Vec<ChatCall>>,
    fail_join: HashSet<String>,
    fail_post: HashSet<String>,
    fail_create: bool,
    fail_topic: bool,
}

impl FakeChat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_join(mut self, name: &str) -> Self {
        self.fail_join.insert(name.to_string());
        self
    }

    pub fn failing_post(mut self, name: &str) -> Self {
        self.fail_post.insert(channel_id(name));
        self
    }

    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub fn failing_topic(mut self) -> Self {
        self.fail_topic = true;
        self
    }

    pub fn calls(&self) -> Vec<ChatCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ChatCall::Post {
                    channel_id, text, ..
                } => Some((channel_id, text)),
                _ => None,
            })
            .collect()
    }

    pub fn posts_to(&self, name: &str) -> Vec<String> {
        let id = channel_id(name);
        self.posts()
            .into_iter()
            .filter(|(channel, _)| *channel == id)
            .map(|(_, text)| text)
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&ChatCall) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: ChatCall) {
        self.calls.lock().unwrap().push(call);
    }
}

fn slack_error(method: &str, code: &str) -> HerringError {
    HerringError::SlackApi {
        method: method.to_string(),
        code: code.to_string(),
    }
}

#[async_trait]
impl ChatPlatform for FakeChat {
    async fn join(&self, channel_name: &str) -> Result<String, HerringError> {
        self.record(ChatCall::Join(channel_name.to_string()));
        if self.fail_join.contains(channel_name) {
            return Err(slack_error("conversations.join", "is_archived"));
        }
        Ok(channel_id(channel_name))
    }

    async fn post_message(
        &self,
        channel_id: &str,
        text: &str,
        options: PostOptions,
    ) -> Result<(), HerringError> {
        self.record(ChatCall::Post {
            channel_id: channel_id.to_string(),
            text: text.to_string(),
            options,
        });
        if self.fail_post.contains(channel_id) {
            return Err(slack_error("chat.postMessage", "is_archived"));
        }
        Ok(())
    }

    async fn create_channel(&self, name: &str) -> Result<String, HerringError> {
        self.record(ChatCall::Create(name.to_string()));
        if self.fail_create {
            return Err(slack_error("conversations.create", "name_taken"));
        }
        Ok(channel_id(name))
    }

    async fn set_topic(&self, channel_id: &str, topic: &str) -> Result<(), HerringError> {
        self.record(ChatCall::SetTopic {
            channel_id: channel_id.to_string(),
            topic: topic.to_string(),
        });
        if self.fail_topic {
            return Err(slack_error("conversations.setTopic", "not_in_channel"));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeStore {
    puzzles: Mutex<HashMap<String, Puzzle>>,
    lookups: Mutex<usize>,
    saves: Mutex<Vec<Puzzle>>,
    unreachable: bool,
}

impl FakeStore {
    pub fn with(puzzles: impl IntoIterator<Item = Puzzle>) -> Self {
        Self {
            puzzles: Mutex::new(puzzles.into_iter().map(|p| (p.slug.clone(), p)).collect()),
            ..Self::default()
        }
    }

    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    pub fn get(&self, slug: &str) -> Option<Puzzle> {
        self.puzzles.lock().unwrap().get(slug).cloned()
    }

    pub fn lookups(&self) -> usize {
        *self.lookups.lock().unwrap()
    }

    pub fn saves(&self) -> Vec<Puzzle> {
        self.saves.lock().unwrap().clone()
    }
}

#[async_trait]
impl PuzzleStore for FakeStore {
    async fn get_by_slug(&self, slug: &str) -> Result<Puzzle, HerringError> {
        *self.lookups.lock().unwrap() += 1;
        if self.unreachable {
            return Err(HerringError::StoreError("connection refused".to_string()));
        }
        self.get(slug)
            .ok_or_else(|| HerringError::PuzzleNotFound(slug.to_string()))
    }

    async fn save(&self, puzzle: &Puzzle) -> Result<(), HerringError> {
        self.saves.lock().unwrap().push(puzzle.clone());
        self.puzzles
            .lock()
            .unwrap()
            .insert(puzzle.slug.clone(), puzzle.clone());
        Ok(())
    }
}

pub struct FakeSheets {
    url: String,
    titles: Mutex<Vec<String>>,
    fail: bool,
}

impl FakeSheets {
    pub fn returning(url: &str) -> Self {
        Self {
            url: url.to_string(),
            titles: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::returning("")
        }
    }

    pub fn titles(&self) -> Vec<String> {
        self.titles.lock().unwrap().clone()
    }
}

#[async_trait]
impl SheetService for FakeSheets {
    async fn create_spreadsheet(&self, title: &str) -> Result<String, HerringError> {
        self.titles.lock().unwrap().push(title.to_string());
        if self.fail {
            return Err(HerringError::SheetError("files.copy HTTP 403".to_string()));
        }
        Ok(self.url.clone())
    }
}

#[derive(Default)]
pub struct FakeQueue {
    sent: Mutex<Vec<(QueuedJob, Duration)>>,
}

impl FakeQueue {
    pub fn sent(&self) -> Vec<(QueuedJob, Duration)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn pop(&self) -> Option<(QueuedJob, Duration)> {
        self.sent.lock().unwrap().pop()
    }
}

#[async_trait]
impl TaskQueue for FakeQueue {
    async fn enqueue(&self, job: &QueuedJob, delay: Duration) -> Result<(), HerringError> {
        self.sent.lock().unwrap().push((job.clone(), delay));
        Ok(())
    }
}

pub fn puzzle(slug: &str, name: &str) -> Puzzle {
    Puzzle {
        slug: slug.to_string(),
        name: name.to_string(),
        round_number: 3,
        number: 14,
        hunt_url: format!("https://hunt.example/puzzle/{slug}"),
        url: None,
    }
}

/// Everything a job test needs, with handles kept for assertions.
pub struct Harness {
    pub chat: Arc<FakeChat>,
    pub store: Arc<FakeStore>,
    pub sheets: Arc<FakeSheets>,
    pub queue: Arc<FakeQueue>,
}

impl Harness {
    pub fn new(chat: FakeChat, store: FakeStore, sheets: FakeSheets) -> Self {
        Self {
            chat: Arc::new(chat),
            store: Arc::new(store),
            sheets: Arc::new(sheets),
            queue: Arc::new(FakeQueue::default()),
        }
    }

    pub fn with_puzzles(puzzles: impl IntoIterator<Item = Puzzle>) -> Self {
        Self::new(
            FakeChat::new(),
            FakeStore::with(puzzles),
            FakeSheets::returning("https://docs.example/abc?usp=sharing"),
        )
    }

    pub fn jobs(&self) -> PuzzleJobs {
        let chat: Arc<dyn ChatPlatform> = self.chat.clone();
        let sheets: Arc<dyn SheetService> = self.sheets.clone();
        let store: Arc<dyn PuzzleStore> = self.store.clone();
        PuzzleJobs::new(Some(chat), Some(sheets), store)
    }

    /// Dispatcher without throttling, so tests don't wait on rate limits.
    pub fn dispatcher(&self) -> Dispatcher {
        let queue: Arc<dyn TaskQueue> = self.queue.clone();
        Dispatcher::new(self.jobs(), queue)
    }
}

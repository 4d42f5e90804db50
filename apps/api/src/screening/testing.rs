//! In-process doubles for the model and storage collaborators.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::{CompletionModel, CompletionOptions, LlmError};
use crate::models::job::JobRow;
use crate::screening::extractor::parse_resume_text;
use crate::screening::scorer::MatchResult;
use crate::storage::{ScreeningStore, StoredResume};

#[derive(Debug, Clone)]
pub enum FakeReply {
    Text(String),
    Timeout,
    Status(u16),
    Empty,
    After(Duration, Box<FakeReply>),
}

type Script = Box<dyn Fn(&str) -> FakeReply + Send + Sync>;

pub struct FakeModel {
    id: String,
    script: Script,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl FakeModel {
    pub fn new(id: &str, reply: FakeReply) -> Self {
        Self::scripted(id, move |_| reply.clone())
    }

    /// Picks a reply per prompt.
    pub fn scripted<F>(id: &str, script: F) -> Self
    where
        F: Fn(&str) -> FakeReply + Send + Sync + 'static,
    {
        Self {
            id: id.to_string(),
            script: Box::new(script),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Most calls ever in progress at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    async fn play(mut reply: FakeReply, options: &CompletionOptions) -> Result<String, LlmError> {
        loop {
            match reply {
                FakeReply::After(delay, next) => {
                    tokio::time::sleep(delay).await;
                    reply = *next;
                }
                FakeReply::Text(text) => return Ok(text),
                FakeReply::Timeout => return Err(LlmError::Timeout(options.timeout)),
                FakeReply::Status(status) => {
                    return Err(LlmError::Api {
                        status,
                        message: "fake failure".to_string(),
                    })
                }
                FakeReply::Empty => return Err(LlmError::EmptyContent),
            }
        }
    }
}

#[async_trait]
impl CompletionModel for FakeModel {
    fn model_id(&self) -> &str {
        &self.id
    }

    async fn complete(
        &self,
        prompt: &str,
        _system: &str,
        options: &CompletionOptions,
    ) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let reply = (self.script)(prompt);
        let result = Self::play(reply, options).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

#[derive(Default)]
pub struct MemoryStore {
    jobs: HashMap<Uuid, JobRow>,
    resumes: Vec<StoredResume>,
    saved: Mutex<HashMap<Uuid, Vec<MatchResult>>>,
    loads: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_job(&mut self, title: &str, description: &str, skills: &[&str]) -> Uuid {
        let now = chrono::Utc::now();
        let job = JobRow {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.to_string(),
            required_skills: skills.iter().map(|s| s.to_string()).collect(),
            created_at: now,
            updated_at: now,
        };
        let id = job.id;
        self.jobs.insert(id, job);
        id
    }

    pub fn add_resume(&mut self, text: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.resumes.push(StoredResume {
            id,
            parsed: parse_resume_text(text),
        });
        id
    }

    pub fn saved_for(&self, job_id: Uuid) -> Option<Vec<MatchResult>> {
        self.saved.lock().unwrap().get(&job_id).cloned()
    }

    /// Number of load calls of any kind.
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScreeningStore for MemoryStore {
    async fn load_job(&self, job_id: Uuid) -> Result<Option<JobRow>, AppError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.jobs.get(&job_id).cloned())
    }

    async fn load_resumes_for_job(&self, _job_id: Uuid) -> Result<Vec<StoredResume>, AppError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.resumes.clone())
    }

    async fn save_match_results(&self, job_id: Uuid, results: &[MatchResult]) -> Result<(), AppError> {
        self.saved.lock().unwrap().insert(job_id, results.to_vec());
        Ok(())
    }
}

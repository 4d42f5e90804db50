//! Storage collaborator. The matching core only sees `ScreeningStore`; CRUD for the
//! HTTP layer lives alongside as plain async functions over the pool.

pub mod jobs;
pub mod matches;
pub mod postgres;
pub mod resumes;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::JobRow;
use crate::screening::extractor::ParsedResume;
use crate::screening::scorer::MatchResult;

/// A resume on file, with its storage id.
#[derive(Debug, Clone)]
pub struct StoredResume {
    pub id: Uuid,
    pub parsed: ParsedResume,
}

/// Load/save primitives consumed by a match run. No transactions or cascades are
/// managed by the caller.
#[async_trait]
pub trait ScreeningStore: Send + Sync {
    async fn load_job(&self, job_id: Uuid) -> Result<Option<JobRow>, AppError>;

    /// Every resume currently on file for the job, in submission order.
    async fn load_resumes_for_job(&self, job_id: Uuid) -> Result<Vec<StoredResume>, AppError>;

    /// Replaces the job's previous results.
    async fn save_match_results(&self, job_id: Uuid, results: &[MatchResult]) -> Result<(), AppError>;
}

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::JobRow;
use crate::screening::scorer::MatchResult;
use crate::storage::{jobs, matches, resumes, ScreeningStore, StoredResume};

/// `ScreeningStore` over PostgreSQL.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScreeningStore for PgStore {
    async fn load_job(&self, job_id: Uuid) -> Result<Option<JobRow>, AppError> {
        Ok(jobs::get_job(&self.pool, job_id).await?)
    }

    async fn load_resumes_for_job(&self, _job_id: Uuid) -> Result<Vec<StoredResume>, AppError> {
        // Every resume on file is a candidate for every job.
        let rows = resumes::list_resumes(&self.pool).await?;
        Ok(rows
            .iter()
            .map(|row| StoredResume {
                id: row.id,
                parsed: row.to_parsed(),
            })
            .collect())
    }

    async fn save_match_results(&self, job_id: Uuid, results: &[MatchResult]) -> Result<(), AppError> {
        Ok(matches::replace_match_results(&self.pool, job_id, results).await?)
    }
}

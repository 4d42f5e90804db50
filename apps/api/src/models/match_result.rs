use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MatchResultRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub resume_id: Uuid,
    pub score: f64,
    /// Bullets joined with `\n`.
    pub reasoning: String,
    /// `NULL` when the heuristic produced the score.
    pub llm_model: Option<String>,
    pub created_at: DateTime<Utc>,
}

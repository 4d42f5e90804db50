//! Scorer capability shared by the heuristic and model-backed scorers.
//!
//! The matcher holds an optional `Arc<dyn ResumeScorer>` for the model path and a
//! concrete `HeuristicScorer` for the fallback.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::llm_client::LlmError;
use crate::screening::extractor::ParsedResume;
use crate::screening::job_profile::JobProfile;
use crate::screening::recovery::RecoveryError;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 10.0;

/// Which path produced a score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelUsed {
    /// Deterministic fallback, also used when no model is configured.
    Heuristic,
    Model(String),
}

impl ModelUsed {
    pub fn is_heuristic(&self) -> bool {
        matches!(self, ModelUsed::Heuristic)
    }

    /// Storage form: `None` marks the heuristic.
    pub fn as_stored(&self) -> Option<&str> {
        match self {
            ModelUsed::Heuristic => None,
            ModelUsed::Model(id) => Some(id),
        }
    }
}

/// Score + justification for one (job, resume) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreOutcome {
    /// Always within [0, 10].
    pub score: f64,
    /// Never empty.
    pub reasoning: Vec<String>,
    pub model_used: ModelUsed,
}

/// A scored resume, tied to its job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub resume_id: Uuid,
    pub job_id: Uuid,
    pub score: f64,
    pub reasoning: Vec<String>,
    pub model_used: ModelUsed,
}

impl MatchResult {
    pub fn from_outcome(job_id: Uuid, resume_id: Uuid, outcome: ScoreOutcome) -> Self {
        Self {
            resume_id,
            job_id,
            score: outcome.score,
            reasoning: outcome.reasoning,
            model_used: outcome.model_used,
        }
    }

    /// Bullets joined with newlines, the form persisted by storage.
    pub fn reasoning_text(&self) -> String {
        self.reasoning.join("\n")
    }
}

/// Why a scorer could not produce a score. Never surfaced past the matcher.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("model call failed: {0}")]
    Model(#[from] LlmError),

    #[error("unrecoverable model response: {0}")]
    Response(#[from] RecoveryError),

    #[error("could not serialize resume for prompt: {0}")]
    Prompt(#[from] serde_json::Error),
}

/// Implement this to add a scoring backend without touching the matcher.
#[async_trait]
pub trait ResumeScorer: Send + Sync {
    async fn score(
        &self,
        job: &JobProfile,
        resume: &ParsedResume,
    ) -> Result<ScoreOutcome, ScoringError>;
}

pub fn clamp_score(score: f64) -> f64 {
    score.clamp(MIN_SCORE, MAX_SCORE)
}

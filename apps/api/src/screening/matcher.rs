//! Per-resume scoring with a single heuristic fallback, fanned out across resumes.

use std::sync::Arc;

use anyhow::anyhow;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{MatchConfig, MAX_MODEL_CONCURRENCY};
use crate::errors::AppError;
use crate::llm_client::{CompletionOptions, LlmClient};
use crate::screening::extractor::ParsedResume;
use crate::screening::heuristic::HeuristicScorer;
use crate::screening::job_profile::JobProfile;
use crate::screening::llm_scorer::LlmScorer;
use crate::screening::scorer::{MatchResult, ResumeScorer, ScoreOutcome, MAX_SCORE, MIN_SCORE};
use crate::storage::StoredResume;

/// Owns the scoring policy for a match run. Cheap to clone; spawned tasks each
/// carry a copy.
#[derive(Clone)]
pub struct Matcher {
    config: MatchConfig,
    model_scorer: Option<Arc<dyn ResumeScorer>>,
    heuristic: HeuristicScorer,
    /// Caps in-flight model attempts across a run.
    model_slots: Arc<Semaphore>,
}

impl Matcher {
    pub fn new(config: MatchConfig, model_scorer: Option<Arc<dyn ResumeScorer>>) -> Self {
        let heuristic = HeuristicScorer::new(&config);
        let model_slots = Arc::new(Semaphore::new(
            config.max_concurrency.clamp(1, MAX_MODEL_CONCURRENCY),
        ));
        Self {
            config,
            model_scorer,
            heuristic,
            model_slots,
        }
    }

    /// Wires the Anthropic-backed scorer when an API key is present, otherwise
    /// scores everything with the heuristic.
    pub fn from_config(config: MatchConfig, api_key: Option<&str>) -> Self {
        let model_scorer = LlmClient::from_config(api_key, &config).map(|client| {
            info!("Model scoring enabled (model: {})", config.model_identifier);
            let options = CompletionOptions::from_config(&config);
            Arc::new(LlmScorer::new(Arc::new(client), options)) as Arc<dyn ResumeScorer>
        });
        if model_scorer.is_none() {
            info!("No model credentials configured; using heuristic scoring only");
        }
        Self::new(config, model_scorer)
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn uses_model(&self) -> bool {
        self.model_scorer.is_some()
    }

    /// Always yields an outcome: a failed or out-of-contract model attempt falls
    /// back to the heuristic exactly once.
    pub async fn score_resume(
        &self,
        job: &JobProfile,
        resume_id: Uuid,
        resume: &ParsedResume,
    ) -> ScoreOutcome {
        if let Some(model) = &self.model_scorer {
            match model.score(job, resume).await {
                Ok(outcome) if is_well_formed(&outcome) => {
                    debug!("Resume {resume_id} scored {:.2} by model", outcome.score);
                    return outcome;
                }
                Ok(outcome) => warn!(
                    "Model returned unusable score {} for resume {resume_id}; falling back to heuristic",
                    outcome.score
                ),
                Err(e) => warn!("Model scoring failed for resume {resume_id}; falling back to heuristic: {e}"),
            }
        }

        let outcome = self.heuristic.evaluate(job, resume);
        debug!("Resume {resume_id} scored {:.2} by heuristic", outcome.score);
        outcome
    }

    /// One result per resume, in input order, whatever order the scores complete in.
    /// At most `max_concurrency` resumes are being scored at any moment.
    pub async fn score_all(
        &self,
        job_id: Uuid,
        job: &JobProfile,
        resumes: &[StoredResume],
    ) -> Result<Vec<MatchResult>, AppError> {
        if self.model_scorer.is_none() {
            return Ok(resumes
                .iter()
                .map(|r| MatchResult::from_outcome(job_id, r.id, self.heuristic.evaluate(job, &r.parsed)))
                .collect());
        }

        let job = Arc::new(job.clone());
        let mut tasks = JoinSet::new();
        for (index, resume) in resumes.iter().cloned().enumerate() {
            let matcher = self.clone();
            let job = Arc::clone(&job);
            let slots = Arc::clone(&self.model_slots);
            tasks.spawn(async move {
                let permit = slots.acquire_owned().await;
                let outcome = matcher.score_resume(&job, resume.id, &resume.parsed).await;
                drop(permit);
                (index, MatchResult::from_outcome(job_id, resume.id, outcome))
            });
        }

        let mut slots: Vec<Option<MatchResult>> = vec![None; resumes.len()];
        while let Some(joined) = tasks.join_next().await {
            let (index, result) =
                joined.map_err(|e| AppError::Internal(anyhow!("scoring task failed: {e}")))?;
            slots[index] = Some(result);
        }

        slots
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| AppError::Internal(anyhow!("scoring finished with missing results")))
    }
}

fn is_well_formed(outcome: &ScoreOutcome) -> bool {
    (MIN_SCORE..=MAX_SCORE).contains(&outcome.score) && !outcome.reasoning.is_empty()
}

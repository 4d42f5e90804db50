//! One matching run: load, score, persist, rank.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::screening::job_profile::JobProfile;
use crate::screening::matcher::Matcher;
use crate::screening::scorer::MatchResult;
use crate::screening::shortlist::ShortlistAssembler;
use crate::storage::ScreeningStore;

#[derive(Debug, Clone, Serialize)]
pub struct MatchRun {
    pub job_id: Uuid,
    /// Every scored resume, in submission order.
    pub results: Vec<MatchResult>,
    pub shortlist: Vec<MatchResult>,
    #[serde(skip)]
    pub candidate_names: HashMap<Uuid, String>,
}

/// Runs matching for `job_id`. Configuration problems surface before any
/// storage access; scoring failures never do.
pub async fn run_match(
    store: &dyn ScreeningStore,
    matcher: &Matcher,
    job_id: Uuid,
    shortlist_size: Option<usize>,
) -> Result<MatchRun, AppError> {
    let config = match shortlist_size {
        Some(0) => {
            return Err(AppError::Validation(
                "shortlist_size must be at least 1".to_string(),
            ))
        }
        Some(size) => matcher.config().with_shortlist_size(size),
        None => matcher.config().clone(),
    };
    config.validate()?;

    let job = store
        .load_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    let resumes = store.load_resumes_for_job(job_id).await?;
    let profile = JobProfile::from(&job);

    info!(
        "Matching {} resumes against job {job_id} ({} required skills, model: {})",
        resumes.len(),
        profile.required_skills.len(),
        if matcher.uses_model() { config.model_identifier.as_str() } else { "heuristic" }
    );

    let results = matcher.score_all(job_id, &profile, &resumes).await?;
    store.save_match_results(job_id, &results).await?;

    let heuristic_scored = results.iter().filter(|r| r.model_used.is_heuristic()).count();
    if matcher.uses_model() && heuristic_scored > 0 {
        warn!("Job {job_id}: {heuristic_scored} of {} resumes fell back to the heuristic", results.len());
    }

    let shortlist = ShortlistAssembler::new(&config).assemble(results.clone());
    info!(
        "Job {job_id}: {} of {} resumes shortlisted (threshold {})",
        shortlist.len(),
        results.len(),
        config.minimum_score_threshold
    );

    let candidate_names = resumes
        .into_iter()
        .filter_map(|r| r.parsed.candidate_name.map(|name| (r.id, name)))
        .collect();

    Ok(MatchRun {
        job_id,
        results,
        shortlist,
        candidate_names,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::{ConfigError, MatchConfig};
    use crate::llm_client::CompletionOptions;
    use crate::screening::llm_scorer::LlmScorer;
    use crate::screening::scorer::ResumeScorer;
    use crate::screening::testing::{FakeModel, FakeReply, MemoryStore};

    fn heuristic_matcher() -> Matcher {
        Matcher::new(MatchConfig::default(), None)
    }

    #[tokio::test]
    async fn test_missing_job_is_not_found() {
        let store = MemoryStore::new();
        let err = run_match(&store, &heuristic_matcher(), Uuid::new_v4(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_no_resumes_gives_empty_shortlist() {
        let mut store = MemoryStore::new();
        let job_id = store.add_job("Backend Engineer", "Rust", &["rust"]);
        let run = run_match(&store, &heuristic_matcher(), job_id, None).await.unwrap();

        assert!(run.results.is_empty());
        assert!(run.shortlist.is_empty());
        assert_eq!(store.saved_for(job_id), Some(vec![]));
    }

    #[tokio::test]
    async fn test_invalid_config_fails_before_loading() {
        let mut store = MemoryStore::new();
        let job_id = store.add_job("Backend Engineer", "Rust", &["rust"]);
        let config = MatchConfig {
            minimum_score_threshold: 11.0,
            ..MatchConfig::default()
        };
        let err = run_match(&store, &Matcher::new(config, None), job_id, None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidConfig(ConfigError::Threshold(_))));
        assert_eq!(store.loads(), 0);
        assert_eq!(store.saved_for(job_id), None);
    }

    #[tokio::test]
    async fn test_zero_shortlist_override_rejected() {
        let mut store = MemoryStore::new();
        let job_id = store.add_job("Backend Engineer", "Rust", &["rust"]);
        let err = run_match(&store, &heuristic_matcher(), job_id, Some(0))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(store.loads(), 0);
    }

    #[tokio::test]
    async fn test_model_outage_still_scores_every_resume() {
        let mut store = MemoryStore::new();
        let job_id = store.add_job("Backend Engineer", "Rust", &["rust", "postgresql"]);
        let strong = store.add_resume("Ann Lee\nRust, PostgreSQL\n6 years of experience");
        store.add_resume("Bob Ray\nJava");

        let config = MatchConfig::default();
        let model = Arc::new(FakeModel::new("test-model", FakeReply::Timeout));
        let scorer: Arc<dyn ResumeScorer> =
            Arc::new(LlmScorer::new(model, CompletionOptions::from_config(&config)));
        let matcher = Matcher::new(config, Some(scorer));

        let run = run_match(&store, &matcher, job_id, None).await.unwrap();
        assert_eq!(run.results.len(), 2);
        assert!(run.results.iter().all(|r| r.model_used.is_heuristic()));
        assert_eq!(store.saved_for(job_id).unwrap().len(), 2);

        assert_eq!(run.shortlist.len(), 1);
        assert_eq!(run.shortlist[0].resume_id, strong);
        assert_eq!(run.candidate_names.get(&strong).map(String::as_str), Some("Ann Lee"));
    }

    #[tokio::test]
    async fn test_shortlist_override_limits_size() {
        let mut store = MemoryStore::new();
        let job_id = store.add_job("Backend Engineer", "Rust", &["rust"]);
        let first = store.add_resume("Ann Lee\nRust\n5 years of experience");
        store.add_resume("Bob Ray\nRust\n5 years of experience");

        let run = run_match(&store, &heuristic_matcher(), job_id, Some(1)).await.unwrap();
        assert_eq!(run.results.len(), 2);
        assert_eq!(run.shortlist.len(), 1);
        // Equal scores: earliest submission wins.
        assert_eq!(run.shortlist[0].resume_id, first);
    }
}

//! Heuristic Scorer: deterministic skill/experience overlap score.
//!
//! Used as the fallback for every model failure and as the only scorer when no model
//! is configured. Pure: identical inputs always give identical output.
//!
//! score = 10 × (skill_weight × skill_overlap_ratio + experience_weight × experience_ratio)

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::config::MatchConfig;
use crate::screening::extractor::ParsedResume;
use crate::screening::job_profile::JobProfile;
use crate::screening::scorer::{
    clamp_score, ModelUsed, ResumeScorer, ScoreOutcome, ScoringError, MAX_SCORE,
};

#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicScorer {
    skill_weight: f64,
    experience_weight: f64,
    target_experience_years: f64,
}

impl HeuristicScorer {
    pub fn new(config: &MatchConfig) -> Self {
        Self {
            skill_weight: config.skill_weight,
            experience_weight: config.experience_weight,
            target_experience_years: config.target_experience_years,
        }
    }

    /// Infallible scoring; the trait impl simply wraps this.
    pub fn evaluate(&self, job: &JobProfile, resume: &ParsedResume) -> ScoreOutcome {
        let skill_ratio = skill_overlap_ratio(&job.required_skills, &resume.skills);
        let experience_ratio = experience_ratio(resume.experience_years, self.target_experience_years);

        let raw = MAX_SCORE * (self.skill_weight * skill_ratio + self.experience_weight * experience_ratio);
        let score = round_hundredths(clamp_score(raw));

        ScoreOutcome {
            score,
            reasoning: self.reasoning(job, resume, skill_ratio),
            model_used: ModelUsed::Heuristic,
        }
    }

    fn reasoning(&self, job: &JobProfile, resume: &ParsedResume, skill_ratio: f64) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(name) = &resume.candidate_name {
            lines.push(format!("Candidate: {name}"));
        }

        let required = &job.required_skills;
        if required.is_empty() {
            lines.push("Skill match: no required skills listed, full credit".to_string());
        } else {
            let matched: Vec<&str> = required
                .intersection(&resume.skills)
                .map(String::as_str)
                .collect();
            let missing: Vec<&str> = required
                .difference(&resume.skills)
                .map(String::as_str)
                .collect();
            lines.push(format!(
                "Skill match: {:.0}% overlap ({}/{} required skills)",
                skill_ratio * 100.0,
                matched.len(),
                required.len()
            ));
            if !matched.is_empty() {
                lines.push(format!("Matched skills: {}", matched.join(", ")));
            }
            if !missing.is_empty() {
                lines.push(format!("Missing skills: {}", missing.join(", ")));
            }
        }

        let baseline = self.target_experience_years;
        lines.push(match resume.experience_years {
            _ if baseline <= 0.0 => "Experience: no baseline configured, full credit".to_string(),
            Some(years) => format!("Experience: {years:.1} years vs baseline {baseline:.1} years"),
            None => "Experience: not stated, no penalty applied".to_string(),
        });

        lines
    }
}

#[async_trait]
impl ResumeScorer for HeuristicScorer {
    async fn score(
        &self,
        job: &JobProfile,
        resume: &ParsedResume,
    ) -> Result<ScoreOutcome, ScoringError> {
        Ok(self.evaluate(job, resume))
    }
}

/// |required ∩ resume| / |required|; 1.0 when nothing is required.
pub fn skill_overlap_ratio(required: &BTreeSet<String>, resume_skills: &BTreeSet<String>) -> f64 {
    if required.is_empty() {
        return 1.0;
    }
    let overlap = required.intersection(resume_skills).count();
    overlap as f64 / required.len() as f64
}

/// min(years / baseline, 1.0); 1.0 when years is unknown or the baseline is non-positive.
pub fn experience_ratio(years: Option<f64>, baseline: f64) -> f64 {
    match years {
        Some(years) if baseline > 0.0 => (years.max(0.0) / baseline).min(1.0),
        _ => 1.0,
    }
}

fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

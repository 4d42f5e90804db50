//! Job Profile Builder: canonical view of a stored job used by every scorer.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::job::JobRow;
use crate::screening::normalizer::normalize_text;
use crate::screening::skills::canonical_skill_set;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobProfile {
    pub title: String,
    pub description: String,
    /// Same canonical tokens as `ParsedResume::skills`, so overlap is exact-match.
    pub required_skills: BTreeSet<String>,
}

impl JobProfile {
    pub fn build<S: AsRef<str>>(title: &str, description: &str, required_skills: &[S]) -> Self {
        Self {
            title: title.trim().to_string(),
            description: normalize_text(description),
            required_skills: canonical_skill_set(required_skills),
        }
    }
}

impl From<&JobRow> for JobProfile {
    /// Rebuilt on every match run; the job may have been edited since the last one.
    fn from(job: &JobRow) -> Self {
        JobProfile::build(&job.title, &job.description, &job.required_skills)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_required_skills_canonicalized() {
        let profile = JobProfile::build(
            "  Data Engineer ",
            "Build pipelines",
            &["Python", " AWS ", "python", "Postgres", ""],
        );
        assert_eq!(profile.title, "Data Engineer");
        let expected: BTreeSet<String> = ["aws", "postgresql", "python"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(profile.required_skills, expected);
    }

    #[test]
    fn test_description_normalized() {
        let profile = JobProfile::build::<&str>("T", "We  need\r\n\r\n\r\nRust", &[]);
        assert_eq!(profile.description, "We need\n\nRust");
        assert!(profile.required_skills.is_empty());
    }

    #[test]
    fn test_from_job_row() {
        let now = Utc::now();
        let row = JobRow {
            id: Uuid::new_v4(),
            title: "Backend Engineer".to_string(),
            description: "Rust services".to_string(),
            required_skills: vec!["Rust".to_string(), "K8s".to_string()],
            created_at: now,
            updated_at: now,
        };
        let profile = JobProfile::from(&row);
        assert!(profile.required_skills.contains("rust"));
        assert!(profile.required_skills.contains("kubernetes"));
    }
}

//! LLM Scorer: model-backed `ResumeScorer`.
//!
//! Builds a fixed prompt from the structured resume and the job profile, makes exactly
//! one model call and recovers a verdict from whatever text comes back.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::llm_client::{CompletionModel, CompletionOptions};
use crate::screening::extractor::{EducationEntry, ParsedResume, ResumeSection};
use crate::screening::job_profile::JobProfile;
use crate::screening::prompts::{fill_template, match_system_prompt, MATCH_PROMPT_TEMPLATE};
use crate::screening::recovery::recover_verdict;
use crate::screening::scorer::{ModelUsed, ResumeScorer, ScoreOutcome, ScoringError};

const REDACTED: &str = "[redacted]";

/// What the model sees of a resume. Contact details and the raw text stay out.
#[derive(Debug, Serialize)]
struct ResumePromptView<'a> {
    candidate_name: Option<&'a str>,
    skills: &'a BTreeSet<String>,
    experience_years: Option<f64>,
    education_entries: &'a [EducationEntry],
    sections: Vec<ResumeSection>,
}

impl<'a> From<&'a ParsedResume> for ResumePromptView<'a> {
    fn from(resume: &'a ParsedResume) -> Self {
        Self {
            candidate_name: resume.candidate_name.as_deref(),
            skills: &resume.skills,
            experience_years: resume.experience_years,
            education_entries: &resume.education_entries,
            sections: resume
                .sections
                .iter()
                .map(|section| ResumeSection {
                    name: section.name.clone(),
                    body: redact_contacts(&section.body, resume),
                })
                .collect(),
        }
    }
}

fn redact_contacts(body: &str, resume: &ParsedResume) -> String {
    [&resume.contact_email, &resume.contact_phone]
        .into_iter()
        .flatten()
        .fold(body.to_string(), |acc, contact| acc.replace(contact.as_str(), REDACTED))
}

pub struct LlmScorer {
    model: Arc<dyn CompletionModel>,
    options: CompletionOptions,
    system: String,
}

impl LlmScorer {
    pub fn new(model: Arc<dyn CompletionModel>, options: CompletionOptions) -> Self {
        Self {
            model,
            options,
            system: match_system_prompt(),
        }
    }
}

/// Fills the scoring template in a single pass, so placeholder-looking text in a
/// job or resume is sent as written.
pub fn build_match_prompt(job: &JobProfile, resume: &ParsedResume) -> Result<String, serde_json::Error> {
    let resume_json = serde_json::to_string_pretty(&ResumePromptView::from(resume))?;
    let required_skills = serde_json::to_string(&job.required_skills)?;

    Ok(fill_template(
        MATCH_PROMPT_TEMPLATE,
        &[
            ("job_title", job.title.as_str()),
            ("job_description", job.description.as_str()),
            ("required_skills", required_skills.as_str()),
            ("resume_json", resume_json.as_str()),
        ],
    ))
}

#[async_trait]
impl ResumeScorer for LlmScorer {
    async fn score(
        &self,
        job: &JobProfile,
        resume: &ParsedResume,
    ) -> Result<ScoreOutcome, ScoringError> {
        let prompt = build_match_prompt(job, resume)?;
        let text = self.model.complete(&prompt, &self.system, &self.options).await?;
        let verdict = recover_verdict(&text)?;

        Ok(ScoreOutcome {
            score: verdict.score,
            reasoning: verdict.reasoning,
            model_used: ModelUsed::Model(self.model.model_id().to_string()),
        })
    }
}

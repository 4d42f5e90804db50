// Prompt constants for model-based resume scoring.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

/// System prompt for resume scoring.
pub fn match_system_prompt() -> String {
    format!(
        "You are an expert technical recruiter scoring candidates against a job description. {JSON_ONLY_SYSTEM}"
    )
}

/// Scoring prompt template. Fill `{resume_json}`, `{job_title}`,
/// `{job_description}` and `{required_skills}` with [`fill_template`].
pub const MATCH_PROMPT_TEMPLATE: &str = r#"Compare the following resume with the job description.

Return a JSON object with this EXACT schema (no extra fields):
{
  "score": 7.5,
  "reasoning": [
    "Short bullet explaining the strongest evidence",
    "Short bullet naming the most important gap"
  ]
}

Rules:
- "score" is a number from 0 to 10 (10 = ideal fit).
- "reasoning" holds 2-3 short bullets grounded in the resume.
- Judge skills, experience and education only. Ignore names and contact details.

Resume JSON:
{resume_json}

Job Title: {job_title}

Job Description:
{job_description}

Required Skills: {required_skills}"#;


/// Substitutes `{key}` placeholders in one pass over `template`. Inserted values
/// are never scanned again, and braces that do not name a known key are kept.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let filled = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, close))
        });
        match filled {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

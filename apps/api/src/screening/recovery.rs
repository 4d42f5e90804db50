//! Recovery of a score + reasoning from free-form model output.
//!
//! Strategies run in order; the first one that yields a score inside [0, 10] wins.
//! Exhausting the list is a typed `RecoveryError`, never a panic.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::llm_client::strip_json_fences;
use crate::screening::scorer::{MAX_SCORE, MIN_SCORE};

pub const NO_REASONING: &str = "No reasoning provided.";

lazy_static! {
    static ref SCORE_RE: Regex =
        Regex::new(r#"(?i)\bscore[*"']*\s*[:=]\s*[*"']*\s*(-?\d+(?:\.\d+)?)"#).unwrap();
    static ref REASONING_ARRAY_RE: Regex =
        Regex::new(r#"(?is)\breasoning[*"']*\s*[:=]\s*(\[.*?\])"#).unwrap();
    static ref REASONING_STRING_RE: Regex =
        Regex::new(r#"(?is)\breasoning[*"']*\s*[:=]\s*"((?:[^"\\]|\\.)*)""#).unwrap();
    static ref REASONING_LINE_RE: Regex =
        Regex::new(r"(?im)^\W*reasoning[*]*\s*[:=]\s*(\S.*)$").unwrap();
    static ref QUOTED_RE: Regex = Regex::new(r#""((?:[^"\\]|\\.)*)""#).unwrap();
    static ref BULLET_RE: Regex = Regex::new(r"(?m)^\s*(?:[-*•]|\d+[.)])\s+(.+)$").unwrap();
}

/// Validated score + non-empty reasoning.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub score: f64,
    pub reasoning: Vec<String>,
}

/// What a strategy found before range validation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawVerdict {
    pub score: f64,
    pub reasoning: Vec<String>,
}

#[derive(Debug, Error, PartialEq)]
pub enum RecoveryError {
    #[error("model response was empty")]
    Empty,

    #[error("score {0} is outside [0, 10]")]
    OutOfRange(f64),

    #[error("no score found in model response")]
    Unrecognized,
}

/// One way of reading a verdict out of model text.
pub trait ResponseStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn extract(&self, text: &str) -> Option<RawVerdict>;
}

/// The whole response (fences stripped) is a JSON object.
pub struct StrictJson;

/// A JSON object embedded in surrounding prose.
pub struct EmbeddedObject;

/// Regex lookup of a `score` token and the `reasoning` content.
pub struct PatternMatch;

pub const DEFAULT_STRATEGIES: [&dyn ResponseStrategy; 3] = [&StrictJson, &EmbeddedObject, &PatternMatch];

impl ResponseStrategy for StrictJson {
    fn name(&self) -> &'static str {
        "strict_json"
    }

    fn extract(&self, text: &str) -> Option<RawVerdict> {
        let value: Value = serde_json::from_str(strip_json_fences(text)).ok()?;
        verdict_from_value(&value)
    }
}

impl ResponseStrategy for EmbeddedObject {
    fn name(&self) -> &'static str {
        "embedded_object"
    }

    fn extract(&self, text: &str) -> Option<RawVerdict> {
        let start = text.find('{')?;
        let end = text.rfind('}')?;
        if end <= start {
            return None;
        }
        let value: Value = serde_json::from_str(&text[start..=end]).ok()?;
        verdict_from_value(&value)
    }
}

impl ResponseStrategy for PatternMatch {
    fn name(&self) -> &'static str {
        "pattern_match"
    }

    fn extract(&self, text: &str) -> Option<RawVerdict> {
        let score = SCORE_RE
            .captures(text)?
            .get(1)?
            .as_str()
            .parse::<f64>()
            .ok()?;
        Some(RawVerdict {
            score,
            reasoning: reasoning_from_text(text),
        })
    }
}

/// Runs the default strategy chain.
pub fn recover_verdict(text: &str) -> Result<Verdict, RecoveryError> {
    recover_with(&DEFAULT_STRATEGIES, text)
}

pub fn recover_with(strategies: &[&dyn ResponseStrategy], text: &str) -> Result<Verdict, RecoveryError> {
    if text.trim().is_empty() {
        return Err(RecoveryError::Empty);
    }

    let mut rejected_score = None;
    for strategy in strategies {
        let Some(raw) = strategy.extract(text) else {
            continue;
        };
        if raw.score.is_finite() && (MIN_SCORE..=MAX_SCORE).contains(&raw.score) {
            debug!("Recovered verdict via {} (score {})", strategy.name(), raw.score);
            return Ok(Verdict {
                score: raw.score,
                reasoning: non_empty_reasoning(raw.reasoning),
            });
        }
        debug!("Strategy {} found out-of-range score {}", strategy.name(), raw.score);
        rejected_score = Some(raw.score);
    }

    Err(rejected_score.map_or(RecoveryError::Unrecognized, RecoveryError::OutOfRange))
}

fn verdict_from_value(value: &Value) -> Option<RawVerdict> {
    let object = value.as_object()?;
    let score = match object.get("score")? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    let reasoning = object
        .get("reasoning")
        .map(reasoning_from_value)
        .unwrap_or_default();
    Some(RawVerdict { score, reasoning })
}

fn reasoning_from_value(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        Value::String(s) => s.lines().map(String::from).collect(),
        Value::Null => Vec::new(),
        other => vec![other.to_string()],
    }
}

fn reasoning_from_text(text: &str) -> Vec<String> {
    if let Some(array) = REASONING_ARRAY_RE.captures(text).and_then(|c| c.get(1)) {
        let array = array.as_str();
        if let Ok(value) = serde_json::from_str::<Value>(array) {
            return reasoning_from_value(&value);
        }
        // Malformed array (trailing comma, unescaped text): keep the quoted items.
        return QUOTED_RE
            .captures_iter(array)
            .filter_map(|c| c.get(1).map(|m| unescape(m.as_str())))
            .collect();
    }
    if let Some(s) = REASONING_STRING_RE.captures(text).and_then(|c| c.get(1)) {
        return unescape(s.as_str()).lines().map(String::from).collect();
    }
    let bullets: Vec<String> = BULLET_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .collect();
    if !bullets.is_empty() {
        return bullets;
    }
    REASONING_LINE_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| vec![m.as_str().to_string()])
        .unwrap_or_default()
}

fn unescape(s: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{s}\"")).unwrap_or_else(|_| s.replace("\\n", "\n"))
}

/// Trims bullets, strips list markers, drops blanks; falls back to a placeholder.
fn non_empty_reasoning(lines: Vec<String>) -> Vec<String> {
    let cleaned: Vec<String> = lines
        .iter()
        .map(|line| {
            line.trim()
                .trim_start_matches(|c: char| c == '-' || c == '*' || c == '•')
                .trim()
                .to_string()
        })
        .filter(|line| !line.is_empty())
        .collect();
    if cleaned.is_empty() {
        vec![NO_REASONING.to_string()]
    } else {
        cleaned
    }
}

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";
pub const DEFAULT_SHORTLIST_SIZE: usize = 5;
pub const DEFAULT_MIN_SCORE_THRESHOLD: f64 = 7.0;
pub const DEFAULT_TARGET_EXPERIENCE_YEARS: f64 = 3.0;
pub const DEFAULT_SKILL_WEIGHT: f64 = 0.7;
pub const DEFAULT_EXPERIENCE_WEIGHT: f64 = 0.3;
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;
/// Upper bound for in-flight model calls per run.
pub const MAX_MODEL_CONCURRENCY: usize = 64;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// `None` disables model scoring entirely; every candidate goes through the heuristic.
    pub anthropic_api_key: Option<String>,
    pub matching: MatchConfig,
    pub port: u16,
    pub rust_log: String,
}

/// Immutable knobs for a match run. Built once and handed to the matcher and
/// shortlist assembler so runs are reproducible.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchConfig {
    pub minimum_score_threshold: f64,
    pub shortlist_size: usize,
    pub target_experience_years: f64,
    pub skill_weight: f64,
    pub experience_weight: f64,
    pub model_identifier: String,
    pub temperature: f32,
    #[serde(skip)]
    pub request_timeout: Duration,
    /// Model calls allowed in flight at once during a run.
    pub max_concurrency: usize,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("minimum_score_threshold must be within [0, 10], got {0}")]
    Threshold(f64),

    #[error("shortlist_size must be at least 1")]
    ShortlistSize,

    #[error("target_experience_years must be a finite number, got {0}")]
    TargetExperience(f64),

    #[error("scoring weights must be finite and non-negative (skill={skill}, experience={experience})")]
    NegativeWeight { skill: f64, experience: f64 },

    #[error("scoring weights must sum to 1.0, got {0}")]
    WeightSum(f64),

    #[error("temperature must be within [0, 1], got {0}")]
    Temperature(f32),

    #[error("model_identifier cannot be empty")]
    EmptyModel,

    #[error("max_concurrency must be within [1, {MAX_MODEL_CONCURRENCY}], got {0}")]
    Concurrency(usize),
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            minimum_score_threshold: DEFAULT_MIN_SCORE_THRESHOLD,
            shortlist_size: DEFAULT_SHORTLIST_SIZE,
            target_experience_years: DEFAULT_TARGET_EXPERIENCE_YEARS,
            skill_weight: DEFAULT_SKILL_WEIGHT,
            experience_weight: DEFAULT_EXPERIENCE_WEIGHT,
            model_identifier: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

impl MatchConfig {
    /// Checked at the start of every match run, before any scoring work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.minimum_score_threshold;
        if !(0.0..=10.0).contains(&threshold) {
            return Err(ConfigError::Threshold(threshold));
        }
        if self.shortlist_size == 0 {
            return Err(ConfigError::ShortlistSize);
        }
        // Non-positive baselines are allowed: the heuristic treats them as "no requirement".
        if !self.target_experience_years.is_finite() {
            return Err(ConfigError::TargetExperience(self.target_experience_years));
        }
        let (skill, experience) = (self.skill_weight, self.experience_weight);
        if !skill.is_finite() || !experience.is_finite() || skill < 0.0 || experience < 0.0 {
            return Err(ConfigError::NegativeWeight { skill, experience });
        }
        let sum = skill + experience;
        if (sum - 1.0).abs() > 1e-6 {
            return Err(ConfigError::WeightSum(sum));
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(ConfigError::Temperature(self.temperature));
        }
        if self.model_identifier.trim().is_empty() {
            return Err(ConfigError::EmptyModel);
        }
        if !(1..=MAX_MODEL_CONCURRENCY).contains(&self.max_concurrency) {
            return Err(ConfigError::Concurrency(self.max_concurrency));
        }
        Ok(())
    }

    /// Copy of this config with a different shortlist cap (per-request override).
    pub fn with_shortlist_size(&self, shortlist_size: usize) -> Self {
        Self {
            shortlist_size,
            ..self.clone()
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests need not touch
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let matching = MatchConfig {
            minimum_score_threshold: parse_or(
                &lookup,
                "MIN_SCORE_THRESHOLD",
                DEFAULT_MIN_SCORE_THRESHOLD,
            )?,
            shortlist_size: parse_or(&lookup, "SHORTLIST_SIZE", DEFAULT_SHORTLIST_SIZE)?,
            target_experience_years: parse_or(
                &lookup,
                "TARGET_EXPERIENCE_YEARS",
                DEFAULT_TARGET_EXPERIENCE_YEARS,
            )?,
            skill_weight: parse_or(&lookup, "SKILL_WEIGHT", DEFAULT_SKILL_WEIGHT)?,
            experience_weight: parse_or(&lookup, "EXPERIENCE_WEIGHT", DEFAULT_EXPERIENCE_WEIGHT)?,
            model_identifier: lookup("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: parse_or(&lookup, "LLM_TEMPERATURE", DEFAULT_TEMPERATURE)?,
            request_timeout: Duration::from_secs(parse_or(
                &lookup,
                "LLM_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )?),
            max_concurrency: parse_or(&lookup, "LLM_MAX_CONCURRENCY", DEFAULT_MAX_CONCURRENCY)?,
        };

        Ok(Config {
            database_url: require(&lookup, "DATABASE_URL")?,
            anthropic_api_key: lookup("ANTHROPIC_API_KEY").filter(|k| !k.trim().is_empty()),
            matching,
            port: parse_or(&lookup, "PORT", 8080u16).context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_only_database_url_set() {
        let config = Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://x")])).unwrap();
        assert_eq!(config.matching, MatchConfig::default());
        assert!(config.anthropic_api_key.is_none());
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_missing_database_url_is_error() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_blank_api_key_treated_as_absent() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://x"),
            ("ANTHROPIC_API_KEY", "   "),
        ]))
        .unwrap();
        assert!(config.anthropic_api_key.is_none());
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://x"),
            ("SHORTLIST_SIZE", "10"),
            ("MIN_SCORE_THRESHOLD", "6.5"),
            ("TARGET_EXPERIENCE_YEARS", "5"),
            ("LLM_MODEL", "claude-haiku-4-5"),
            ("LLM_TIMEOUT_SECS", "12"),
        ]))
        .unwrap();
        assert_eq!(config.matching.shortlist_size, 10);
        assert_eq!(config.matching.minimum_score_threshold, 6.5);
        assert_eq!(config.matching.target_experience_years, 5.0);
        assert_eq!(config.matching.model_identifier, "claude-haiku-4-5");
        assert_eq!(config.matching.request_timeout, Duration::from_secs(12));
    }

    #[test]
    fn test_unparseable_value_names_variable() {
        let err = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://x"),
            ("SHORTLIST_SIZE", "five"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("SHORTLIST_SIZE"));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(MatchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let config = MatchConfig {
            minimum_score_threshold: -1.0,
            ..MatchConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::Threshold(-1.0)));
    }

    #[test]
    fn test_nan_threshold_rejected() {
        let config = MatchConfig {
            minimum_score_threshold: f64::NAN,
            ..MatchConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Threshold(_))));
    }

    #[test]
    fn test_zero_shortlist_rejected() {
        let config = MatchConfig::default().with_shortlist_size(0);
        assert_eq!(config.validate(), Err(ConfigError::ShortlistSize));
    }

    #[test]
    fn test_non_positive_baseline_allowed() {
        let config = MatchConfig {
            target_experience_years: 0.0,
            ..MatchConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let config = MatchConfig {
            skill_weight: 0.5,
            experience_weight: 0.3,
            ..MatchConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::WeightSum(_))));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let config = MatchConfig {
            skill_weight: 1.2,
            experience_weight: -0.2,
            ..MatchConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NegativeWeight { .. })
        ));
    }

    #[test]
    fn test_empty_model_rejected() {
        let config = MatchConfig {
            model_identifier: " ".to_string(),
            ..MatchConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyModel));
    }

    #[test]
    fn test_concurrency_bounds() {
        for bad in [0, MAX_MODEL_CONCURRENCY + 1] {
            let config = MatchConfig {
                max_concurrency: bad,
                ..MatchConfig::default()
            };
            assert_eq!(config.validate(), Err(ConfigError::Concurrency(bad)));
        }
    }

    #[test]
    fn test_concurrency_read_from_env() {
        let config =
            Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://x"), ("LLM_MAX_CONCURRENCY", "2")]))
                .unwrap();
        assert_eq!(config.matching.max_concurrency, 2);
    }
}

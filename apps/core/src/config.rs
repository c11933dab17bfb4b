//! Classifier configuration.
//!
//! Defaults reproduce the reference thresholds. Environment variables can
//! override them for the CLI; the library entry point `classify` always uses
//! the defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use validator::Validate;

use crate::error::AppError;

pub const ENV_MIN_TRANSCRIPT_CHARS: &str = "CEREMONY_MIN_TRANSCRIPT_CHARS";
pub const ENV_MIN_CONFIDENCE: &str = "CEREMONY_MIN_CONFIDENCE";
pub const ENV_FRAMEWORK_CONFIDENCE: &str = "CEREMONY_FRAMEWORK_CONFIDENCE";
pub const ENV_MAX_JUSTIFICATIONS: &str = "CEREMONY_MAX_JUSTIFICATIONS";

/// Thresholds of the ceremony classifier.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Validate)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Transcripts with fewer characters (after trimming) are not analysed.
    #[validate(range(max = 10000))]
    pub min_transcript_chars: usize,
    /// Best provisional score needed to name a Scrum ceremony.
    #[validate(range(min = 0.0, max = 100.0))]
    pub min_confidence: f64,
    /// Fixed confidence of Kanban / SAFe early exits.
    #[validate(range(max = 100))]
    pub framework_confidence: u8,
    /// Maximum justifications in a result.
    #[validate(range(min = 1, max = 10))]
    pub max_justifications: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_transcript_chars: 20,
            min_confidence: 40.0,
            framework_confidence: 85,
            max_justifications: 5,
        }
    }
}

fn read_var<T: FromStr>(name: &str) -> Result<Option<T>, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::Config(format!("{} has an invalid value: '{}'", name, raw))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(AppError::Config(format!("{}: {}", name, e))),
    }
}

impl ClassifierConfig {
    /// Defaults overridden by `CEREMONY_*` environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Some(value) = read_var(ENV_MIN_TRANSCRIPT_CHARS)? {
            config.min_transcript_chars = value;
        }
        if let Some(value) = read_var(ENV_MIN_CONFIDENCE)? {
            config.min_confidence = value;
        }
        if let Some(value) = read_var(ENV_FRAMEWORK_CONFIDENCE)? {
            config.framework_confidence = value;
        }
        if let Some(value) = read_var(ENV_MAX_JUSTIFICATIONS)? {
            config.max_justifications = value;
        }

        config.validate()?;
        Ok(config)
    }
}

//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase", default)]`, so a
//! settings file may set any subset of keys and the rest keep their
//! compiled defaults.

mod dataset;
mod logging;
mod tokenizer;

pub use dataset::*;
pub use logging::*;
pub use tokenizer::*;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Root settings type.
///
/// # JSON Format
///
/// ```json
/// {
///   "dataset": { "maxInputLength": 512, "splitProportion": 0.9 },
///   "tokenizer": { "model": "gpt2" },
///   "logging": { "level": "debug" }
/// }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaybillSettings {
    /// Settings schema version.
    pub version: String,
    /// Context window, taskname, and split settings.
    pub dataset: DatasetSettings,
    /// Tokenizer selection.
    pub tokenizer: TokenizerSettings,
    /// Log output settings.
    pub logging: LoggingSettings,
}

impl Default for PlaybillSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            dataset: DatasetSettings::default(),
            tokenizer: TokenizerSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl PlaybillSettings {
    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.dataset.max_input_length == 0 {
            return Err(SettingsError::InvalidValue(
                "dataset.maxInputLength must be positive".into(),
            ));
        }
        let p = self.dataset.split_proportion;
        if !(p > 0.0 && p <= 1.0) {
            return Err(SettingsError::InvalidValue(format!(
                "dataset.splitProportion must be in (0, 1], got {p}"
            )));
        }
        if self.dataset.taskname.trim().is_empty() {
            return Err(SettingsError::InvalidValue(
                "dataset.taskname must not be empty".into(),
            ));
        }
        if self.tokenizer.model.trim().is_empty() && self.tokenizer.file.is_none() {
            return Err(SettingsError::InvalidValue(
                "tokenizer.model or tokenizer.file is required".into(),
            ));
        }
        Ok(())
    }
}

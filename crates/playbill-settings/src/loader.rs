//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`PlaybillSettings::default()`]
//! 2. If the settings file exists, deep-merge its values over the defaults
//! 3. Apply `PLAYBILL_*` environment overrides (highest priority)
//! 4. Validate the result
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::PlaybillSettings;

/// Resolve the default settings path (`~/.playbill/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".playbill").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<PlaybillSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// A missing file yields the defaults. Invalid JSON or an out-of-range value
/// is an error.
pub fn load_settings_from_path(path: &Path) -> Result<PlaybillSettings> {
    let mut settings = load_file_layers(path)?;
    apply_env_overrides(&mut settings);
    settings.validate()?;
    Ok(settings)
}

/// Defaults merged with the file at `path`, without env overrides.
pub fn load_file_layers(path: &Path) -> Result<PlaybillSettings> {
    let defaults = serde_json::to_value(PlaybillSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    Ok(serde_json::from_value(merged)?)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply environment variable overrides to loaded settings.
///
/// Invalid values are ignored with a warning (falling back to file/default).
pub fn apply_env_overrides(settings: &mut PlaybillSettings) {
    if let Some(v) = read_env_usize("PLAYBILL_MAX_INPUT_LENGTH", 1, 1_000_000) {
        settings.dataset.max_input_length = v;
    }
    if let Some(v) = read_env_string("PLAYBILL_TASKNAME") {
        settings.dataset.taskname = v;
    }
    if let Some(v) = read_env_proportion("PLAYBILL_SPLIT_PROPORTION") {
        settings.dataset.split_proportion = v;
    }
    if let Some(v) = read_env_string("PLAYBILL_TOKENIZER") {
        settings.tokenizer.model = v;
    }
    if let Some(v) = read_env_string("PLAYBILL_TOKENIZER_FILE") {
        settings.tokenizer.file = Some(v);
    }
    if let Some(v) = read_env_string("PLAYBILL_TOKENIZER_CACHE") {
        settings.tokenizer.cache_dir = Some(v);
    }
    if let Some(v) = read_env_string("PLAYBILL_LOG_LEVEL") {
        settings.logging.level = v;
    }
    if let Some(v) = read_env_bool("PLAYBILL_LOG_JSON") {
        settings.logging.json = v;
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a string as a `usize` within a range.
pub fn parse_usize_range(val: &str, min: usize, max: usize) -> Option<usize> {
    let n: usize = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a split proportion in `(0, 1]`.
pub fn parse_proportion(val: &str) -> Option<f64> {
    let p: f64 = val.trim().parse().ok()?;
    (p > 0.0 && p <= 1.0).then_some(p)
}

// ── Env var readers (thin wrappers) ─────────────────────────────────────────

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_bool(name: &str) -> Option<bool> {
    let val = std::env::var(name).ok()?;
    let result = parse_bool(&val);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid boolean env var, ignoring");
    }
    result
}

fn read_env_usize(name: &str, min: usize, max: usize) -> Option<usize> {
    let val = std::env::var(name).ok()?;
    let result = parse_usize_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid usize env var, ignoring");
    }
    result
}

fn read_env_proportion(name: &str) -> Option<f64> {
    let val = std::env::var(name).ok()?;
    let result = parse_proportion(&val);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid proportion env var, ignoring");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SettingsError;
    use assert_matches::assert_matches;

    // ── deep_merge ──────────────────────────────────────────────────

    #[test]
    fn merge_nested_override() {
        let target = serde_json::json!({
            "dataset": {"maxInputLength": 1024, "taskname": "eme-seq2seq"}
        });
        let source = serde_json::json!({
            "dataset": {"maxInputLength": 512}
        });
        let merged = deep_merge(target, source);
        assert_eq!(merged["dataset"]["maxInputLength"], 512);
        assert_eq!(merged["dataset"]["taskname"], "eme-seq2seq");
    }

    #[test]
    fn merge_null_preserves_target() {
        let target = serde_json::json!({"a": 1, "b": 2});
        let source = serde_json::json!({"a": null});
        let merged = deep_merge(target, source);
        assert_eq!(merged["a"], 1);
        assert_eq!(merged["b"], 2);
    }

    #[test]
    fn merge_array_replace() {
        let target = serde_json::json!({"items": [1, 2, 3]});
        let source = serde_json::json!({"items": [4]});
        assert_eq!(deep_merge(target, source)["items"], serde_json::json!([4]));
    }

    #[test]
    fn merge_primitive_replaces_object() {
        let target = serde_json::json!({"a": {"nested": true}});
        let source = serde_json::json!({"a": 42});
        assert_eq!(deep_merge(target, source)["a"], 42);
    }

    // ── load_file_layers / load_settings_from_path ──────────────────

    #[test]
    fn load_missing_file_returns_defaults() {
        let settings = load_file_layers(Path::new("/nonexistent/settings.json")).unwrap();
        assert_eq!(settings.dataset.max_input_length, 1024);
        assert_eq!(settings.tokenizer.model, "gpt2");
    }

    #[test]
    fn load_partial_json_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"dataset": {"maxInputLength": 256}, "tokenizer": {"file": "/tmp/tok.json"}}"#,
        )
        .unwrap();

        let settings = load_file_layers(&path).unwrap();
        assert_eq!(settings.dataset.max_input_length, 256);
        assert_eq!(settings.dataset.taskname, "eme-seq2seq");
        assert_eq!(settings.tokenizer.file.as_deref(), Some("/tmp/tok.json"));
        assert_eq!(settings.tokenizer.model, "gpt2");
    }

    #[test]
    fn load_invalid_json_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not valid json").unwrap();

        assert_matches!(load_file_layers(&path), Err(SettingsError::Json(_)));
    }

    #[test]
    fn load_out_of_range_value_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"dataset": {"splitProportion": 1.5}}"#).unwrap();

        assert_matches!(
            load_settings_from_path(&path),
            Err(SettingsError::InvalidValue(_))
        );
    }

    // ── parsing ─────────────────────────────────────────────────────

    #[test]
    fn parse_bool_variants() {
        for val in &["true", "1", "yes", "ON"] {
            assert_eq!(parse_bool(val), Some(true), "failed for {val}");
        }
        for val in &["false", "0", "no", "Off"] {
            assert_eq!(parse_bool(val), Some(false), "failed for {val}");
        }
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn parse_usize_bounds() {
        assert_eq!(parse_usize_range("512", 1, 1_000_000), Some(512));
        assert_eq!(parse_usize_range("0", 1, 1_000_000), None);
        assert_eq!(parse_usize_range("-3", 1, 1_000_000), None);
        assert_eq!(parse_usize_range("lots", 1, 1_000_000), None);
    }

    #[test]
    fn parse_proportion_bounds() {
        assert_eq!(parse_proportion("0.8"), Some(0.8));
        assert_eq!(parse_proportion(" 1 "), Some(1.0));
        assert_eq!(parse_proportion("0"), None);
        assert_eq!(parse_proportion("1.2"), None);
        assert_eq!(parse_proportion("NaN"), None);
    }
}

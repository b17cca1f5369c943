//! Package-level constants and on-disk naming conventions.

/// Current version of playbill (sourced from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name.
pub const NAME: &str = "playbill";

/// Task name stamped on every dialogue record by default.
pub const DEFAULT_TASKNAME: &str = "eme-seq2seq";

/// Default maximum context length, in tokens.
pub const DEFAULT_MAX_INPUT_LENGTH: usize = 1024;

/// Default tokenizer model id.
pub const DEFAULT_TOKENIZER: &str = "gpt2";

/// Default share of tokens that goes to the training split.
pub const DEFAULT_SPLIT_PROPORTION: f64 = 0.8;

/// Extension of scene files (JSON Lines content despite the name).
pub const RECORD_EXTENSION: &str = ".json";

/// Extension of raw play-script inputs.
pub const TEXT_EXTENSION: &str = ".txt";

/// Prefix of per-scene file names.
pub const SCENE_FILE_PREFIX: &str = "dialogues_";

/// Training split directory name.
pub const TRAIN_DIR: &str = "train";

/// Validation split directory name.
pub const VAL_DIR: &str = "val";

/// Separator placed between turns when they are joined into a context.
pub const TURN_SEPARATOR: &str = " ";

/// Record fields that exist only for bookkeeping and are removed before the
/// dataset is handed to the trainer. `context_len` is the legacy spelling.
pub const AUXILIARY_FIELDS: [&str; 3] = ["context_length", "context_lengths", "context_len"];

/// File name of the scene with the given index.
pub fn scene_file_name(index: usize) -> String {
    format!("{SCENE_FILE_PREFIX}{index}{RECORD_EXTENSION}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_semver() {
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert_eq!(parts.len(), 3, "VERSION must be semver (MAJOR.MINOR.PATCH)");
        for part in parts {
            let _: u32 = part.parse().expect("each semver segment must be a number");
        }
    }

    #[test]
    fn scene_file_name_format() {
        assert_eq!(scene_file_name(0), "dialogues_0.json");
        assert_eq!(scene_file_name(12), "dialogues_12.json");
    }

    #[test]
    fn split_proportion_in_range() {
        assert!(DEFAULT_SPLIT_PROPORTION > 0.0 && DEFAULT_SPLIT_PROPORTION <= 1.0);
    }
}

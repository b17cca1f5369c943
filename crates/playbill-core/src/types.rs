//! Record types persisted as JSON Lines.
//!
//! Field names match the on-disk schema consumed by the downstream trainer,
//! so they stay snake_case rather than following the settings' camelCase.

use serde::{Deserialize, Serialize};

/// One speaker's contiguous utterance: the speaker line followed by the
/// spoken text, newlines included.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Speaker label and line, exactly as extracted from the script.
    #[serde(rename = "character_and_line")]
    pub text: String,
}

impl Turn {
    /// Create a turn from raw text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The speaker label (first line, trimmed).
    pub fn speaker(&self) -> &str {
        self.text.lines().next().unwrap_or_default().trim()
    }

    /// The raw turn text.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// A context/response training example built from one scene.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueRecord {
    /// Task identifier expected by the trainer.
    pub taskname: String,
    /// Preceding turns joined into one string.
    pub context: String,
    /// The turn the model should produce.
    pub response: String,
    /// Token count of `context`. Absent once auxiliary fields are stripped.
    #[serde(
        default,
        alias = "context_len",
        skip_serializing_if = "Option::is_none"
    )]
    pub context_length: Option<usize>,
}

/// Token-length profile of one work, used to balance the train/val split.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkProfile {
    /// Work title (the name of its directory).
    pub title: String,
    /// Number of scene files read.
    pub num_of_scenes: usize,
    /// Longest context length of each scene, in scene-file order.
    pub context_lengths: Vec<usize>,
}

impl WorkProfile {
    /// Sum of the per-scene context lengths.
    pub fn total(&self) -> usize {
        self.context_lengths.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_serializes_with_legacy_key() {
        let turn = Turn::new("ROMEO\nHe jests at scars.\n");
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["character_and_line"], "ROMEO\nHe jests at scars.\n");
    }

    #[test]
    fn turn_speaker_is_first_line() {
        let turn = Turn::new("FIRST CITIZEN\nBefore we proceed any further, hear me speak.\n");
        assert_eq!(turn.speaker(), "FIRST CITIZEN");
        assert_eq!(Turn::new("").speaker(), "");
    }

    #[test]
    fn record_omits_missing_context_length() {
        let record = DialogueRecord {
            taskname: "eme-seq2seq".into(),
            context: "A: hi\n".into(),
            response: "B: hello\n".into(),
            context_length: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("context_length").is_none());
    }

    #[test]
    fn record_reads_legacy_context_len() {
        let line = r#"{"taskname":"t","context":"c","response":"r","context_len":7}"#;
        let record: DialogueRecord = serde_json::from_str(line).unwrap();
        assert_eq!(record.context_length, Some(7));
    }

    #[test]
    fn record_reads_stripped_line() {
        let line = r#"{"taskname":"t","context":"c","response":"r"}"#;
        let record: DialogueRecord = serde_json::from_str(line).unwrap();
        assert_eq!(record.context_length, None);
    }

    #[test]
    fn work_profile_total() {
        let profile = WorkProfile {
            title: "hamlet".into(),
            num_of_scenes: 3,
            context_lengths: vec![10, 20, 30],
        };
        assert_eq!(profile.total(), 60);
        assert_eq!(WorkProfile::default().total(), 0);
    }
}

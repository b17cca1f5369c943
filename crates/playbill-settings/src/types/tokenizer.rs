//! Tokenizer selection.

use playbill_core::constants::DEFAULT_TOKENIZER;
use serde::{Deserialize, Serialize};

/// Which tokenizer counts context tokens.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenizerSettings {
    /// Hugging Face model id whose `tokenizer.json` is downloaded.
    pub model: String,
    /// Local `tokenizer.json`; takes precedence over `model` when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Download cache directory (hf-hub default when unset).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<String>,
    /// Count the special tokens the tokenizer adds around the text.
    pub add_special_tokens: bool,
}

impl Default for TokenizerSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_TOKENIZER.to_string(),
            file: None,
            cache_dir: None,
            add_special_tokens: true,
        }
    }
}

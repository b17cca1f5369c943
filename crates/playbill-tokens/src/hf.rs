//! Hugging Face tokenizer backend (feature-gated behind `hf`).
//!
//! Loads a `tokenizer.json` either from a local path or by downloading it
//! from the hub via `hf-hub`, then counts the ids produced by `encode`.

use std::path::{Path, PathBuf};

use playbill_settings::TokenizerSettings;
use tracing::{debug, info};

use crate::counter::TokenCounter;
use crate::errors::{Result, TokenError};

/// Token counter backed by a `tokenizers::Tokenizer`.
#[derive(Debug)]
pub struct HfTokenCounter {
    tokenizer: tokenizers::Tokenizer,
    add_special_tokens: bool,
}

impl HfTokenCounter {
    /// Load from a local `tokenizer.json`.
    pub fn from_file(path: &Path, add_special_tokens: bool) -> Result<Self> {
        let tokenizer =
            tokenizers::Tokenizer::from_file(path).map_err(|e| TokenError::Load {
                source_name: path.display().to_string(),
                message: e.to_string(),
            })?;
        info!(path = %path.display(), "tokenizer loaded");
        Ok(Self {
            tokenizer,
            add_special_tokens,
        })
    }

    /// Download `tokenizer.json` for `model` (cached by hf-hub) and load it.
    pub fn from_pretrained(
        model: &str,
        cache_dir: Option<&Path>,
        add_special_tokens: bool,
    ) -> Result<Self> {
        let path = download_tokenizer(model, cache_dir)?;
        Self::from_file(&path, add_special_tokens)
    }

    /// Build from settings: a local file wins over the model id.
    pub fn from_settings(settings: &TokenizerSettings) -> Result<Self> {
        if let Some(ref file) = settings.file {
            return Self::from_file(Path::new(file), settings.add_special_tokens);
        }
        Self::from_pretrained(
            &settings.model,
            settings.cache_dir.as_deref().map(Path::new),
            settings.add_special_tokens,
        )
    }
}

impl TokenCounter for HfTokenCounter {
    fn count(&self, text: &str) -> Result<usize> {
        let encoding = self
            .tokenizer
            .encode(text, self.add_special_tokens)
            .map_err(|e| TokenError::Encode(e.to_string()))?;
        Ok(encoding.get_ids().len())
    }
}

fn download_tokenizer(model: &str, cache_dir: Option<&Path>) -> Result<PathBuf> {
    let download_err = |e: hf_hub::api::sync::ApiError| TokenError::Download {
        model: model.to_string(),
        message: e.to_string(),
    };

    let mut builder = hf_hub::api::sync::ApiBuilder::new();
    if let Some(dir) = cache_dir {
        builder = builder.with_cache_dir(dir.to_path_buf());
    }
    let api = builder.build().map_err(download_err)?;

    debug!(model, "fetching tokenizer.json via hf-hub");
    api.model(model.to_string())
        .get("tokenizer.json")
        .map_err(download_err)
}

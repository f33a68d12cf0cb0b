// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// The pretrained tokenizer artifact, fetched once by its
// HuggingFace identifier and cached as tokenizer.json in the
// artifact directory. Later commands (`report`, `classify`)
// reload the cached file, so training and inference are
// guaranteed to share one vocabulary even if the upstream
// artifact changes.
//
// PretrainedTokenizer adapts the tokenizers crate to the
// TextEncoder capability trait from Layer 3 — the rest of the
// pipeline never sees a tokenizers type.

use anyhow::{anyhow, Result};
use std::path::PathBuf;
use tokenizers::Tokenizer;

use crate::domain::traits::TextEncoder;

pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<String>) -> Self {
        Self { dir: PathBuf::from(dir.into()) }
    }

    /// Load the cached tokenizer, or fetch it by identifier and
    /// cache it for subsequent commands.
    pub fn load_or_fetch(&self, model_id: &str) -> Result<PretrainedTokenizer> {
        let path = self.dir.join("tokenizer.json");
        if path.exists() {
            tracing::info!("Loading cached tokenizer from '{}'", path.display());
            return self.load();
        }

        tracing::info!("Fetching pretrained tokenizer '{model_id}'");
        let tokenizer = Tokenizer::from_pretrained(model_id, None)
            .map_err(|e| anyhow!("Cannot fetch pretrained tokenizer '{model_id}': {e}"))?;

        std::fs::create_dir_all(&self.dir).ok();
        tokenizer
            .save(&path, true)
            .map_err(|e| anyhow!("Cannot cache tokenizer to '{}': {e}", path.display()))?;
        tracing::info!("Cached tokenizer to '{}'", path.display());

        Ok(PretrainedTokenizer::new(tokenizer))
    }

    /// Load a previously cached tokenizer.
    pub fn load(&self) -> Result<PretrainedTokenizer> {
        let path = self.dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&path).map_err(|e| {
            anyhow!(
                "Cannot load tokenizer from '{}': {e}. Run 'train' first.",
                path.display()
            )
        })?;
        Ok(PretrainedTokenizer::new(tokenizer))
    }
}

// ─── PretrainedTokenizer ──────────────────────────────────────────────────────
/// TextEncoder backed by a fetched pretrained tokenizer.
pub struct PretrainedTokenizer {
    inner:  Tokenizer,
    pad_id: u32,
}

impl PretrainedTokenizer {
    pub fn new(inner: Tokenizer) -> Self {
        // BERT-family artifacts use "[PAD]", sentencepiece-family
        // use "<pad>"; id 0 is the conventional fallback
        let pad_id = inner
            .token_to_id("[PAD]")
            .or_else(|| inner.token_to_id("<pad>"))
            .unwrap_or(0);
        Self { inner, pad_id }
    }
}

impl TextEncoder for PretrainedTokenizer {
    fn token_ids(&self, text: &str) -> Result<Vec<u32>> {
        let encoding = self
            .inner
            .encode(text, true)
            .map_err(|e| anyhow!("Tokenisation error: {e}"))?;
        Ok(encoding.get_ids().to_vec())
    }

    fn pad_id(&self) -> u32 {
        self.pad_id
    }

    fn vocab_size(&self) -> usize {
        self.inner.get_vocab_size(true)
    }
}

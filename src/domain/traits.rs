// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The two capability seams of the pipeline:
//
//   CommentSource — anything that can produce labelled rows.
//     - CsvCommentLoader → reads a delimited export
//     - (future) a database reader could implement the same trait
//
//   TextEncoder — the pretrained tokenizer capability.
//     - PretrainedTokenizer → wraps a fetched HuggingFace artifact
//     - test stubs → deterministic encoders with no network access
//
// The application layer programs against these traits, so the
// concrete pretrained artifact is swappable without touching
// orchestration logic.

use anyhow::Result;
use crate::domain::comment::CommentRecord;

// ─── CommentSource ────────────────────────────────────────────────────────────
/// Any component that can load labelled comment rows.
pub trait CommentSource {
    /// Load all rows from this source, already cleaned:
    /// no empty text, no excluded categories.
    fn load_all(&self) -> Result<Vec<CommentRecord>>;
}

// ─── TextEncoder ──────────────────────────────────────────────────────────────
/// The tokenizer capability: text in, fixed-length token ids and
/// attention mask out.
pub trait TextEncoder: Send + Sync {
    /// Raw token ids for a text, special tokens included,
    /// no truncation or padding applied yet.
    fn token_ids(&self, text: &str) -> Result<Vec<u32>>;

    /// The id used to pad sequences up to the fixed length.
    fn pad_id(&self) -> u32;

    /// Vocabulary size of the underlying artifact.
    fn vocab_size(&self) -> usize;

    /// Encode a text to exactly `max_len` token ids plus the
    /// matching attention mask (1 = real token, 0 = padding).
    ///
    /// Longer texts are truncated, shorter texts are padded —
    /// the returned vectors always have length `max_len`.
    fn encode(&self, text: &str, max_len: usize) -> Result<(Vec<u32>, Vec<u32>)> {
        let mut ids = self.token_ids(text)?;
        ids.truncate(max_len);

        let mut mask = vec![1u32; ids.len()];
        while ids.len() < max_len {
            ids.push(self.pad_id());
            mask.push(0);
        }

        Ok((ids, mask))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    /// One token per whitespace-separated word, pad id 0.
    struct WordStubEncoder;

    impl TextEncoder for WordStubEncoder {
        fn token_ids(&self, text: &str) -> Result<Vec<u32>> {
            Ok(text.split_whitespace().map(|_| 7u32).collect())
        }
        fn pad_id(&self) -> u32 { 0 }
        fn vocab_size(&self) -> usize { 8 }
    }

    #[test]
    fn test_short_text_is_padded() {
        let (ids, mask) = WordStubEncoder.encode("три коротких слова", 512).unwrap();
        assert_eq!(ids.len(), 512);
        assert_eq!(mask.len(), 512);
        assert_eq!(&mask[..3], &[1, 1, 1]);
        assert!(mask[3..].iter().all(|&m| m == 0));
        assert!(ids[3..].iter().all(|&id| id == 0));
    }

    #[test]
    fn test_long_text_is_truncated() {
        let long = "слово ".repeat(1000);
        let (ids, mask) = WordStubEncoder.encode(&long, 512).unwrap();
        assert_eq!(ids.len(), 512);
        assert_eq!(mask.len(), 512);
        assert!(mask.iter().all(|&m| m == 1));
    }

    #[test]
    fn test_exact_length_untouched() {
        let text = vec!["w"; 16].join(" ");
        let (ids, mask) = WordStubEncoder.encode(&text, 16).unwrap();
        assert_eq!(ids.len(), 16);
        assert!(mask.iter().all(|&m| m == 1));
    }
}

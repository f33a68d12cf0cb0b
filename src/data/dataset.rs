// ============================================================
// Layer 4 — Encoded Dataset
// ============================================================
// Converts cleaned records into fixed-length encoded samples and
// exposes them through Burn's Dataset trait so the DataLoader
// can batch them.
//
// Every EncodedComment holds exactly max_seq_len token ids and
// the attention mask of the same length — truncation/padding
// happens in TextEncoder::encode, nothing downstream has to deal
// with ragged sequences.

use anyhow::{anyhow, Result};
use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::domain::comment::CommentRecord;
use crate::domain::label_index::LabelIndex;
use crate::domain::traits::TextEncoder;

/// One fully tokenised, fixed-length classification sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodedComment {
    pub input_ids:      Vec<u32>,
    pub attention_mask: Vec<u32>,
    pub label:          usize,
}

/// Encode records in input order.
///
/// The label at position i of the output always corresponds to
/// the text at position i of the input — batched tokenisation
/// must never reorder samples relative to their labels.
pub fn encode_records(
    records:     &[CommentRecord],
    encoder:     &dyn TextEncoder,
    label_index: &LabelIndex,
    max_seq_len: usize,
) -> Result<Vec<EncodedComment>> {
    let mut samples = Vec::with_capacity(records.len());

    for record in records {
        let label = label_index.id_of(&record.category).ok_or_else(|| {
            anyhow!(
                "category '{}' is not in the label index — \
                 the index must be built from the same cleaned data",
                record.category
            )
        })?;

        let (input_ids, attention_mask) = encoder.encode(&record.text, max_seq_len)?;
        samples.push(EncodedComment { input_ids, attention_mask, label });
    }

    Ok(samples)
}

pub struct CommentDataset {
    samples: Vec<EncodedComment>,
}

impl CommentDataset {
    pub fn new(samples: Vec<EncodedComment>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[EncodedComment] {
        &self.samples
    }

    /// A second dataset over the same samples — the trainer
    /// consumes its copy while the final report keeps one.
    pub fn clone_samples(&self) -> Self {
        Self { samples: self.samples.clone() }
    }

    /// Ground-truth labels in dataset order.
    pub fn labels(&self) -> Vec<usize> {
        self.samples.iter().map(|s| s.label).collect()
    }
}

impl Dataset<EncodedComment> for CommentDataset {
    fn get(&self, index: usize) -> Option<EncodedComment> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic stub: one token per character, pad id 0.
    struct CharStubEncoder;

    impl TextEncoder for CharStubEncoder {
        fn token_ids(&self, text: &str) -> Result<Vec<u32>> {
            Ok(text.chars().map(|c| c as u32).collect())
        }
        fn pad_id(&self) -> u32 { 0 }
        fn vocab_size(&self) -> usize { 1 << 21 }
    }

    fn index() -> LabelIndex {
        LabelIndex::from_names(vec!["вопрос".into(), "жалоба".into()])
    }

    #[test]
    fn test_every_sample_has_fixed_length() {
        let records = vec![
            CommentRecord::new("a".repeat(1000), "вопрос"),
            CommentRecord::new("abc", "жалоба"),
        ];
        let samples = encode_records(&records, &CharStubEncoder, &index(), 512).unwrap();

        for sample in &samples {
            assert_eq!(sample.input_ids.len(), 512);
            assert_eq!(sample.attention_mask.len(), 512);
        }
        // 1000 chars truncated: every position is real
        assert!(samples[0].attention_mask.iter().all(|&m| m == 1));
        // 3 chars padded: mask 1,1,1 then zeros
        assert_eq!(samples[1].attention_mask.iter().sum::<u32>(), 3);
    }

    #[test]
    fn test_label_alignment_preserved() {
        let records = vec![
            CommentRecord::new("первый", "жалоба"),
            CommentRecord::new("второй", "вопрос"),
            CommentRecord::new("третий", "жалоба"),
        ];
        let samples = encode_records(&records, &CharStubEncoder, &index(), 16).unwrap();
        assert_eq!(samples[0].label, 1);
        assert_eq!(samples[1].label, 0);
        assert_eq!(samples[2].label, 1);
    }

    #[test]
    fn test_unknown_category_is_an_error() {
        let records = vec![CommentRecord::new("текст", "спам")];
        let err = encode_records(&records, &CharStubEncoder, &index(), 16)
            .unwrap_err()
            .to_string();
        assert!(err.contains("спам"));
    }

    #[test]
    fn test_dataset_trait_impl() {
        let records = vec![CommentRecord::new("текст", "вопрос")];
        let samples = encode_records(&records, &CharStubEncoder, &index(), 8).unwrap();
        let dataset = CommentDataset::new(samples);
        assert_eq!(dataset.len(), 1);
        assert!(dataset.get(0).is_some());
        assert!(dataset.get(1).is_none());
        assert_eq!(dataset.labels(), vec![0]);
    }
}

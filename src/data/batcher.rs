// ============================================================
// Layer 4 — Comment Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<EncodedComment>
// into tensors on the target device.
//
// Input:  N samples, each with sequences of length S (pre-padded)
// Output: CommentBatch with
//   input_ids  [N, S] Int
//   pad_mask   [N, S] Bool — true at PADDING positions, the
//              polarity burn's attention masking expects
//   labels     [N]    Int
//
// Because every sample is already padded to the same fixed
// length, batching is a flatten + reshape, no dynamic padding.

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::EncodedComment;

// ─── CommentBatch ─────────────────────────────────────────────────────────────
/// A batch of classification samples ready for the forward pass.
#[derive(Debug, Clone)]
pub struct CommentBatch<B: Backend> {
    /// Token id sequences — shape: [batch_size, seq_len]
    pub input_ids: Tensor<B, 2, Int>,

    /// Padding mask — shape: [batch_size, seq_len],
    /// true where the position is padding and must be ignored
    pub pad_mask: Tensor<B, 2, Bool>,

    /// Ground-truth class ids — shape: [batch_size]
    pub labels: Tensor<B, 1, Int>,
}

// ─── CommentBatcher ───────────────────────────────────────────────────────────
#[derive(Clone, Debug)]
pub struct CommentBatcher<B: Backend> {
    device: B::Device,
}

impl<B: Backend> CommentBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<EncodedComment, CommentBatch<B>> for CommentBatcher<B> {
    fn batch(&self, items: Vec<EncodedComment>) -> CommentBatch<B> {
        let batch_size = items.len();
        // All sequences share the same pre-padded length
        let seq_len = items[0].input_ids.len();

        let input_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.input_ids.iter().map(|&x| x as i32))
            .collect();

        let mask_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.attention_mask.iter().map(|&x| x as i32))
            .collect();

        let labels: Vec<i32> = items.iter().map(|s| s.label as i32).collect();

        let input_ids = Tensor::<B, 1, Int>::from_ints(input_flat.as_slice(), &self.device)
            .reshape([batch_size, seq_len]);

        // Attention mask stores 1 = real token; burn masks where true,
        // so padding positions are the ones equal to 0
        let pad_mask = Tensor::<B, 1, Int>::from_ints(mask_flat.as_slice(), &self.device)
            .reshape([batch_size, seq_len])
            .equal_elem(0);

        let labels = Tensor::<B, 1, Int>::from_ints(labels.as_slice(), &self.device);

        CommentBatch { input_ids, pad_mask, labels }
    }
}

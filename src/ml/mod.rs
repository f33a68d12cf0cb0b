// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn framework specific code lives in this layer (plus the
// data batcher). The domain and eval layers stay GPU-free.
//
//   model.rs      — the transformer encoder + classification
//                   head. The encoder is a standalone Module so
//                   a pretrained encoder record can be loaded
//                   into it before fine-tuning; the head is
//                   always freshly initialised for the run's
//                   class count.
//
//   trainer.rs    — the fine-tuning loop: AdamW, per-epoch
//                   evaluation on the held-out partition,
//                   per-epoch checkpoints, best-macro-F1
//                   selection, early stopping.
//
//   inferencer.rs — loads the best checkpoint and produces raw
//                   per-class score vectors for a dataset or a
//                   single comment.

/// Transformer encoder + classification head architecture
pub mod model;

/// Fine-tuning loop with evaluation, checkpointing, early stop
pub mod trainer;

/// Best-checkpoint inference producing per-class scores
pub mod inferencer;

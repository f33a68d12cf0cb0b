// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting persistence concerns shared by training,
// reporting, and single-comment classification:
//
//   checkpoint.rs      — per-epoch model checkpoints via Burn's
//                        CompactRecorder, the best-epoch pointer
//                        keyed on macro F1, the run config and
//                        the label index as JSON. Also loads a
//                        pretrained encoder record before
//                        fine-tuning starts.
//
//   metrics_log.rs     — append-only per-epoch metrics CSV
//                        (train loss, validation loss, accuracy,
//                        macro F1) for learning-curve analysis.
//
//   tokenizer_store.rs — fetches the pretrained tokenizer
//                        artifact by identifier, caches it in
//                        the artifact directory, and wraps it in
//                        the TextEncoder capability so training
//                        and inference share one vocabulary.
//
// Everything lands in the caller-named artifact directory; one
// directory per experiment keeps runs from clobbering each other.

/// Model checkpoint saving/loading and run manifest persistence
pub mod checkpoint;

/// Per-epoch training metrics CSV logger
pub mod metrics_log;

/// Pretrained tokenizer fetching, caching, and TextEncoder impl
pub mod tokenizer_store;

// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal each:
//
//   train_use_case    — the full pipeline: load → clean → index
//                       labels → stratified split → encode →
//                       fine-tune → final report
//   report_use_case   — rebuild the deterministic test partition
//                       from a saved run and re-evaluate the
//                       best checkpoint without retraining
//   classify_use_case — classify a single comment string with
//                       the best checkpoint
//
// Rules for this layer: no ML math, no printing beyond the
// report surfaces, no direct file parsing — only coordination.

// The training workflow
pub mod train_use_case;

// Re-evaluation of a finished run
pub mod report_use_case;

// Single-comment classification
pub mod classify_use_case;

// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from the raw CSV export to GPU-ready tensor batches.
//
// The pipeline flows in this order:
//
//   CSV file
//       │
//       ▼
//   CsvCommentLoader  → reads rows, drops empty / excluded ones
//       │
//       ▼
//   LabelIndex        → category names → dense class ids (Layer 3)
//       │
//       ▼
//   stratified_split  → seeded per-class train/test partition
//       │
//       ▼
//   encode_records    → fixed-length token ids + mask + label
//       │
//       ▼
//   CommentDataset    → implements Burn's Dataset trait
//       │
//       ▼
//   CommentBatcher    → stacks samples into tensor batches
//       │
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// Each module is responsible for exactly one step.

/// Reads the delimited export and applies the row-level cleaning
pub mod loader;

/// Seeded stratified train/test split
pub mod splitter;

/// Fixed-length encoded samples and Burn's Dataset impl
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

// ============================================================
// Layer 5 — Evaluation
// ============================================================
// Classification metrics over (true label, predicted label)
// pairs. Pure CPU code with no Burn types — the trainer and the
// report use case both feed it plain id vectors, so everything
// here is unit-testable without a device.
//
//   confusion.rs — the num_classes × num_classes count matrix
//   metrics.rs   — per-class precision / recall / F1 / support
//                  plus macro and weighted aggregates
//   report.rs    — sklearn-style printable classification report
//   heatmap.rs   — shaded text rendering of the confusion matrix

/// Confusion matrix (rows = true label, columns = predicted)
pub mod confusion;

/// Per-class and aggregate classification metrics
pub mod metrics;

/// Printable classification report with category names
pub mod report;

/// Text heatmap rendering of the confusion matrix
pub mod heatmap;

// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust structs and traits that define the core concepts
// of the classification pipeline.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O or network calls
//   - NO ML-specific code
//   - Only plain Rust structs, enums, and traits
//
// Keeping this layer pure means the label mapping and the
// encoding contract can be unit tested without a GPU or a
// downloaded tokenizer.

// A single labelled comment row
pub mod comment;

// The immutable category name ↔ class id bijection
pub mod label_index;

// Core abstractions (traits) that other layers implement
pub mod traits;

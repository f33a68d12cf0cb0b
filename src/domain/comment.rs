// ============================================================
// Layer 3 — Comment Domain Type
// ============================================================
// Represents one labelled row of the source table:
// a free-text comment plus the category name it was filed under.
// By the time a CommentRecord exists, the text has already been
// pulled out of the CSV column — no csv types leak into here.

use serde::{Deserialize, Serialize};

/// A single labelled comment.
///
/// Invariant (after cleaning): `text` is non-empty and `category`
/// is not in the configured exclusion set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRecord {
    /// The free-text comment body
    pub text: String,

    /// The category name as it appears in the source table
    pub category: String,
}

impl CommentRecord {
    /// Create a new CommentRecord.
    /// impl Into<String> lets callers pass &str or String.
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text:     text.into(),
            category: category.into(),
        }
    }
}

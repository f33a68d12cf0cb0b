// ============================================================
// Layer 3 — Label Index
// ============================================================
// The bijective mapping between category names and dense class
// ids in [0, num_classes). Built exactly once, after cleaning,
// by sorting the distinct category names lexicographically and
// assigning ids in sorted order. Immutable afterwards — every
// downstream component borrows the same value, nothing ever
// recomputes or mutates the mapping mid-pipeline.
//
// Sorting gives determinism: the same cleaned data always
// produces the same id assignment across runs.

use std::collections::{BTreeSet, HashMap};
use serde::{Deserialize, Serialize};

use crate::domain::comment::CommentRecord;

/// Immutable category name ↔ class id bijection.
///
/// Serialised as the id-ordered name list so `report` and
/// `classify` can reload the exact mapping of a training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelIndex {
    /// Category names in id order — names[id] is the name of class `id`
    names: Vec<String>,

    /// Reverse lookup: category name → class id
    #[serde(skip)]
    ids: HashMap<String, usize>,
}

impl LabelIndex {
    /// Build the index from cleaned records.
    ///
    /// Excluded categories must already have been dropped —
    /// whatever category names are present here become classes.
    pub fn from_records(records: &[CommentRecord]) -> Self {
        // BTreeSet both deduplicates and sorts lexicographically
        let distinct: BTreeSet<&str> = records
            .iter()
            .map(|r| r.category.as_str())
            .collect();

        let names: Vec<String> = distinct.into_iter().map(String::from).collect();
        Self::from_names(names)
    }

    /// Rebuild the index from a persisted id-ordered name list.
    pub fn from_names(names: Vec<String>) -> Self {
        let ids = names
            .iter()
            .enumerate()
            .map(|(id, name)| (name.clone(), id))
            .collect();
        Self { names, ids }
    }

    /// Restore the reverse map after serde deserialisation
    /// (only the name list is persisted).
    pub fn rebuild(self) -> Self {
        Self::from_names(self.names)
    }

    /// Class id for a category name, if the category is known.
    pub fn id_of(&self, category: &str) -> Option<usize> {
        self.ids.get(category).copied()
    }

    /// Category name for a class id, if the id is in range.
    pub fn name_of(&self, id: usize) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// Number of classes.
    pub fn num_classes(&self) -> usize {
        self.names.len()
    }

    /// Category names in id order.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn records(categories: &[&str]) -> Vec<CommentRecord> {
        categories
            .iter()
            .map(|c| CommentRecord::new("text", *c))
            .collect()
    }

    #[test]
    fn test_sorted_dense_ids() {
        let index = LabelIndex::from_records(&records(&["B", "A", "C", "B"]));
        assert_eq!(index.num_classes(), 3);
        // Lexicographic order: A=0, B=1, C=2
        assert_eq!(index.id_of("A"), Some(0));
        assert_eq!(index.id_of("B"), Some(1));
        assert_eq!(index.id_of("C"), Some(2));
    }

    #[test]
    fn test_bijection_round_trip() {
        let index = LabelIndex::from_records(&records(&["жалоба", "благодарность", "вопрос"]));
        for id in 0..index.num_classes() {
            let name = index.name_of(id).unwrap();
            assert_eq!(index.id_of(name), Some(id));
        }
    }

    #[test]
    fn test_unknown_category() {
        let index = LabelIndex::from_records(&records(&["A", "B"]));
        assert_eq!(index.id_of("Z"), None);
        assert_eq!(index.name_of(5), None);
    }

    #[test]
    fn test_deterministic_across_input_order() {
        let a = LabelIndex::from_records(&records(&["x", "y", "z"]));
        let b = LabelIndex::from_records(&records(&["z", "x", "y", "x"]));
        assert_eq!(a.names(), b.names());
    }

    #[test]
    fn test_rebuild_restores_reverse_map() {
        let index = LabelIndex::from_names(vec!["A".into(), "B".into()]);
        let json = serde_json::to_string(&index).unwrap();
        let restored: LabelIndex = serde_json::from_str(&json).unwrap();
        let restored = restored.rebuild();
        assert_eq!(restored.id_of("B"), Some(1));
    }
}

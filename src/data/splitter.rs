// ============================================================
// Layer 4 — Stratified Train/Test Splitter
// ============================================================
// Splits cleaned records into train and test partitions so that
// each partition approximately preserves the overall category
// proportions (a stratified split).
//
// How it works:
//   1. Group record indices by category, in sorted category
//      order (BTreeMap) so iteration is deterministic.
//   2. Shuffle each group with a single StdRng seeded from the
//      configured seed — same seed, same data, same partition.
//   3. Take round(n * test_fraction) members of each group for
//      the test partition, clamped so at least one member stays
//      in training.
//
// A category with fewer than 2 members cannot be stratified and
// is a fatal error naming the category — no silent degradation.

use anyhow::{bail, Result};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use std::collections::BTreeMap;

use crate::domain::comment::CommentRecord;

/// Stratified split of `records` into (train, test).
///
/// `test_fraction` must lie in (0, 1) — there is deliberately no
/// default; the caller always states the held-out share.
pub fn stratified_split(
    records:       Vec<CommentRecord>,
    test_fraction: f64,
    seed:          u64,
) -> Result<(Vec<CommentRecord>, Vec<CommentRecord>)> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        bail!("test fraction must lie in (0, 1), got {test_fraction}");
    }

    // Group by category, sorted, so the shuffle consumes the RNG
    // stream in a stable order across runs
    let mut by_category: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (idx, record) in records.iter().enumerate() {
        by_category.entry(record.category.as_str()).or_default().push(idx);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train_indices = Vec::new();
    let mut test_indices  = Vec::new();

    for (category, mut indices) in by_category {
        let n = indices.len();
        if n < 2 {
            bail!(
                "category '{category}' has only {n} sample(s) — \
                 at least 2 are required for a stratified split"
            );
        }

        indices.shuffle(&mut rng);

        // round() matches the overall fraction as closely as a
        // whole count can; the clamp keeps at least one member in
        // training even for tiny categories
        let test_n = ((n as f64) * test_fraction).round() as usize;
        let test_n = test_n.min(n - 1);

        test_indices.extend_from_slice(&indices[..test_n]);
        train_indices.extend_from_slice(&indices[test_n..]);
    }

    tracing::info!(
        "Stratified split: {} train / {} test (test fraction {:.3}, seed {})",
        train_indices.len(),
        test_indices.len(),
        test_fraction,
        seed,
    );

    // Materialise the partitions; records are moved out exactly once
    let mut slots: Vec<Option<CommentRecord>> = records.into_iter().map(Some).collect();
    let take = |indices: Vec<usize>, slots: &mut Vec<Option<CommentRecord>>| {
        indices
            .into_iter()
            .map(|i| slots[i].take().expect("each index taken once"))
            .collect::<Vec<_>>()
    };

    let train = take(train_indices, &mut slots);
    let test  = take(test_indices, &mut slots);
    Ok((train, test))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn records(categories: &[&str]) -> Vec<CommentRecord> {
        categories
            .iter()
            .enumerate()
            .map(|(i, c)| CommentRecord::new(format!("комментарий {i}"), *c))
            .collect()
    }

    #[test]
    fn test_six_rows_third_held_out() {
        // {"A","A","B","B","B","B"} with fraction 1/3:
        // A contributes round(2/3)=1, B contributes round(4/3)=1
        let (train, test) =
            stratified_split(records(&["A", "A", "B", "B", "B", "B"]), 1.0 / 3.0, 42).unwrap();
        assert_eq!(train.len(), 4);
        assert_eq!(test.len(), 2);
        for part in [&train, &test] {
            assert!(part.iter().any(|r| r.category == "A"));
            assert!(part.iter().any(|r| r.category == "B"));
        }
    }

    #[test]
    fn test_partitions_disjoint_and_exhaustive() {
        let all = records(&["A", "A", "A", "B", "B", "B", "B", "C", "C"]);
        let (train, test) = stratified_split(all.clone(), 0.3, 42).unwrap();

        let mut seen: Vec<String> = train
            .iter()
            .chain(test.iter())
            .map(|r| r.text.clone())
            .collect();
        seen.sort();
        seen.dedup();
        // No row lost, no row duplicated
        assert_eq!(seen.len(), all.len());
    }

    #[test]
    fn test_deterministic_for_fixed_seed() {
        let all = records(&["A", "A", "A", "A", "B", "B", "B", "B", "B", "B"]);
        let (train_a, test_a) = stratified_split(all.clone(), 0.4, 42).unwrap();
        let (train_b, test_b) = stratified_split(all, 0.4, 42).unwrap();

        let texts = |part: &[CommentRecord]| -> Vec<String> {
            part.iter().map(|r| r.text.clone()).collect()
        };
        assert_eq!(texts(&train_a), texts(&train_b));
        assert_eq!(texts(&test_a), texts(&test_b));
    }

    #[test]
    fn test_singleton_category_is_an_error() {
        let err = stratified_split(records(&["A", "A", "B"]), 0.5, 42)
            .unwrap_err()
            .to_string();
        assert!(err.contains('B'));
    }

    #[test]
    fn test_two_member_category_keeps_one_in_train() {
        // round(2 * 0.5) = 1 → exactly one member held out
        let (train, test) = stratified_split(records(&["A", "A"]), 0.5, 42).unwrap();
        assert_eq!(train.len(), 1);
        assert_eq!(test.len(), 1);
    }

    #[test]
    fn test_invalid_fraction_rejected() {
        assert!(stratified_split(records(&["A", "A"]), 0.0, 42).is_err());
        assert!(stratified_split(records(&["A", "A"]), 1.0, 42).is_err());
    }

    #[test]
    fn test_stratification_preserves_ratio() {
        // 20 A, 80 B with fraction 0.25 → test gets 5 A, 20 B
        let mut categories = vec!["A"; 20];
        categories.extend(vec!["B"; 80]);
        let (_, test) = stratified_split(records(&categories), 0.25, 42).unwrap();
        assert_eq!(test.iter().filter(|r| r.category == "A").count(), 5);
        assert_eq!(test.iter().filter(|r| r.category == "B").count(), 20);
    }
}

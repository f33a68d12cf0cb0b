// ============================================================
// Layer 5 — Confusion Matrix
// ============================================================
// Count matrix over a fixed class set: element [i][j] is the
// number of samples with true label i predicted as j. The class
// count is always supplied explicitly (from the LabelIndex), so
// the matrix keeps its num_classes × num_classes shape even when
// a class never occurs in the evaluated partition.

/// Confusion matrix for multi-class classification.
///
/// Rows follow the true label, columns the predicted label, both
/// ordered by LabelIndex class id.
#[derive(Clone, Debug)]
pub struct ConfusionMatrix {
    matrix:    Vec<Vec<usize>>,
    n_classes: usize,
}

impl ConfusionMatrix {
    pub fn new(n_classes: usize) -> Self {
        Self {
            matrix: vec![vec![0; n_classes]; n_classes],
            n_classes,
        }
    }

    /// Build from aligned truth/prediction id vectors.
    pub fn from_predictions(y_true: &[usize], y_pred: &[usize], n_classes: usize) -> Self {
        assert_eq!(
            y_true.len(),
            y_pred.len(),
            "truth and prediction vectors must be aligned"
        );

        let mut cm = Self::new(n_classes);
        for (&truth, &pred) in y_true.iter().zip(y_pred.iter()) {
            cm.record(truth, pred);
        }
        cm
    }

    /// Count one (true, predicted) observation.
    pub fn record(&mut self, true_label: usize, predicted: usize) {
        self.matrix[true_label][predicted] += 1;
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Count at [true_label][predicted].
    pub fn get(&self, true_label: usize, predicted: usize) -> usize {
        self.matrix[true_label][predicted]
    }

    /// Samples of `class` predicted correctly.
    pub fn true_positives(&self, class: usize) -> usize {
        self.matrix[class][class]
    }

    /// Samples predicted as `class` whose true label differs.
    pub fn false_positives(&self, class: usize) -> usize {
        (0..self.n_classes)
            .filter(|&i| i != class)
            .map(|i| self.matrix[i][class])
            .sum()
    }

    /// Samples of `class` predicted as something else.
    pub fn false_negatives(&self, class: usize) -> usize {
        (0..self.n_classes)
            .filter(|&j| j != class)
            .map(|j| self.matrix[class][j])
            .sum()
    }

    /// True instances of a class (row sum).
    pub fn support(&self, class: usize) -> usize {
        self.matrix[class].iter().sum()
    }

    /// Predicted instances of a class (column sum).
    pub fn predicted_count(&self, class: usize) -> usize {
        (0..self.n_classes).map(|i| self.matrix[i][class]).sum()
    }

    pub fn total(&self) -> usize {
        self.matrix.iter().flatten().sum()
    }

    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let correct: usize = (0..self.n_classes).map(|i| self.matrix[i][i]).sum();
        correct as f64 / total as f64
    }

    /// Largest single cell count — used for heatmap scaling.
    pub fn max_cell(&self) -> usize {
        self.matrix.iter().flatten().copied().max().unwrap_or(0)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn sample_matrix() -> ConfusionMatrix {
        // truth:      0 0 1 1 1 2
        // prediction: 0 1 1 1 0 2
        ConfusionMatrix::from_predictions(&[0, 0, 1, 1, 1, 2], &[0, 1, 1, 1, 0, 2], 3)
    }

    #[test]
    fn test_dimensions_and_sums() {
        let cm = sample_matrix();
        assert_eq!(cm.n_classes(), 3);
        assert_eq!(cm.total(), 6);
        // Row sums equal true class counts
        assert_eq!(cm.support(0), 2);
        assert_eq!(cm.support(1), 3);
        assert_eq!(cm.support(2), 1);
        // Column sums equal predicted class counts
        assert_eq!(cm.predicted_count(0), 2);
        assert_eq!(cm.predicted_count(1), 3);
        assert_eq!(cm.predicted_count(2), 1);
    }

    #[test]
    fn test_cell_counts() {
        let cm = sample_matrix();
        assert_eq!(cm.get(0, 0), 1);
        assert_eq!(cm.get(0, 1), 1);
        assert_eq!(cm.get(1, 0), 1);
        assert_eq!(cm.get(1, 1), 2);
        assert_eq!(cm.get(2, 2), 1);
    }

    #[test]
    fn test_tp_fp_fn() {
        let cm = sample_matrix();
        assert_eq!(cm.true_positives(1), 2);
        assert_eq!(cm.false_positives(1), 1);
        assert_eq!(cm.false_negatives(1), 1);
    }

    #[test]
    fn test_accuracy() {
        let cm = sample_matrix();
        assert!((cm.accuracy() - 4.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_absent_class_keeps_shape() {
        // Class 2 never occurs; matrix must still be 3×3
        let cm = ConfusionMatrix::from_predictions(&[0, 1], &[0, 1], 3);
        assert_eq!(cm.n_classes(), 3);
        assert_eq!(cm.support(2), 0);
    }

    #[test]
    fn test_empty_matrix_accuracy_zero() {
        let cm = ConfusionMatrix::new(3);
        assert_eq!(cm.accuracy(), 0.0);
        assert_eq!(cm.max_cell(), 0);
    }
}

// ============================================================
// Layer 5 — Classification Metrics
// ============================================================
// Per-class precision / recall / F1 / support derived from the
// confusion matrix, plus the two aggregates used by this
// pipeline:
//
//   macro    — unweighted mean over classes (the checkpoint
//              selection and early-stopping metric)
//   weighted — support-weighted mean over classes
//
// A class with zero predicted or zero true instances scores 0
// for the undefined ratio, matching sklearn's zero_division=0.

use crate::eval::confusion::ConfusionMatrix;

/// Per-class metric table for one evaluation pass.
#[derive(Clone, Debug)]
pub struct ClassificationMetrics {
    pub precision: Vec<f64>,
    pub recall:    Vec<f64>,
    pub f1:        Vec<f64>,
    pub support:   Vec<usize>,
    pub accuracy:  f64,
}

impl ClassificationMetrics {
    pub fn from_confusion(cm: &ConfusionMatrix) -> Self {
        let n_classes = cm.n_classes();
        let mut precision = Vec::with_capacity(n_classes);
        let mut recall    = Vec::with_capacity(n_classes);
        let mut f1        = Vec::with_capacity(n_classes);
        let mut support   = Vec::with_capacity(n_classes);

        for class in 0..n_classes {
            let tp  = cm.true_positives(class) as f64;
            let fp  = cm.false_positives(class) as f64;
            let fneg = cm.false_negatives(class) as f64;

            let p = if tp + fp > 0.0 { tp / (tp + fp) } else { 0.0 };
            let r = if tp + fneg > 0.0 { tp / (tp + fneg) } else { 0.0 };
            let f = if p + r > 0.0 { 2.0 * p * r / (p + r) } else { 0.0 };

            precision.push(p);
            recall.push(r);
            f1.push(f);
            support.push(cm.support(class));
        }

        Self { precision, recall, f1, support, accuracy: cm.accuracy() }
    }

    pub fn from_predictions(y_true: &[usize], y_pred: &[usize], n_classes: usize) -> Self {
        Self::from_confusion(&ConfusionMatrix::from_predictions(y_true, y_pred, n_classes))
    }

    /// Unweighted mean of per-class F1 scores.
    pub fn macro_f1(&self) -> f64 {
        macro_avg(&self.f1)
    }

    pub fn macro_precision(&self) -> f64 {
        macro_avg(&self.precision)
    }

    pub fn macro_recall(&self) -> f64 {
        macro_avg(&self.recall)
    }

    pub fn weighted_f1(&self) -> f64 {
        self.weighted_avg(&self.f1)
    }

    pub fn weighted_precision(&self) -> f64 {
        self.weighted_avg(&self.precision)
    }

    pub fn weighted_recall(&self) -> f64 {
        self.weighted_avg(&self.recall)
    }

    pub fn total_support(&self) -> usize {
        self.support.iter().sum()
    }

    fn weighted_avg(&self, values: &[f64]) -> f64 {
        let total = self.total_support();
        if total == 0 {
            return 0.0;
        }
        values
            .iter()
            .zip(self.support.iter())
            .map(|(&v, &s)| v * s as f64)
            .sum::<f64>()
            / total as f64
    }
}

fn macro_avg(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_predictions() {
        let y = vec![0, 1, 2, 1, 0, 2];
        let m = ClassificationMetrics::from_predictions(&y, &y, 3);
        assert!((m.macro_f1() - 1.0).abs() < 1e-12);
        assert!((m.accuracy - 1.0).abs() < 1e-12);
        assert!((m.weighted_f1() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_per_class_values() {
        // truth:      0 0 1 1 1 2
        // prediction: 0 1 1 1 0 2
        let m = ClassificationMetrics::from_predictions(
            &[0, 0, 1, 1, 1, 2],
            &[0, 1, 1, 1, 0, 2],
            3,
        );
        // Class 0: tp=1 fp=1 fn=1 → p=0.5 r=0.5 f1=0.5
        assert!((m.precision[0] - 0.5).abs() < 1e-12);
        assert!((m.recall[0] - 0.5).abs() < 1e-12);
        assert!((m.f1[0] - 0.5).abs() < 1e-12);
        // Class 1: tp=2 fp=1 fn=1 → p=2/3 r=2/3 f1=2/3
        assert!((m.f1[1] - 2.0 / 3.0).abs() < 1e-12);
        // Class 2: exact
        assert!((m.f1[2] - 1.0).abs() < 1e-12);
        assert_eq!(m.support, vec![2, 3, 1]);
    }

    #[test]
    fn test_macro_vs_weighted() {
        let m = ClassificationMetrics::from_predictions(
            &[0, 0, 1, 1, 1, 2],
            &[0, 1, 1, 1, 0, 2],
            3,
        );
        let expected_macro = (0.5 + 2.0 / 3.0 + 1.0) / 3.0;
        let expected_weighted = (0.5 * 2.0 + (2.0 / 3.0) * 3.0 + 1.0 * 1.0) / 6.0;
        assert!((m.macro_f1() - expected_macro).abs() < 1e-12);
        assert!((m.weighted_f1() - expected_weighted).abs() < 1e-12);
    }

    #[test]
    fn test_never_predicted_class_scores_zero() {
        // Class 1 exists but is never predicted
        let m = ClassificationMetrics::from_predictions(&[0, 1], &[0, 0], 2);
        assert_eq!(m.precision[1], 0.0);
        assert_eq!(m.recall[1], 0.0);
        assert_eq!(m.f1[1], 0.0);
    }
}

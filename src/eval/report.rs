// ============================================================
// Layer 5 — Classification Report
// ============================================================
// Renders the per-class metric table in the familiar sklearn
// layout: one row per category (labelled with its name, not its
// id), then macro and weighted aggregate rows, then accuracy.

use crate::domain::label_index::LabelIndex;
use crate::eval::confusion::ConfusionMatrix;
use crate::eval::metrics::ClassificationMetrics;

/// Format the full classification report as a printable string.
pub fn classification_report(cm: &ConfusionMatrix, label_index: &LabelIndex) -> String {
    let metrics = ClassificationMetrics::from_confusion(cm);

    // Name column wide enough for the longest category name
    let name_width = label_index
        .names()
        .iter()
        .map(|n| n.chars().count())
        .chain(["weighted avg".len()].into_iter())
        .max()
        .unwrap_or(12);

    let mut out = String::new();
    out.push_str(&format!(
        "{:>width$} {:>10} {:>10} {:>10} {:>10}\n",
        "", "precision", "recall", "f1-score", "support",
        width = name_width,
    ));
    out.push_str(&"-".repeat(name_width + 44));
    out.push('\n');

    for class in 0..cm.n_classes() {
        let name = label_index.name_of(class).unwrap_or("?");
        out.push_str(&format!(
            "{:>width$} {:>10.2} {:>10.2} {:>10.2} {:>10}\n",
            name,
            metrics.precision[class],
            metrics.recall[class],
            metrics.f1[class],
            metrics.support[class],
            width = name_width,
        ));
    }

    out.push_str(&"-".repeat(name_width + 44));
    out.push('\n');

    let total = metrics.total_support();
    out.push_str(&format!(
        "{:>width$} {:>10.2} {:>10.2} {:>10.2} {:>10}\n",
        "macro avg",
        metrics.macro_precision(),
        metrics.macro_recall(),
        metrics.macro_f1(),
        total,
        width = name_width,
    ));
    out.push_str(&format!(
        "{:>width$} {:>10.2} {:>10.2} {:>10.2} {:>10}\n",
        "weighted avg",
        metrics.weighted_precision(),
        metrics.weighted_recall(),
        metrics.weighted_f1(),
        total,
        width = name_width,
    ));

    out.push_str(&format!("\nAccuracy: {:.4}\n", metrics.accuracy));
    out
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_names_every_category() {
        let index = LabelIndex::from_names(vec![
            "благодарность".into(),
            "вопрос".into(),
            "жалоба".into(),
        ]);
        let cm = ConfusionMatrix::from_predictions(&[0, 1, 2, 2], &[0, 1, 2, 1], 3);
        let report = classification_report(&cm, &index);

        for name in index.names() {
            assert!(report.contains(name.as_str()), "missing {name}");
        }
        assert!(report.contains("macro avg"));
        assert!(report.contains("weighted avg"));
        assert!(report.contains("Accuracy: 0.7500"));
    }

    #[test]
    fn test_report_perfect_run() {
        let index = LabelIndex::from_names(vec!["A".into(), "B".into()]);
        let cm = ConfusionMatrix::from_predictions(&[0, 1, 0], &[0, 1, 0], 2);
        let report = classification_report(&cm, &index);
        assert!(report.contains("Accuracy: 1.0000"));
    }
}

// ============================================================
// Layer 5 — Confusion-Matrix Heatmap
// ============================================================
// Shaded text rendering of the confusion matrix. Each cell shows
// its count annotated with a shade block scaled against the
// largest cell, so the diagonal (or any systematic confusion)
// is visible at a glance in a terminal or a log file:
//
//                          predicted →
//                 благодарность    вопрос    жалоба
//   благодарность     █   41       ░    2       ░    0
//          вопрос     ░    3       ▓   28       ░    1
//          жалоба     ░    0       ░    4       █   37
//
// Rows are true labels, columns predicted labels, both in
// LabelIndex id order.

use crate::domain::label_index::LabelIndex;
use crate::eval::confusion::ConfusionMatrix;

const SHADES: [char; 4] = ['░', '▒', '▓', '█'];
const CELL_WIDTH: usize = 10;

/// Render the confusion matrix as an annotated text heatmap.
pub fn render_heatmap(cm: &ConfusionMatrix, label_index: &LabelIndex) -> String {
    let n = cm.n_classes();
    let names: Vec<&str> = (0..n).map(|id| label_index.name_of(id).unwrap_or("?")).collect();

    let row_width = names.iter().map(|n| n.chars().count()).max().unwrap_or(4).max(4);
    let max_cell = cm.max_cell().max(1);

    let mut out = String::new();

    // Column header: predicted category names, truncated to cell width
    out.push_str(&format!("{:>row_width$}  predicted →\n", "", row_width = row_width));
    out.push_str(&" ".repeat(row_width + 2));
    for name in &names {
        out.push_str(&format!("{:>CELL_WIDTH$}", truncate(name, CELL_WIDTH - 1)));
    }
    out.push('\n');

    for (true_id, name) in names.iter().enumerate() {
        out.push_str(&format!("{:>row_width$}  ", name, row_width = row_width));
        for pred_id in 0..n {
            let count = cm.get(true_id, pred_id);
            // Scale the shade against the largest cell; zero cells
            // get the lightest shade so the grid stays readable
            let idx = (count * (SHADES.len() - 1) + max_cell - 1) / max_cell;
            let shade = SHADES[idx.min(SHADES.len() - 1)];
            out.push_str(&format!("{:>width$}", format!("{shade} {count}"), width = CELL_WIDTH));
        }
        out.push('\n');
    }

    out
}

fn truncate(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        name.to_string()
    } else {
        name.chars().take(max_chars.saturating_sub(1)).chain(['…']).collect()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> LabelIndex {
        LabelIndex::from_names(vec!["вопрос".into(), "жалоба".into()])
    }

    #[test]
    fn test_one_row_per_category_plus_header() {
        let cm = ConfusionMatrix::from_predictions(&[0, 0, 1, 1], &[0, 1, 1, 1], 2);
        let heatmap = render_heatmap(&cm, &index());
        assert_eq!(heatmap.lines().count(), 2 + 2);
    }

    #[test]
    fn test_counts_annotated() {
        let cm = ConfusionMatrix::from_predictions(&[0, 0, 0, 1], &[0, 0, 0, 1], 2);
        let heatmap = render_heatmap(&cm, &index());
        assert!(heatmap.contains("█ 3"));
        assert!(heatmap.contains("░ 0"));
    }

    #[test]
    fn test_axis_labels_present() {
        let cm = ConfusionMatrix::new(2);
        let heatmap = render_heatmap(&cm, &index());
        assert!(heatmap.contains("вопрос"));
        assert!(heatmap.contains("жалоба"));
        assert!(heatmap.contains("predicted"));
    }

    #[test]
    fn test_long_names_truncated_in_header() {
        let index = LabelIndex::from_names(vec![
            "очень длинное название категории".into(),
            "x".into(),
        ]);
        let cm = ConfusionMatrix::new(2);
        let heatmap = render_heatmap(&cm, &index);
        assert!(heatmap.contains('…'));
    }
}

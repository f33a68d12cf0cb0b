// ============================================================
// Layer 2 — Report Use Case
// ============================================================
// Re-evaluates a finished run's best checkpoint on its held-out
// partition without retraining. The test partition is not stored
// on disk: it is re-derived from the saved run config (same
// file, same cleaning, same fraction, same seed), relying on the
// splitter's determinism guarantee. The cleaned row count stamped
// into the config at train time guards the re-derivation: a
// changed source file is an error, not a silently drifted split.
//
// Output: the full classification report and the confusion
// matrix heatmap, printed and written to the artifact directory
// as confusion_matrix.txt.

use anyhow::{bail, Result};
use std::fs;

use crate::application::train_use_case::{build_loader, model_config};
use crate::data::dataset::{encode_records, CommentDataset};
use crate::data::splitter::stratified_split;
use crate::domain::label_index::LabelIndex;
use crate::domain::traits::{CommentSource, TextEncoder};
use crate::eval::confusion::ConfusionMatrix;
use crate::eval::heatmap::render_heatmap;
use crate::eval::report::classification_report;
use crate::infra::{checkpoint::CheckpointManager, tokenizer_store::TokenizerStore};
use crate::ml::inferencer::Inferencer;
use crate::ml::model::CommentClassifierConfig;

pub struct ReportUseCase {
    artifact_dir: String,
}

impl ReportUseCase {
    pub fn new(artifact_dir: String) -> Self {
        Self { artifact_dir }
    }

    pub fn execute(&self) -> Result<()> {
        let ckpt_manager = CheckpointManager::new(&self.artifact_dir);
        let cfg          = ckpt_manager.load_config()?;
        let label_index  = ckpt_manager.load_label_index()?;

        // Rebuild the deterministic held-out partition
        let records = build_loader(&cfg).load_all()?;
        verify_row_count(cfg.cleaned_rows, records.len())?;
        let (_, test_records) = stratified_split(records, cfg.test_fraction, cfg.seed)?;

        let tokenizer = TokenizerStore::new(&self.artifact_dir).load()?;
        let test_samples =
            encode_records(&test_records, &tokenizer, &label_index, cfg.max_seq_len)?;
        let test_dataset = CommentDataset::new(test_samples);

        let eval_cfg = model_config(&cfg, tokenizer.vocab_size(), label_index.num_classes(), 0.0);
        evaluate_best_checkpoint(
            &ckpt_manager,
            &label_index,
            &test_dataset,
            &eval_cfg,
            cfg.batch_size,
        )
    }
}

/// Compare the current cleaned row count against the one stamped
/// at train time. A mismatch means the re-derived partition would
/// no longer be the rows the model was held out from.
fn verify_row_count(recorded: Option<usize>, actual: usize) -> Result<()> {
    match recorded {
        Some(expected) if expected != actual => bail!(
            "Dataset changed since training: {expected} cleaned rows were recorded, \
             found {actual}. Re-run 'train' on the current file."
        ),
        _ => Ok(()),
    }
}

/// Run the best checkpoint over the held-out partition and emit
/// the classification report plus the confusion-matrix heatmap.
///
/// Shared by `train` (as its final step) and `report`.
pub fn evaluate_best_checkpoint(
    ckpt_manager: &CheckpointManager,
    label_index:  &LabelIndex,
    test_dataset: &CommentDataset,
    model_cfg:    &CommentClassifierConfig,
    batch_size:   usize,
) -> Result<()> {
    let inferencer  = Inferencer::from_checkpoint(ckpt_manager, model_cfg, batch_size)?;
    let predictions = inferencer.predict_dataset(test_dataset);

    let y_true = test_dataset.labels();
    let y_pred: Vec<usize> = predictions.iter().map(|p| p.predicted).collect();

    let cm = ConfusionMatrix::from_predictions(&y_true, &y_pred, label_index.num_classes());

    let report  = classification_report(&cm, label_index);
    let heatmap = render_heatmap(&cm, label_index);

    println!("\n{report}");
    println!("{heatmap}");

    let heatmap_path = ckpt_manager.dir().join("confusion_matrix.txt");
    fs::write(&heatmap_path, format!("{report}\n{heatmap}"))?;
    tracing::info!("Wrote confusion matrix to '{}'", heatmap_path.display());

    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_row_count_passes() {
        assert!(verify_row_count(Some(120), 120).is_ok());
    }

    #[test]
    fn test_changed_row_count_is_an_error() {
        let err = verify_row_count(Some(120), 97).unwrap_err().to_string();
        assert!(err.contains("120"));
        assert!(err.contains("97"));
    }

    #[test]
    fn test_unstamped_config_is_accepted() {
        // configs written before the row count was stamped
        assert!(verify_row_count(None, 50).is_ok());
    }
}

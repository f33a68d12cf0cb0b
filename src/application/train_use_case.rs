// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Runs the full fine-tuning pipeline, strictly linear:
//
//   Step 1: Load + clean the CSV export      (Layer 4 - data)
//   Step 2: Build the label index            (Layer 3 - domain)
//   Step 3: Stratified train/test split      (Layer 4 - data)
//   Step 4: Fetch/cache pretrained tokenizer (Layer 6 - infra)
//   Step 5: Encode both partitions           (Layer 4 - data)
//   Step 6: Persist run manifest             (Layer 6 - infra)
//   Step 7: Fine-tune with early stopping    (Layer 5 - ml)
//   Step 8: Final report on held-out data    (Layer 2 + 5)

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::application::report_use_case::evaluate_best_checkpoint;
use crate::data::{
    dataset::{encode_records, CommentDataset},
    loader::CsvCommentLoader,
    splitter::stratified_split,
};
use crate::domain::label_index::LabelIndex;
use crate::domain::traits::{CommentSource, TextEncoder};
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics_log::MetricsLogger,
    tokenizer_store::TokenizerStore,
};
use crate::ml::model::CommentClassifierConfig;
use crate::ml::trainer::run_training;

// ─── Training Configuration ──────────────────────────────────────────────────
// Every knob of a run, assembled once at call time and immutable
// afterwards. Serialised to the artifact directory so `report`
// and `classify` can rebuild the exact model and the exact
// deterministic data split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    // data
    pub data_path:           String,
    pub text_column:         String,
    pub category_column:     String,
    pub delimiter:           char,
    pub excluded_categories: Vec<String>,

    // artifacts / pretrained
    pub artifact_dir:        String,
    pub tokenizer_id:        String,
    pub pretrained_encoder:  Option<String>,

    // split — test_fraction deliberately has no default anywhere
    pub test_fraction:       f64,
    pub seed:                u64,

    // stamped at train time once cleaning is done, so `report`
    // can detect a source file that changed since the run
    #[serde(default)]
    pub cleaned_rows:        Option<usize>,

    // optimisation
    pub max_seq_len:         usize,
    pub batch_size:          usize,
    pub epochs:              usize,
    pub lr:                  f64,
    pub weight_decay:        f64,
    pub patience:            usize,

    // architecture
    pub d_model:             usize,
    pub num_heads:           usize,
    pub num_layers:          usize,
    pub d_ff:                usize,
    pub dropout:             f64,
}

/// The CSV loader for this run's cleaning rules.
pub fn build_loader(cfg: &TrainConfig) -> CsvCommentLoader {
    CsvCommentLoader::new(
        &cfg.data_path,
        &cfg.text_column,
        &cfg.category_column,
        cfg.delimiter as u8,
        &cfg.excluded_categories,
    )
}

/// The model architecture for this run. `dropout` is passed
/// separately because inference rebuilds the same architecture
/// with dropout 0.
pub fn model_config(
    cfg:         &TrainConfig,
    vocab_size:  usize,
    num_classes: usize,
    dropout:     f64,
) -> CommentClassifierConfig {
    CommentClassifierConfig::new(
        vocab_size,
        cfg.max_seq_len,
        num_classes,
        cfg.d_model,
        cfg.num_heads,
        cfg.num_layers,
        cfg.d_ff,
        dropout,
    )
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end.
    pub fn execute(&self) -> Result<()> {
        let mut cfg = self.config.clone();

        if !(cfg.test_fraction > 0.0 && cfg.test_fraction < 1.0) {
            bail!("--test-fraction must lie in (0, 1), got {}", cfg.test_fraction);
        }
        if cfg.epochs < 1 {
            bail!("--epochs must be at least 1, got {}", cfg.epochs);
        }
        // char → u8 below; a multi-byte delimiter would truncate
        if !cfg.delimiter.is_ascii() {
            bail!("--delimiter must be an ASCII character, got '{}'", cfg.delimiter);
        }

        // ── Step 1: Load + clean ──────────────────────────────────────────────
        tracing::info!("Loading dataset from '{}'", cfg.data_path);
        let records = build_loader(&cfg).load_all()?;
        if records.is_empty() {
            bail!("No usable rows left after cleaning '{}'", cfg.data_path);
        }
        cfg.cleaned_rows = Some(records.len());

        // ── Step 2: Label index ───────────────────────────────────────────────
        // Built exactly once from cleaned data, then passed by
        // reference everywhere — never recomputed mid-pipeline
        let label_index = LabelIndex::from_records(&records);
        if label_index.num_classes() < 2 {
            bail!(
                "Classification needs at least 2 categories, found {}",
                label_index.num_classes()
            );
        }
        tracing::info!(
            "Label index: {} categories: {:?}",
            label_index.num_classes(),
            label_index.names(),
        );

        // ── Step 3: Stratified split ──────────────────────────────────────────
        let (train_records, test_records) =
            stratified_split(records, cfg.test_fraction, cfg.seed)?;

        // ── Step 4: Pretrained tokenizer ──────────────────────────────────────
        let tok_store = TokenizerStore::new(&cfg.artifact_dir);
        let tokenizer = tok_store.load_or_fetch(&cfg.tokenizer_id)?;
        let vocab_size = tokenizer.vocab_size();

        // ── Step 5: Encode both partitions ────────────────────────────────────
        let train_samples =
            encode_records(&train_records, &tokenizer, &label_index, cfg.max_seq_len)?;
        let test_samples =
            encode_records(&test_records, &tokenizer, &label_index, cfg.max_seq_len)?;
        tracing::info!(
            "Encoded {} train / {} test samples at length {}",
            train_samples.len(), test_samples.len(), cfg.max_seq_len,
        );

        let train_dataset = CommentDataset::new(train_samples);
        let test_dataset  = CommentDataset::new(test_samples);

        // ── Step 6: Persist run manifest ──────────────────────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.artifact_dir);
        ckpt_manager.save_config(&cfg)?;
        ckpt_manager.save_label_index(&label_index)?;
        let metrics_log = MetricsLogger::new(&cfg.artifact_dir)?;

        // ── Step 7: Fine-tune ─────────────────────────────────────────────────
        let model_cfg = model_config(&cfg, vocab_size, label_index.num_classes(), cfg.dropout);
        let outcome = run_training(
            &cfg,
            &model_cfg,
            train_dataset,
            test_dataset.clone_samples(),
            &ckpt_manager,
            &metrics_log,
        )?;
        if outcome.stopped_early {
            tracing::info!("Run stopped early with best epoch {}", outcome.best_epoch);
        }

        // ── Step 8: Final report over the held-out partition ──────────────────
        let eval_cfg = model_config(&cfg, vocab_size, label_index.num_classes(), 0.0);
        evaluate_best_checkpoint(
            &ckpt_manager,
            &label_index,
            &test_dataset,
            &eval_cfg,
            cfg.batch_size,
        )?;

        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    /// A config that passes validation; the data path does not
    /// exist, so any run getting past the checks fails at load.
    fn config() -> TrainConfig {
        TrainConfig {
            data_path:           "comments.csv".into(),
            text_column:         "Комментарий".into(),
            category_column:     "Категория".into(),
            delimiter:           ',',
            excluded_categories: vec![],
            artifact_dir:        "artifacts".into(),
            tokenizer_id:        "tokenizer".into(),
            pretrained_encoder:  None,
            test_fraction:       0.2,
            seed:                42,
            cleaned_rows:        None,
            max_seq_len:         512,
            batch_size:          16,
            epochs:              10,
            lr:                  2e-5,
            weight_decay:        0.01,
            patience:            3,
            d_model:             256,
            num_heads:           8,
            num_layers:          4,
            d_ff:                1024,
            dropout:             0.1,
        }
    }

    #[test]
    fn test_rejects_zero_epochs() {
        let mut cfg = config();
        cfg.epochs = 0;
        let err = TrainUseCase::new(cfg).execute().unwrap_err().to_string();
        assert!(err.contains("--epochs"));
    }

    #[test]
    fn test_rejects_non_ascii_delimiter() {
        let mut cfg = config();
        cfg.delimiter = 'я';
        let err = TrainUseCase::new(cfg).execute().unwrap_err().to_string();
        assert!(err.contains("--delimiter"));
    }

    #[test]
    fn test_rejects_out_of_range_fraction() {
        for fraction in [0.0, 1.0, -0.5, 1.5] {
            let mut cfg = config();
            cfg.test_fraction = fraction;
            let err = TrainUseCase::new(cfg).execute().unwrap_err().to_string();
            assert!(err.contains("--test-fraction"), "fraction {fraction}: {err}");
        }
    }
}

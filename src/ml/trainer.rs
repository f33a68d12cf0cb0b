// ============================================================
// Layer 5 — Fine-Tuning Loop
// ============================================================
// Manual train + evaluation loop over the classifier using
// Burn's DataLoader and AdamW (weight decay 0.01).
//
// Per epoch:
//   Train-step × N  → Evaluate on the held-out partition
//                   → Checkpoint
//                   → Continue | Stop (patience) | Stop (limit)
//
// Checkpoint selection is keyed on macro F1: the best-epoch
// pointer is only advanced on improvement, and three consecutive
// evaluations without improvement stop the run (early stopping
// is a normal termination path, not an error). After the loop
// the best checkpoint is the active model.
//
// Device memory exhaustion during a step aborts the run; the
// mitigation is a smaller --batch-size, not a retry.
//
// Backend notes (teacher pattern):
//   - training runs on Autodiff<Wgpu> for gradients
//   - model.valid() strips autodiff for evaluation
//   - numeric precision is the backend alias's element type, so
//     switching it is a one-line change here
//
// Reference: Loshchilov & Hutter (2019) AdamW

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamWConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::CommentBatcher, dataset::CommentDataset};
use crate::eval::metrics::ClassificationMetrics;
use crate::infra::checkpoint::{self, CheckpointManager};
use crate::infra::metrics_log::{EpochMetrics, MetricsLogger};
use crate::ml::model::{CommentClassifier, CommentClassifierConfig};

type MyBackend      = burn::backend::Autodiff<burn::backend::Wgpu>;
type MyInnerBackend = burn::backend::Wgpu;

/// How a finished run terminated and what it selected.
#[derive(Debug, Clone)]
pub struct TrainOutcome {
    pub best_epoch:    usize,
    pub best_macro_f1: f64,
    pub stopped_early: bool,
}

// ─── Early Stopping ───────────────────────────────────────────────────────────
/// Checkpoint-selection state, kept apart from the device loop so
/// the stop/keep rules are plain-CPU testable.
///
/// Tracks the best validation macro F1, the epoch that produced
/// it, and the consecutive non-improving epochs (strikes). Once
/// strikes reach `patience` the run should stop; the best-epoch
/// pointer stays on the best-F1 epoch regardless of what happens
/// afterwards.
#[derive(Debug, Clone)]
pub struct EarlyStopping {
    patience:      usize,
    best_macro_f1: f64,
    best_epoch:    usize,
    strikes:       usize,
}

impl EarlyStopping {
    pub fn new(patience: usize) -> Self {
        Self {
            patience,
            best_macro_f1: f64::NEG_INFINITY,
            best_epoch:    0,
            strikes:       0,
        }
    }

    /// Record one epoch's evaluation. Returns true when the epoch
    /// sets a new best macro F1 — the caller then advances the
    /// on-disk best-epoch pointer.
    pub fn observe(&mut self, metrics: &EpochMetrics) -> bool {
        if metrics.is_improvement(self.best_macro_f1) {
            self.best_macro_f1 = metrics.val_macro_f1;
            self.best_epoch    = metrics.epoch;
            self.strikes       = 0;
            true
        } else {
            self.strikes += 1;
            false
        }
    }

    /// True once `patience` consecutive epochs brought no improvement.
    pub fn should_stop(&self) -> bool {
        self.strikes >= self.patience
    }

    pub fn best_epoch(&self) -> usize {
        self.best_epoch
    }

    pub fn best_macro_f1(&self) -> f64 {
        self.best_macro_f1
    }

    pub fn strikes(&self) -> usize {
        self.strikes
    }
}

pub fn run_training(
    cfg:           &TrainConfig,
    model_cfg:     &CommentClassifierConfig,
    train_dataset: CommentDataset,
    test_dataset:  CommentDataset,
    ckpt_manager:  &CheckpointManager,
    metrics_log:   &MetricsLogger,
) -> Result<TrainOutcome> {
    let device = burn::backend::wgpu::WgpuDevice::default();
    tracing::info!("Using WGPU device: {:?}", device);

    // ── Build model ───────────────────────────────────────────────────────────
    let mut model: CommentClassifier<MyBackend> = model_cfg.init(&device);
    model = match &cfg.pretrained_encoder {
        Some(path) => {
            checkpoint::load_pretrained_encoder(model, std::path::Path::new(path), &device)?
        }
        None => {
            tracing::warn!(
                "No pretrained encoder record supplied — fine-tuning from random init"
            );
            model
        }
    };
    tracing::info!(
        "Model ready: {} classes, {} layers, d_model={}",
        model_cfg.num_classes, model_cfg.num_layers, model_cfg.d_model,
    );

    // ── AdamW optimiser ───────────────────────────────────────────────────────
    let optim_cfg = AdamWConfig::new().with_weight_decay(cfg.weight_decay as f32);
    let mut optim = optim_cfg.init();

    // ── Training data loader (AutodiffBackend) ────────────────────────────────
    let train_batcher = CommentBatcher::<MyBackend>::new(device.clone());
    let train_loader  = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_dataset);

    // ── Evaluation data loader (InnerBackend — no autodiff overhead) ──────────
    let val_batcher = CommentBatcher::<MyInnerBackend>::new(device.clone());
    let val_loader  = DataLoaderBuilder::new(val_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(test_dataset);

    // ── Epoch loop ────────────────────────────────────────────────────────────
    let mut stopper       = EarlyStopping::new(cfg.patience);
    let mut stopped_early = false;

    for epoch in 1..=cfg.epochs {

        // ── Training phase ────────────────────────────────────────────────────
        let mut train_loss_sum = 0.0f64;
        let mut train_batches  = 0usize;

        for batch in train_loader.iter() {
            let (loss, _) = model.forward_loss(batch.input_ids, batch.pad_mask, batch.labels);

            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            train_loss_sum += loss_val;
            train_batches  += 1;

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let avg_train_loss = if train_batches > 0 {
            train_loss_sum / train_batches as f64
        } else {
            f64::NAN
        };

        // ── Evaluation phase ──────────────────────────────────────────────────
        // model.valid() → CommentClassifier<MyInnerBackend>,
        // dropout disabled for deterministic evaluation
        let model_valid = model.valid();

        let mut val_loss_sum = 0.0f64;
        let mut val_batches  = 0usize;
        let mut y_true: Vec<usize> = Vec::new();
        let mut y_pred: Vec<usize> = Vec::new();

        for batch in val_loader.iter() {
            let (loss, logits) = model_valid.forward_loss(
                batch.input_ids,
                batch.pad_mask,
                batch.labels.clone(),
            );
            val_loss_sum += loss.into_scalar().elem::<f64>();
            val_batches  += 1;

            // argmax(1) returns [batch, 1] — flatten to [batch]
            let preds = logits.argmax(1).flatten::<1>(0, 1);
            let preds: Vec<i64>  = preds.into_data().convert::<i64>().value;
            let truths: Vec<i64> = batch.labels.into_data().convert::<i64>().value;

            y_pred.extend(preds.into_iter().map(|p| p as usize));
            y_true.extend(truths.into_iter().map(|t| t as usize));
        }

        let avg_val_loss = if val_batches > 0 {
            val_loss_sum / val_batches as f64
        } else {
            f64::NAN
        };

        let val_metrics =
            ClassificationMetrics::from_predictions(&y_true, &y_pred, model_cfg.num_classes);
        let epoch_metrics = EpochMetrics::new(
            epoch,
            avg_train_loss,
            avg_val_loss,
            val_metrics.accuracy,
            val_metrics.macro_f1(),
        );

        println!(
            "Epoch {:>3}/{} | train_loss={:.4} | val_loss={:.4} | acc={:.1}% | macro_f1={:.4}",
            epoch, cfg.epochs, avg_train_loss, avg_val_loss,
            val_metrics.accuracy * 100.0, val_metrics.macro_f1(),
        );

        metrics_log.log(&epoch_metrics)?;

        // ── Checkpoint + best selection + early stopping ──────────────────────
        ckpt_manager.save_model(&model, epoch)?;

        if stopper.observe(&epoch_metrics) {
            ckpt_manager.save_best_epoch(epoch)?;
            tracing::info!(
                "New best macro F1 {:.4} at epoch {}",
                stopper.best_macro_f1(), epoch,
            );
        } else {
            tracing::info!(
                "No macro F1 improvement ({} of {} strikes)",
                stopper.strikes(), cfg.patience,
            );
            if stopper.should_stop() {
                tracing::info!(
                    "Early stopping after epoch {} — best was epoch {} (macro F1 {:.4})",
                    epoch, stopper.best_epoch(), stopper.best_macro_f1(),
                );
                stopped_early = true;
                break;
            }
        }
    }

    tracing::info!(
        "Training complete: best epoch {} with macro F1 {:.4}",
        stopper.best_epoch(), stopper.best_macro_f1(),
    );

    Ok(TrainOutcome {
        best_epoch:    stopper.best_epoch(),
        best_macro_f1: stopper.best_macro_f1(),
        stopped_early,
    })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(epoch: usize, macro_f1: f64) -> EpochMetrics {
        EpochMetrics::new(epoch, 1.0, 1.0, 0.5, macro_f1)
    }

    #[test]
    fn test_stops_after_three_non_improving_epochs() {
        let mut stopper = EarlyStopping::new(3);
        assert!(stopper.observe(&metrics(1, 0.60)));

        // Equal F1 is not an improvement (strictly greater wins)
        assert!(!stopper.observe(&metrics(2, 0.55)));
        assert!(!stopper.should_stop());
        assert!(!stopper.observe(&metrics(3, 0.60)));
        assert!(!stopper.should_stop());
        assert!(!stopper.observe(&metrics(4, 0.58)));

        assert!(stopper.should_stop());
        assert_eq!(stopper.best_epoch(), 1);
        assert!((stopper.best_macro_f1() - 0.60).abs() < 1e-12);
    }

    #[test]
    fn test_improvement_resets_strikes() {
        let mut stopper = EarlyStopping::new(3);
        stopper.observe(&metrics(1, 0.40));
        stopper.observe(&metrics(2, 0.35));
        stopper.observe(&metrics(3, 0.30));
        assert_eq!(stopper.strikes(), 2);

        assert!(stopper.observe(&metrics(4, 0.45)));
        assert_eq!(stopper.strikes(), 0);
        assert_eq!(stopper.best_epoch(), 4);

        // Two more bad epochs are still short of the patience
        stopper.observe(&metrics(5, 0.20));
        stopper.observe(&metrics(6, 0.20));
        assert!(!stopper.should_stop());
    }

    #[test]
    fn test_epoch_limit_without_early_stop() {
        // Monotone improvement: the run reaches its epoch limit
        // and never trips the stopper
        let mut stopper = EarlyStopping::new(3);
        for epoch in 1..=10 {
            assert!(stopper.observe(&metrics(epoch, epoch as f64 / 10.0)));
            assert!(!stopper.should_stop());
        }
        assert_eq!(stopper.best_epoch(), 10);
    }

    #[test]
    fn test_best_pointer_survives_later_worse_epochs() {
        let mut stopper = EarlyStopping::new(5);
        stopper.observe(&metrics(1, 0.50));
        stopper.observe(&metrics(2, 0.70));
        stopper.observe(&metrics(3, 0.65));
        stopper.observe(&metrics(4, 0.60));
        assert_eq!(stopper.best_epoch(), 2);
        assert!((stopper.best_macro_f1() - 0.70).abs() < 1e-12);
    }
}

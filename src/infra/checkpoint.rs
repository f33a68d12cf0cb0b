// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Owns the artifact directory layout of one training run:
//
//   <artifact_dir>/
//     model_epoch_1.mpk.gz   ← weights after epoch 1
//     model_epoch_2.mpk.gz   ← ...one snapshot per epoch
//     best_epoch.json        ← epoch with the best macro F1
//     train_config.json      ← full run configuration
//     label_index.json       ← id-ordered category names
//     tokenizer.json         ← cached pretrained tokenizer
//     metrics.csv            ← per-epoch metrics log
//
// Checkpoints are written sequentially at epoch boundaries; the
// best_epoch pointer is updated only when macro F1 improves, so
// "load best model at end" is just a pointer dereference.
//
// Burn's CompactRecorder serialises the module record to
// MessagePack + gzip and is type-safe on reload: loading fails
// if the architecture doesn't match the saved record.

use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};

use crate::application::train_use_case::TrainConfig;
use crate::domain::label_index::LabelIndex;
use crate::ml::model::CommentClassifier;

pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a manager for the given artifact directory,
    /// creating the directory if needed.
    pub fn new(dir: impl Into<String>) -> Self {
        let dir = PathBuf::from(dir.into());
        fs::create_dir_all(&dir).ok();
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save model weights for a given epoch.
    pub fn save_model<B: Backend>(
        &self,
        model: &CommentClassifier<B>,
        epoch: usize,
    ) -> Result<()> {
        let path = self.dir.join(format!("model_epoch_{epoch}"));

        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save checkpoint to '{}'", path.display()))?;

        tracing::debug!("Saved checkpoint: epoch {}", epoch);
        Ok(())
    }

    /// Update the best-epoch pointer after a macro F1 improvement.
    pub fn save_best_epoch(&self, epoch: usize) -> Result<()> {
        let path = self.dir.join("best_epoch.json");
        fs::write(&path, serde_json::to_string(&epoch)?)
            .with_context(|| "Failed to write best_epoch.json")?;
        Ok(())
    }

    /// Epoch number of the best checkpoint so far.
    pub fn best_epoch(&self) -> Result<usize> {
        let path = self.dir.join("best_epoch.json");
        let s = fs::read_to_string(&path).with_context(|| {
            "Cannot find 'best_epoch.json'. Has training been run in this directory?"
        })?;
        Ok(serde_json::from_str::<usize>(&s)?)
    }

    /// Load the best checkpoint's weights into `model`.
    ///
    /// The model must have the same architecture as the saved
    /// record or loading fails.
    pub fn load_best_model<B: Backend>(
        &self,
        model:  CommentClassifier<B>,
        device: &B::Device,
    ) -> Result<CommentClassifier<B>> {
        let epoch = self.best_epoch()?;
        let path  = self.dir.join(format!("model_epoch_{epoch}"));

        tracing::info!("Loading best checkpoint (epoch {})", epoch);

        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| format!("Cannot load checkpoint '{}'", path.display()))?;

        Ok(model.load_record(record))
    }

    /// Persist the full run configuration.
    /// Must happen before training so `report` and `classify`
    /// can rebuild the exact model and data split later.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join("train_config.json");
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;
        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join("train_config.json");
        let json = fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read config from '{}'. Run 'train' before 'report'/'classify'.",
                path.display()
            )
        })?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Persist the label index (id-ordered category names).
    pub fn save_label_index(&self, index: &LabelIndex) -> Result<()> {
        let path = self.dir.join("label_index.json");
        fs::write(&path, serde_json::to_string_pretty(index)?)
            .with_context(|| format!("Cannot write label index to '{}'", path.display()))?;
        Ok(())
    }

    pub fn load_label_index(&self) -> Result<LabelIndex> {
        let path = self.dir.join("label_index.json");
        let json = fs::read_to_string(&path).with_context(|| {
            format!("Cannot read label index from '{}'", path.display())
        })?;
        let index: LabelIndex = serde_json::from_str(&json)?;
        Ok(index.rebuild())
    }
}

/// Initialise the model's encoder from a pretrained record file,
/// leaving the freshly initialised classification head untouched.
pub fn load_pretrained_encoder<B: Backend>(
    model:  CommentClassifier<B>,
    path:   &Path,
    device: &B::Device,
) -> Result<CommentClassifier<B>> {
    let record = CompactRecorder::new()
        .load(path.to_path_buf(), device)
        .with_context(|| {
            format!("Cannot load pretrained encoder record '{}'", path.display())
        })?;

    tracing::info!("Initialised encoder from pretrained record '{}'", path.display());
    Ok(model.load_encoder_record(record))
}

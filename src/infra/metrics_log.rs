// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records training metrics to a CSV file after each epoch:
//
//   epoch,train_loss,val_loss,val_accuracy,val_macro_f1
//   1,1.821400,1.634200,0.412000,0.287400
//   2,1.240900,1.101800,0.569000,0.501200
//   ...
//
// Macro F1 is the metric that drives checkpoint selection and
// early stopping; the rest are there for learning-curve plots
// and overfitting diagnosis (val_loss rising while train_loss
// falls).

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};
use serde::{Deserialize, Serialize};

/// One row of metrics for a single training epoch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Average cross-entropy loss over all training batches
    pub train_loss: f64,

    /// Average cross-entropy loss on the held-out partition
    pub val_loss: f64,

    /// Fraction of held-out samples classified correctly
    pub val_accuracy: f64,

    /// Unweighted mean of per-class F1 on the held-out partition
    pub val_macro_f1: f64,
}

impl EpochMetrics {
    pub fn new(
        epoch:        usize,
        train_loss:   f64,
        val_loss:     f64,
        val_accuracy: f64,
        val_macro_f1: f64,
    ) -> Self {
        Self { epoch, train_loss, val_loss, val_accuracy, val_macro_f1 }
    }

    /// True if this epoch beats the best macro F1 seen so far.
    pub fn is_improvement(&self, best_macro_f1: f64) -> bool {
        self.val_macro_f1 > best_macro_f1
    }
}

/// Appends epoch metrics to `metrics.csv` in the artifact dir.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger.
    /// Writes the CSV header only if the file is new, so a
    /// resumed run keeps appending to the same log.
    pub fn new(dir: impl Into<String>) -> Result<Self> {
        let dir = PathBuf::from(dir.into());
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("metrics.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "epoch,train_loss,val_loss,val_accuracy,val_macro_f1")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new CSV row.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new().append(true).open(&self.csv_path)?;

        writeln!(
            f,
            "{},{:.6},{:.6},{:.6},{:.6}",
            m.epoch, m.train_loss, m.val_loss, m.val_accuracy, m.val_macro_f1,
        )?;

        tracing::debug!(
            "Logged epoch {}: train_loss={:.4} val_loss={:.4} macro_f1={:.4}",
            m.epoch,
            m.train_loss,
            m.val_loss,
            m.val_macro_f1,
        );
        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_improvement_on_macro_f1() {
        let m = EpochMetrics::new(2, 1.2, 1.1, 0.6, 0.55);
        assert!(m.is_improvement(0.50));
        assert!(!m.is_improvement(0.55));
        assert!(!m.is_improvement(0.60));
    }
}

// ============================================================
// Layer 5 — Inferencer
// ============================================================
// Loads the best checkpoint of a run and produces per-class raw
// score vectors. Used by the final report over the held-out
// partition and by single-comment classification.
//
// Batches are built by calling the batcher directly on fixed
// chunks, so output scores stay positionally aligned with the
// input samples.

use anyhow::Result;
use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::data::batcher::CommentBatcher;
use crate::data::dataset::{CommentDataset, EncodedComment};
use crate::domain::traits::TextEncoder;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::{CommentClassifier, CommentClassifierConfig};

type InferBackend = burn::backend::Wgpu;

/// Raw scores for one sample plus the argmax class.
#[derive(Debug, Clone)]
pub struct Prediction {
    /// One raw score (logit) per category, in label-index order
    pub scores: Vec<f32>,

    /// argmax of `scores`
    pub predicted: usize,
}

pub struct Inferencer {
    model:       CommentClassifier<InferBackend>,
    batcher:     CommentBatcher<InferBackend>,
    num_classes: usize,
    max_seq_len: usize,
    batch_size:  usize,
}

impl Inferencer {
    /// Rebuild the model architecture from the run config and
    /// load the best checkpoint's weights into it.
    pub fn from_checkpoint(
        ckpt_manager: &CheckpointManager,
        model_cfg:    &CommentClassifierConfig,
        batch_size:   usize,
    ) -> Result<Self> {
        let device = burn::backend::wgpu::WgpuDevice::default();

        let model: CommentClassifier<InferBackend> = model_cfg.init(&device);
        let model = ckpt_manager.load_best_model(model, &device)?;
        tracing::info!("Model loaded from best checkpoint");

        Ok(Self {
            model,
            batcher:     CommentBatcher::new(device),
            num_classes: model_cfg.num_classes,
            max_seq_len: model_cfg.max_seq_len,
            batch_size,
        })
    }

    /// Predict every sample of a dataset, in dataset order.
    pub fn predict_dataset(&self, dataset: &CommentDataset) -> Vec<Prediction> {
        let mut predictions = Vec::with_capacity(dataset.samples().len());

        for chunk in dataset.samples().chunks(self.batch_size) {
            let batch  = self.batcher.batch(chunk.to_vec());
            let logits = self.model.forward(batch.input_ids, batch.pad_mask);
            predictions.extend(self.unpack(logits));
        }

        predictions
    }

    /// Classify a single comment text.
    pub fn predict_text(&self, text: &str, encoder: &dyn TextEncoder) -> Result<Prediction> {
        let (input_ids, attention_mask) = encoder.encode(text, self.max_seq_len)?;
        let sample = EncodedComment { input_ids, attention_mask, label: 0 };

        let batch  = self.batcher.batch(vec![sample]);
        let logits = self.model.forward(batch.input_ids, batch.pad_mask);
        let mut predictions = self.unpack(logits);
        Ok(predictions.remove(0))
    }

    /// Split a [batch, num_classes] logit tensor into per-sample
    /// score vectors with their argmax.
    fn unpack(&self, logits: Tensor<InferBackend, 2>) -> Vec<Prediction> {
        let flat: Vec<f32> = logits.into_data().convert::<f32>().value;

        flat.chunks(self.num_classes)
            .map(|scores| {
                let predicted = scores
                    .iter()
                    .enumerate()
                    .max_by(|a, b| a.1.total_cmp(b.1))
                    .map(|(i, _)| i)
                    .unwrap_or(0);
                Prediction { scores: scores.to_vec(), predicted }
            })
            .collect()
    }
}

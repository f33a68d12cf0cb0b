// ============================================================
// Layer 2 — Classify Use Case
// ============================================================
// Classifies a single comment string with a finished run's best
// checkpoint. Loads the cached tokenizer and the label index
// from the artifact directory so the prediction uses the exact
// vocabulary and category ordering of the training run.

use anyhow::Result;

use crate::application::train_use_case::model_config;
use crate::domain::label_index::LabelIndex;
use crate::domain::traits::TextEncoder;
use crate::infra::{checkpoint::CheckpointManager, tokenizer_store::TokenizerStore};
use crate::infra::tokenizer_store::PretrainedTokenizer;
use crate::ml::inferencer::Inferencer;

/// A classified comment: the winning category plus every
/// category's raw score, in label-index order.
pub struct Classification {
    pub category: String,
    pub scores:   Vec<(String, f32)>,
}

pub struct ClassifyUseCase {
    inferencer:  Inferencer,
    tokenizer:   PretrainedTokenizer,
    label_index: LabelIndex,
}

impl ClassifyUseCase {
    pub fn new(artifact_dir: String) -> Result<Self> {
        let ckpt_manager = CheckpointManager::new(&artifact_dir);
        let cfg          = ckpt_manager.load_config()?;
        let label_index  = ckpt_manager.load_label_index()?;
        let tokenizer    = TokenizerStore::new(&artifact_dir).load()?;

        let eval_cfg =
            model_config(&cfg, tokenizer.vocab_size(), label_index.num_classes(), 0.0);
        let inferencer = Inferencer::from_checkpoint(&ckpt_manager, &eval_cfg, cfg.batch_size)?;

        Ok(Self { inferencer, tokenizer, label_index })
    }

    pub fn classify(&self, text: &str) -> Result<Classification> {
        let prediction = self.inferencer.predict_text(text, &self.tokenizer)?;

        let category = self
            .label_index
            .name_of(prediction.predicted)
            .unwrap_or("?")
            .to_string();

        let scores = prediction
            .scores
            .iter()
            .enumerate()
            .map(|(id, &score)| {
                (self.label_index.name_of(id).unwrap_or("?").to_string(), score)
            })
            .collect();

        Ok(Classification { category, scores })
    }
}

// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `train`, `report`, `classify`
// and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)

use clap::{Args, Subcommand};

use crate::application::train_use_case::TrainConfig;

/// The three top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fine-tune the comment classifier on a labelled CSV export
    Train(TrainArgs),

    /// Re-evaluate a finished run's best checkpoint on its held-out data
    Report(ReportArgs),

    /// Classify a single comment with a trained checkpoint
    Classify(ClassifyArgs),
}

/// All arguments for the `train` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Path to the labelled CSV export
    #[arg(long)]
    pub data_path: String,

    /// Column holding the comment text
    #[arg(long, default_value = "Комментарий")]
    pub text_column: String,

    /// Column holding the category label
    #[arg(long, default_value = "Категория")]
    pub category_column: String,

    /// CSV field delimiter
    #[arg(long, default_value_t = ',')]
    pub delimiter: char,

    /// Categories removed during cleaning (repeat the flag to add more)
    #[arg(long = "exclude", default_values_t = [
        "Другое".to_string(),
        "Спам".to_string(),
        "Без категории".to_string(),
    ])]
    pub excluded_categories: Vec<String>,

    /// Directory for checkpoints, tokenizer cache, metrics and reports
    #[arg(long)]
    pub artifact_dir: String,

    /// Hub id of the pretrained tokenizer to fetch and cache
    #[arg(long, default_value = "cointegrated/rubert-tiny2")]
    pub tokenizer_id: String,

    /// Optional pretrained encoder record to warm-start from.
    /// Without it the encoder starts from random initialisation.
    #[arg(long)]
    pub pretrained_encoder: Option<String>,

    /// Fraction of each category held out for evaluation,
    /// strictly between 0 and 1. No default — choose it per run.
    #[arg(long)]
    pub test_fraction: f64,

    /// Seed for the deterministic stratified split
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Fixed token length every comment is truncated/padded to
    #[arg(long, default_value_t = 512)]
    pub max_seq_len: usize,

    /// Number of samples processed together in one forward pass
    #[arg(long, default_value_t = 16)]
    pub batch_size: usize,

    /// Maximum number of full passes through the training data
    #[arg(long, default_value_t = 10)]
    pub epochs: usize,

    /// Learning rate — fine-tuning wants it small
    #[arg(long, default_value_t = 2e-5)]
    pub lr: f64,

    /// Hidden dimension of the transformer (d_model in the paper)
    #[arg(long, default_value_t = 256)]
    pub d_model: usize,

    /// Number of attention heads in multi-head attention.
    /// d_model must be divisible by num_heads
    #[arg(long, default_value_t = 8)]
    pub num_heads: usize,

    /// Number of stacked encoder layers
    #[arg(long, default_value_t = 4)]
    pub num_layers: usize,

    /// Inner dimension of the feed-forward network
    #[arg(long, default_value_t = 1024)]
    pub d_ff: usize,

    /// Dropout probability during training
    #[arg(long, default_value_t = 0.1)]
    pub dropout: f64,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// This is the boundary between Layer 1 and Layer 2 —
/// the application layer never sees clap types.
///
/// Weight decay and early-stopping patience are fixed run
/// parameters, not flags.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_path:           a.data_path,
            text_column:         a.text_column,
            category_column:     a.category_column,
            delimiter:           a.delimiter,
            excluded_categories: a.excluded_categories,
            artifact_dir:        a.artifact_dir,
            tokenizer_id:        a.tokenizer_id,
            pretrained_encoder:  a.pretrained_encoder,
            test_fraction:       a.test_fraction,
            seed:                a.seed,
            cleaned_rows:        None,
            max_seq_len:         a.max_seq_len,
            batch_size:          a.batch_size,
            epochs:              a.epochs,
            lr:                  a.lr,
            weight_decay:        0.01,
            patience:            3,
            d_model:             a.d_model,
            num_heads:           a.num_heads,
            num_layers:          a.num_layers,
            d_ff:                a.d_ff,
            dropout:             a.dropout,
        }
    }
}

/// All arguments for the `report` command
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Artifact directory of the finished run
    #[arg(long)]
    pub artifact_dir: String,
}

/// All arguments for the `classify` command
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// The comment text to classify
    #[arg(long)]
    pub text: String,

    /// Artifact directory of the finished run
    #[arg(long)]
    pub artifact_dir: String,
}

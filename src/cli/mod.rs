// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Three commands are supported:
//   1. `train`    — fine-tunes the classifier on a labelled CSV
//   2. `report`   — re-evaluates a finished run's best checkpoint
//   3. `classify` — classifies one comment with that checkpoint

// Declare the commands submodule
pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{ClassifyArgs, Commands, ReportArgs, TrainArgs};

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "comment-classifier",
    version = "0.1.0",
    about = "Fine-tune a transformer to sort customer comments into categories."
)]
pub struct Cli {
    /// The subcommand to run (train, report or classify)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    /// This keeps the CLI layer thin — it only routes, never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)    => Self::run_train(args),
            Commands::Report(args)   => Self::run_report(args),
            Commands::Classify(args) => Self::run_classify(args),
        }
    }

    /// Handles the `train` subcommand.
    /// Converts CLI args into a TrainConfig and hands off to Layer 2.
    fn run_train(args: TrainArgs) -> Result<()> {
        use crate::application::train_use_case::TrainUseCase;

        tracing::info!("Starting training on '{}'", args.data_path);

        // Convert CLI args → application config (separates presentation from domain)
        let use_case = TrainUseCase::new(args.into());
        use_case.execute()?;

        println!("Training complete. Artifacts saved.");
        Ok(())
    }

    /// Handles the `report` subcommand.
    /// Re-runs the best checkpoint over the deterministic test partition.
    fn run_report(args: ReportArgs) -> Result<()> {
        use crate::application::report_use_case::ReportUseCase;

        let use_case = ReportUseCase::new(args.artifact_dir);
        use_case.execute()
    }

    /// Handles the `classify` subcommand.
    /// Loads the model from checkpoint and prints the predicted category.
    fn run_classify(args: ClassifyArgs) -> Result<()> {
        use crate::application::classify_use_case::ClassifyUseCase;

        let use_case = ClassifyUseCase::new(args.artifact_dir)?;
        let result   = use_case.classify(&args.text)?;

        println!("\nCategory: {}", result.category);
        println!("Scores:");
        for (name, score) in &result.scores {
            println!("  {name:<24} {score:>8.4}");
        }
        Ok(())
    }
}

// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and hands off to Layer 2. The
// run summaries returned by the use cases are printed here.
//
//   1. `train`    — run the epoch loop on synthetic images
//   2. `evaluate` — reload a checkpoint and re-score it

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, EvaluateArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "classifier-harness",
    version = "0.1.0",
    about = "Train an image classifier with early stopping and checkpoints, then re-score saved weights."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the use case for the chosen subcommand.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)    => run_train(args),
            Commands::Evaluate(args) => run_evaluate(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!(
        "Starting training: {} epochs, lr={}, target={}%",
        args.epochs, args.lr, args.target_acc
    );

    let summary = TrainUseCase::new(args.into()).execute()?;

    let reason = if summary.stopped_early { "target reached" } else { "epochs exhausted" };
    println!(
        "Training complete after {} epoch(s) ({reason}).",
        summary.epochs_run
    );
    if let Some(best) = summary.best_test_acc {
        println!("Best test accuracy: {best:.2}%");
    }
    println!(
        "Misclassified: {}/{}",
        summary.misclassified, summary.total_evaluated
    );
    for ((actual, predicted), count) in &summary.top_confusions {
        println!("  class {actual} predicted as {predicted}: {count}");
    }
    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    use crate::application::evaluate_use_case::EvaluateUseCase;

    tracing::info!("Evaluating '{}'", args.weights);

    let summary = EvaluateUseCase::new(args.checkpoint_dir, args.weights).execute()?;
    println!(
        "Accuracy {:.2}% (loss {:.4}), {} of {} misclassified",
        summary.accuracy, summary.avg_loss, summary.misclassified, summary.total
    );
    Ok(())
}

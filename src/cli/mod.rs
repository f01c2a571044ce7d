// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Four commands are supported:
//   1. `train`      — trains the sentiment classifier
//   2. `train-absa` — trains the aspect classifier on top of it
//   3. `evaluate`   — scores a corpus, writes the case reports
//   4. `crawl`      — scrapes review text into a TSV file
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

// Declare the commands submodule
pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, CrawlArgs, EvaluateArgs, TrainAbsaArgs, TrainArgs};

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "movie-sentiment",
    version = "0.1.0",
    about = "Train and evaluate sentiment / aspect-based sentiment classifiers \
             on movie reviews, with a review crawler."
)]
pub struct Cli {
    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    /// This keeps the CLI layer thin — it only routes, never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)     => Self::run_train(args),
            Commands::TrainAbsa(args) => Self::run_train_absa(args),
            Commands::Evaluate(args)  => Self::run_evaluate(args),
            Commands::Crawl(args)     => Self::run_crawl(args),
        }
    }

    /// Handles the `train` subcommand.
    /// Converts CLI args into TrainOptions and hands off to Layer 2.
    fn run_train(args: TrainArgs) -> Result<()> {
        use crate::application::train_use_case::SentimentTrainUseCase;

        tracing::info!("Starting sentiment training, data in '{}'", args.data_dir);

        // Convert CLI args → application options (separates presentation from domain)
        let use_case = SentimentTrainUseCase::new(args.into());
        use_case.execute()?;

        println!("Training complete. Checkpoint saved.");
        Ok(())
    }

    /// Handles the `train-absa` subcommand.
    /// Continues from the sentiment checkpoint with the saved options.
    fn run_train_absa(args: TrainAbsaArgs) -> Result<()> {
        use crate::application::train_absa_use_case::AbsaTrainUseCase;

        tracing::info!("Starting aspect training on '{}'", args.corpus);

        let use_case = AbsaTrainUseCase::new(args.corpus, args.checkpoint_dir);
        use_case.execute()?;

        println!("Aspect training complete. Checkpoint saved.");
        Ok(())
    }

    /// Handles the `evaluate` subcommand.
    /// Scores the corpus and prints the achieved accuracy.
    fn run_evaluate(args: EvaluateArgs) -> Result<()> {
        use crate::application::evaluate_use_case::EvaluateUseCase;

        let use_case = EvaluateUseCase::new(
            args.corpus,
            args.checkpoint_dir,
            args.report_dir,
        );
        let accuracy = use_case.execute()?;

        println!("Accuracy: {:.2}%", accuracy * 100.0);
        println!("Case reports written (sa_correct_case.txt / sa_incorrect_case.txt).");
        Ok(())
    }

    /// Handles the `crawl` subcommand.
    /// Blocks until the crawl finishes, then reports the count.
    fn run_crawl(args: CrawlArgs) -> Result<()> {
        use crate::application::crawl_use_case::CrawlUseCase;

        tracing::info!("Starting crawl of '{}'", args.url);

        let config   = (&args).into();
        let use_case = CrawlUseCase::new(args.url, args.output, config);
        let count    = use_case.execute()?;

        println!("Crawl complete. {count} reviews collected.");
        Ok(())
    }
}

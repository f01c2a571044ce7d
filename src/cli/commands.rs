// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the four subcommands: `train`, `train-absa`,
// `evaluate` and `crawl`, and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

use crate::application::train_use_case::TrainOptions;
use crate::crawler::CrawlerConfig;

/// The top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the sentiment classifier on the movie review corpus
    Train(TrainArgs),

    /// Train the aspect-based classifier on top of the sentiment checkpoint
    TrainAbsa(TrainAbsaArgs),

    /// Evaluate the sentiment checkpoint and write the case reports
    Evaluate(EvaluateArgs),

    /// Crawl review text from a target site into a TSV file
    Crawl(CrawlArgs),
}

/// All arguments for the `train` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Directory the corpus files are downloaded into
    #[arg(long, default_value = "data")]
    pub data_dir: String,

    /// Directory for checkpoints, options and the tokenizer
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Maximum number of tokens per input sequence
    /// Format: [CLS] review [SEP] + padding
    #[arg(long, default_value_t = 64)]
    pub max_len: usize,

    /// Number of samples processed together in one forward pass
    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Dropout rate of the sentiment head
    #[arg(long, default_value_t = 0.5)]
    pub drop_out_rate: f64,

    /// Dropout rate of the first aspect head
    #[arg(long, default_value_t = 0.5)]
    pub drop_out_rate_a: f64,

    /// Dropout rate of the second aspect head
    #[arg(long, default_value_t = 0.4)]
    pub drop_out_rate_b: f64,

    /// Base learning rate — warmed up to and decayed from
    #[arg(long, default_value_t = 5e-5)]
    pub learning_rate: f64,

    /// Number of full passes through the training data
    #[arg(long, default_value_t = 10)]
    pub num_epochs: usize,

    /// Fraction of total optimiser steps spent warming up
    #[arg(long, default_value_t = 0.1)]
    pub warmup_ratio: f64,

    /// Gradient-norm clipping threshold
    #[arg(long, default_value_t = 1.0)]
    pub max_grad_norm: f32,

    /// Batches between train-phase log lines
    #[arg(long, default_value_t = 200)]
    pub log_interval: usize,

    /// Hidden dimension of the encoder (d_model in the paper)
    #[arg(long, default_value_t = 256)]
    pub d_model: usize,

    /// Number of attention heads — d_model must be divisible by this
    #[arg(long, default_value_t = 8)]
    pub num_heads: usize,

    /// Number of stacked encoder layers
    #[arg(long, default_value_t = 6)]
    pub num_layers: usize,

    /// Inner dimension of the feed-forward network
    #[arg(long, default_value_t = 1024)]
    pub d_ff: usize,

    /// Total number of unique tokens the vocabulary can hold
    #[arg(long, default_value_t = 30522)]
    pub vocab_size: usize,
}

/// Convert CLI TrainArgs into the application-layer TrainOptions.
/// This is the boundary between Layer 1 and Layer 2 —
/// the application layer never sees clap types.
impl From<TrainArgs> for TrainOptions {
    fn from(a: TrainArgs) -> Self {
        TrainOptions {
            data_dir:        a.data_dir,
            checkpoint_dir:  a.checkpoint_dir,
            max_len:         a.max_len,
            batch_size:      a.batch_size,
            drop_out_rate:   a.drop_out_rate,
            drop_out_rate_a: a.drop_out_rate_a,
            drop_out_rate_b: a.drop_out_rate_b,
            learning_rate:   a.learning_rate,
            num_epochs:      a.num_epochs,
            warmup_ratio:    a.warmup_ratio,
            max_grad_norm:   a.max_grad_norm,
            log_interval:    a.log_interval,
            d_model:         a.d_model,
            num_heads:       a.num_heads,
            num_layers:      a.num_layers,
            d_ff:            a.d_ff,
            vocab_size:      a.vocab_size,
        }
    }
}

/// All arguments for the `train-absa` command.
/// The hyperparameters come from the options the sentiment run
/// saved — the encoder must match that checkpoint exactly.
#[derive(Args, Debug)]
pub struct TrainAbsaArgs {
    /// Tab-separated aspect corpus: document, aspect, ..., polarity
    #[arg(long, default_value = "data/sentiment_dataset.tsv")]
    pub corpus: String,

    /// Directory with the sentiment checkpoint to start from
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,
}

/// All arguments for the `evaluate` command
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Tab-separated corpus to score: id, document, label
    #[arg(long, default_value = "data/ratings_test.txt")]
    pub corpus: String,

    /// Directory where checkpoints were saved during training
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Directory the case report files are written into
    #[arg(long, default_value = ".")]
    pub report_dir: String,
}

/// All arguments for the `crawl` command
#[derive(Args, Debug)]
pub struct CrawlArgs {
    /// URL of the first review page to crawl
    #[arg(long)]
    pub url: String,

    /// Output TSV file for the crawled review texts
    #[arg(long, default_value = "data/crawled_reviews.tsv")]
    pub output: String,

    /// CSS selector matching the review text nodes
    #[arg(long, default_value = "div.score_reple p")]
    pub review_selector: String,

    /// CSS selector matching the next-page link
    #[arg(long, default_value = "a.pg_next")]
    pub next_selector: String,

    /// Upper bound on pages fetched in one crawl
    #[arg(long, default_value_t = 100)]
    pub max_pages: usize,
}

impl From<&CrawlArgs> for CrawlerConfig {
    fn from(a: &CrawlArgs) -> Self {
        CrawlerConfig {
            review_selector: a.review_selector.clone(),
            next_selector:   a.next_selector.clone(),
            max_pages:       a.max_pages,
        }
    }
}

// ============================================================
// Layer 2 — Sentiment Training Use Case
// ============================================================
// Orchestrates the sentiment training pipeline in order:
//
//   Step 1: Download / locate the corpus   (Layer 4 - data)
//   Step 2: Parse the TSV rows             (Layer 4 - data)
//   Step 3: Clean the review text          (Layer 4 - data)
//   Step 4: Build / load tokenizer         (Layer 6 - infra)
//   Step 5: Encode fixed-length samples    (Layer 4 - data)
//   Step 6: Build Burn datasets            (Layer 4 - data)
//   Step 7: Save run options               (Layer 6 - infra)
//   Step 8: Run the training loop          (Layer 5 - ml)
//
// The corpus ships with its own train/test split, so no
// splitter is involved here — the aspect task uses one.
//
// Reference: Burn Book §5 (Training)

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::{
    corpus::{download_corpus_data, SentimentCorpus},
    dataset::{ReviewDataset, SampleEncoder, SentimentItem},
    preprocessor::Preprocessor,
};
use crate::domain::review::Review;
use crate::domain::traits::ReviewSource;
use crate::infra::{
    checkpoint::CheckpointManager,
    tokenizer_store::TokenizerStore,
};
use crate::ml::model::EncoderConfig;
use crate::ml::trainer::train_sentiment;

// ─── Run Options ──────────────────────────────────────────────────────────────
// Every knob of a training run, immutable once the run starts.
// Serialisable so it can be saved next to the checkpoint and
// reloaded for aspect training and evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainOptions {
    pub data_dir:       String,
    pub checkpoint_dir: String,
    pub max_len:        usize,
    pub batch_size:     usize,
    pub drop_out_rate:  f64,

    /// Dropout rate of the first aspect head
    pub drop_out_rate_a: f64,

    /// Dropout rate of the second aspect head
    pub drop_out_rate_b: f64,

    pub learning_rate: f64,
    pub num_epochs:    usize,

    /// Fraction of total optimiser steps spent warming up
    pub warmup_ratio: f64,

    /// Gradient-norm clipping threshold
    pub max_grad_norm: f32,

    /// Batches between train-phase log lines
    pub log_interval: usize,

    pub d_model:    usize,
    pub num_heads:  usize,
    pub num_layers: usize,
    pub d_ff:       usize,
    pub vocab_size: usize,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            data_dir:        "data".to_string(),
            checkpoint_dir:  "checkpoints".to_string(),
            max_len:         64,
            batch_size:      64,
            drop_out_rate:   0.5,
            drop_out_rate_a: 0.5,
            drop_out_rate_b: 0.4,
            learning_rate:   5e-5,
            num_epochs:      10,
            warmup_ratio:    0.1,
            max_grad_norm:   1.0,
            log_interval:    200,
            d_model:         256,
            num_heads:       8,
            num_layers:      6,
            d_ff:            1024,
            vocab_size:      30522,
        }
    }
}

impl TrainOptions {
    /// The encoder architecture these options describe.
    pub fn encoder_config(&self) -> EncoderConfig {
        EncoderConfig::new(
            self.vocab_size,
            self.max_len,
            self.d_model,
            self.num_heads,
            self.num_layers,
            self.d_ff,
            self.drop_out_rate,
        )
    }
}

// ─── SentimentTrainUseCase ────────────────────────────────────────────────────
// Owns the options and runs the full sentiment pipeline.
pub struct SentimentTrainUseCase {
    options: TrainOptions,
}

impl SentimentTrainUseCase {
    pub fn new(options: TrainOptions) -> Self {
        Self { options }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<()> {
        let opts = &self.options;

        // ── Step 1: Download / locate the corpus ──────────────────────────────
        let (train_path, test_path) = download_corpus_data(&opts.data_dir)?;

        // ── Step 2: Parse the TSV rows ────────────────────────────────────────
        // Corpus columns: id <TAB> document <TAB> label
        let train_reviews = SentimentCorpus::new(&train_path, 1, 2).load_all()?;
        let test_reviews  = SentimentCorpus::new(&test_path, 1, 2).load_all()?;

        // ── Step 3: Clean the review text ─────────────────────────────────────
        let preprocessor  = Preprocessor::new();
        let train_reviews = clean_reviews(&preprocessor, train_reviews);
        let test_reviews  = clean_reviews(&preprocessor, test_reviews);

        // ── Step 4: Build / load tokenizer ────────────────────────────────────
        // The vocabulary is built from the training split only,
        // so the held-out split never leaks into it.
        let texts: Vec<String> = train_reviews.iter().map(|r| r.text.clone()).collect();
        let tok_store = TokenizerStore::new(&opts.checkpoint_dir);
        let tokenizer = tok_store.load_or_build(&texts, opts.vocab_size)?;

        // ── Step 5: Encode fixed-length samples ───────────────────────────────
        let encoder = SampleEncoder::new(tokenizer, opts.max_len);
        let train_items = encode_reviews(&encoder, &train_reviews)?;
        let test_items  = encode_reviews(&encoder, &test_reviews)?;
        tracing::info!(
            "Encoded {} train and {} eval samples",
            train_items.len(),
            test_items.len(),
        );

        // ── Step 6: Build Burn datasets ───────────────────────────────────────
        let train_dataset = ReviewDataset::new(train_items);
        let eval_dataset  = ReviewDataset::new(test_items);

        // ── Step 7: Save run options ──────────────────────────────────────────
        // Aspect training and evaluation rebuild the model from these.
        let ckpt_manager = CheckpointManager::new(&opts.checkpoint_dir);
        ckpt_manager.save_options(opts)?;

        // ── Step 8: Run the training loop (Layer 5) ───────────────────────────
        train_sentiment(opts, train_dataset, eval_dataset, ckpt_manager)?;

        Ok(())
    }
}

fn clean_reviews(preprocessor: &Preprocessor, reviews: Vec<Review>) -> Vec<Review> {
    reviews
        .into_iter()
        .map(|r| Review::new(preprocessor.clean(&r.text), r.label))
        .collect()
}

fn encode_reviews(encoder: &SampleEncoder, reviews: &[Review]) -> Result<Vec<SentimentItem>> {
    reviews
        .iter()
        .map(|r| encoder.encode_sentiment(&r.text, r.label))
        .collect()
}

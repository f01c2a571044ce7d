// ============================================================
// Layer 2 — Evaluation Use Case
// ============================================================
// Scores a whole corpus with the trained sentiment checkpoint
// and writes the correct / incorrect case report files.
//
//   Step 1: Reload run options + tokenizer  (Layer 6 - infra)
//   Step 2: Parse and clean the corpus      (Layer 4 - data)
//   Step 3: Encode fixed-length samples     (Layer 4 - data)
//   Step 4: Score every review              (Layer 5 - ml)
//   Step 5: Partition + write case files    (Layer 5 - ml)
//
// Returns the corpus accuracy so the CLI can print it.

use anyhow::Result;
use std::path::Path;

use crate::data::{
    corpus::SentimentCorpus,
    dataset::SampleEncoder,
    preprocessor::Preprocessor,
};
use crate::domain::review::Review;
use crate::domain::traits::ReviewSource;
use crate::infra::{
    checkpoint::CheckpointManager,
    tokenizer_store::TokenizerStore,
};
use crate::ml::evaluator::{partition_cases, write_case_files, SentimentEvaluator};

pub struct EvaluateUseCase {
    corpus_path:    String,
    checkpoint_dir: String,
    report_dir:     String,
}

impl EvaluateUseCase {
    pub fn new(corpus_path: String, checkpoint_dir: String, report_dir: String) -> Self {
        Self { corpus_path, checkpoint_dir, report_dir }
    }

    /// Score the corpus and write the case files.
    /// Returns the achieved accuracy in [0, 1].
    pub fn execute(&self) -> Result<f64> {
        // ── Step 1: Reload run options + tokenizer ────────────────────────────
        let ckpt_manager = CheckpointManager::new(&self.checkpoint_dir);
        let opts         = ckpt_manager.load_options()?;
        let tokenizer    = TokenizerStore::new(&self.checkpoint_dir).load()?;

        // ── Step 2: Parse and clean the corpus ────────────────────────────────
        let reviews = SentimentCorpus::new(&self.corpus_path, 1, 2).load_all()?;
        let preprocessor = Preprocessor::new();
        let reviews: Vec<Review> = reviews
            .into_iter()
            .map(|r| Review::new(preprocessor.clean(&r.text), r.label))
            .collect();

        // ── Step 3: Encode fixed-length samples ───────────────────────────────
        let encoder = SampleEncoder::new(tokenizer, opts.max_len);
        let items = reviews
            .iter()
            .map(|r| encoder.encode_sentiment(&r.text, r.label))
            .collect::<Result<Vec<_>>>()?;

        // ── Step 4: Score every review ────────────────────────────────────────
        let evaluator = SentimentEvaluator::from_checkpoint(&ckpt_manager, &opts)?;
        let scores    = evaluator.positive_scores(&items);

        // ── Step 5: Partition + write case files ──────────────────────────────
        let report = partition_cases(&reviews, &scores);
        write_case_files(&report, Path::new(&self.report_dir))?;

        tracing::info!(
            "Evaluated {} reviews, accuracy {:.4}",
            reviews.len(),
            report.accuracy,
        );
        Ok(report.accuracy)
    }
}

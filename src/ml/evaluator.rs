// ============================================================
// Layer 5 — Evaluator
// ============================================================
// Scores every review in a corpus with a trained sentiment
// checkpoint and partitions them into correct and incorrect
// cases.
//
// Each review is reported as one line:
//
//   <positive probability> / <label>: <text>
//   e.g.  0.87 / 1: loved every minute of it
//
// The prediction is the positive-class probability thresholded
// at 0.5. Lines land in sa_correct_case.txt when prediction and
// label agree, sa_incorrect_case.txt when they don't.
//
// Reference: Burn Book §5 (Inference)

use anyhow::Result;
use burn::prelude::*;
use std::{fs, io::Write, path::Path};

use crate::data::batcher::{ReviewBatcher, SentimentBatch};
use crate::data::dataset::SentimentItem;
use crate::domain::review::Review;
use crate::infra::checkpoint::{CheckpointManager, SENTIMENT_MODEL_FILE};
use crate::application::train_use_case::TrainOptions;
use crate::ml::model::{SentimentModel, SentimentModelConfig};

type InferBackend = burn::backend::Wgpu;

pub const CORRECT_CASE_FILE:   &str = "sa_correct_case.txt";
pub const INCORRECT_CASE_FILE: &str = "sa_incorrect_case.txt";

// ─── SentimentEvaluator ───────────────────────────────────────────────────────

/// Runs batched inference with a trained sentiment model.
pub struct SentimentEvaluator {
    model:      SentimentModel<InferBackend>,
    batcher:    ReviewBatcher<InferBackend>,
    batch_size: usize,
}

impl SentimentEvaluator {
    /// Rebuild the model from the saved options and restore its
    /// weights from the sentiment checkpoint.
    pub fn from_checkpoint(ckpt_manager: &CheckpointManager, opts: &TrainOptions) -> Result<Self> {
        let device = burn::backend::wgpu::WgpuDevice::default();

        let model_cfg = SentimentModelConfig::new(opts.encoder_config(), opts.drop_out_rate);
        let model     = model_cfg.init::<InferBackend>(&device);
        let model     = ckpt_manager.load_model(model, SENTIMENT_MODEL_FILE, &device)?;
        tracing::info!("Sentiment model loaded from checkpoint");

        Ok(Self {
            model,
            batcher: ReviewBatcher::new(device),
            batch_size: opts.batch_size,
        })
    }

    /// Positive-class probability for every encoded review, in
    /// corpus order.
    pub fn positive_scores(&self, items: &[SentimentItem]) -> Vec<f32> {
        let mut scores = Vec::with_capacity(items.len());

        for chunk in items.chunks(self.batch_size) {
            use burn::data::dataloader::batcher::Batcher;
            let batch: SentimentBatch<InferBackend> = self.batcher.batch(chunk.to_vec());
            let batch_size = chunk.len();

            let logits = self.model.forward(
                batch.token_ids,
                batch.segment_ids,
                batch.valid_lengths,
            );
            let probs = burn::tensor::activation::softmax(logits, 1);
            let positive = probs
                .slice([0..batch_size, 1..2])
                .reshape([batch_size]);

            scores.extend(positive.into_data().convert::<f32>().value);
        }

        scores
    }
}

// ─── Case report ──────────────────────────────────────────────────────────────

/// Scored corpus split into agreeing and disagreeing cases.
pub struct CaseReport {
    pub accuracy:  f64,
    pub correct:   Vec<String>,
    pub incorrect: Vec<String>,
}

/// Partition scored reviews by predicted-vs-actual agreement at
/// threshold 0.5. Pure so it is testable without a model.
pub fn partition_cases(reviews: &[Review], scores: &[f32]) -> CaseReport {
    let mut correct   = Vec::new();
    let mut incorrect = Vec::new();

    for (review, &score) in reviews.iter().zip(scores) {
        let line      = format!("{:.2} / {}: {}", score, review.label.class_index(), review.text);
        let predicted = if score >= 0.5 { 1 } else { 0 };

        if predicted == review.label.class_index() {
            correct.push(line);
        } else {
            incorrect.push(line);
        }
    }

    let total    = correct.len() + incorrect.len();
    let accuracy = if total > 0 {
        correct.len() as f64 / total as f64
    } else {
        0.0
    };

    CaseReport { accuracy, correct, incorrect }
}

/// Write the two case files into `dir`.
pub fn write_case_files(report: &CaseReport, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    write_lines(&dir.join(CORRECT_CASE_FILE),   &report.correct)?;
    write_lines(&dir.join(INCORRECT_CASE_FILE), &report.incorrect)?;
    tracing::info!(
        "Wrote {} correct and {} incorrect cases to '{}'",
        report.correct.len(),
        report.incorrect.len(),
        dir.display(),
    );
    Ok(())
}

fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let mut f = fs::File::create(path)?;
    for line in lines {
        writeln!(f, "{line}")?;
    }
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::label::Polarity;

    fn reviews() -> Vec<Review> {
        vec![
            Review::new("a triumph", Polarity::Positive),
            Review::new("a mess", Polarity::Negative),
            Review::new("fell flat", Polarity::Negative),
        ]
    }

    #[test]
    fn test_partition_by_threshold() {
        // Scores: right, right, wrong
        let report = partition_cases(&reviews(), &[0.91, 0.12, 0.73]);
        assert_eq!(report.correct.len(), 2);
        assert_eq!(report.incorrect.len(), 1);
        assert!((report.accuracy - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_line_format() {
        let report = partition_cases(&reviews(), &[0.91, 0.12, 0.73]);
        assert_eq!(report.correct[0], "0.91 / 1: a triumph");
        assert_eq!(report.correct[1], "0.12 / 0: a mess");
        assert_eq!(report.incorrect[0], "0.73 / 0: fell flat");
    }

    #[test]
    fn test_exact_half_counts_as_positive() {
        let reviews = vec![Review::new("borderline", Polarity::Positive)];
        let report  = partition_cases(&reviews, &[0.5]);
        assert_eq!(report.correct.len(), 1);
    }

    #[test]
    fn test_empty_corpus() {
        let report = partition_cases(&[], &[]);
        assert_eq!(report.accuracy, 0.0);
        assert!(report.correct.is_empty());
        assert!(report.incorrect.is_empty());
    }
}

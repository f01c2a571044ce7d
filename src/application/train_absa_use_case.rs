// ============================================================
// Layer 2 — Aspect Training Use Case
// ============================================================
// Orchestrates aspect-based sentiment training:
//
//   Step 1: Parse the aspect corpus        (Layer 4 - data)
//   Step 2: Clean the review text          (Layer 4 - data)
//   Step 3: Augment 3x per record          (Layer 4 - data)
//   Step 4: Shuffle + 80/20 split          (Layer 4 - data)
//   Step 5: Load the saved tokenizer       (Layer 6 - infra)
//   Step 6: Encode fixed-length samples    (Layer 4 - data)
//   Step 7: Run the aspect training loop   (Layer 5 - ml)
//
// This use case runs AFTER sentiment training: it reloads the
// run options saved by that run (the encoder dimensions must
// match the sentiment checkpoint the aspect model starts from)
// and the tokenizer built from the sentiment corpus.
//
// Reference: Burn Book §5 (Training)

use anyhow::Result;

use crate::data::{
    augment::{augment_reviews, AugmentedReview},
    corpus::AspectCorpus,
    dataset::{AspectItem, ReviewDataset, SampleEncoder},
    preprocessor::Preprocessor,
    splitter::split_train_eval,
};
use crate::domain::review::AspectReview;
use crate::infra::{
    checkpoint::CheckpointManager,
    tokenizer_store::TokenizerStore,
};
use crate::ml::trainer::train_absa;

/// Proportion of augmented samples kept for training
const TRAIN_FRACTION: f64 = 0.8;

// ─── AbsaTrainUseCase ─────────────────────────────────────────────────────────
pub struct AbsaTrainUseCase {
    corpus_path:    String,
    checkpoint_dir: String,
}

impl AbsaTrainUseCase {
    pub fn new(corpus_path: String, checkpoint_dir: String) -> Self {
        Self { corpus_path, checkpoint_dir }
    }

    /// Execute the aspect training pipeline end to end
    pub fn execute(&self) -> Result<()> {
        // The sentiment run wrote these — aspect training reuses
        // them so the encoder shapes line up with its checkpoint.
        let ckpt_manager = CheckpointManager::new(&self.checkpoint_dir);
        let opts         = ckpt_manager.load_options()?;

        // ── Step 1: Parse the aspect corpus ───────────────────────────────────
        // Corpus columns: document <TAB> aspect <TAB> ... <TAB> polarity
        let reviews = AspectCorpus::new(&self.corpus_path, 0, 1, 3).load_all()?;

        // ── Step 2: Clean the review text ─────────────────────────────────────
        let preprocessor = Preprocessor::new();
        let reviews: Vec<AspectReview> = reviews
            .into_iter()
            .map(|r| AspectReview::new(preprocessor.clean(&r.text), r.aspect, r.label))
            .collect();

        // ── Step 3: Augment 3x per record ─────────────────────────────────────
        let mut rng = rand::thread_rng();
        let samples = augment_reviews(&reviews, &mut rng);
        tracing::info!(
            "Augmented {} aspect reviews into {} samples",
            reviews.len(),
            samples.len(),
        );

        // ── Step 4: Shuffle + 80/20 split ─────────────────────────────────────
        let (train_samples, eval_samples) =
            split_train_eval(samples, TRAIN_FRACTION, &mut rng);
        tracing::info!(
            "Split: {} train, {} held out",
            train_samples.len(),
            eval_samples.len(),
        );

        // ── Step 5: Load the saved tokenizer ──────────────────────────────────
        let tokenizer = TokenizerStore::new(&self.checkpoint_dir).load()?;

        // ── Step 6: Encode fixed-length samples ───────────────────────────────
        let encoder     = SampleEncoder::new(tokenizer, opts.max_len);
        let train_items = encode_samples(&encoder, &train_samples)?;
        let eval_items  = encode_samples(&encoder, &eval_samples)?;

        let train_dataset = ReviewDataset::new(train_items);
        let eval_dataset  = ReviewDataset::new(eval_items);

        // ── Step 7: Run the aspect training loop (Layer 5) ────────────────────
        train_absa(&opts, train_dataset, eval_dataset, ckpt_manager)?;

        Ok(())
    }
}

fn encode_samples(
    encoder: &SampleEncoder,
    samples: &[AugmentedReview],
) -> Result<Vec<AspectItem>> {
    samples
        .iter()
        .map(|s| encoder.encode_aspect(&s.text, s.targets))
        .collect()
}

// ============================================================
// Layer 4 — Review Batcher
// ============================================================
// Implements Burn's Batcher trait to convert sample vectors
// into GPU-ready tensors.
//
// Input:  Vec of N samples, each with sequences of length L
// Output: a batch with tensors of shape [N, L]
//
// All sequences are already padded to the same length by the
// SampleEncoder, so batching is a flatten + reshape. The same
// batcher serves both tasks: sentiment samples carry an Int
// class label, aspect samples a Float target row.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::{AspectItem, EncodedText, SentimentItem};

// ─── Batches ──────────────────────────────────────────────────────────────────
/// A batch of sentiment samples ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct SentimentBatch<B: Backend> {
    /// Token id sequences — shape: [batch_size, max_len]
    pub token_ids: Tensor<B, 2, Int>,

    /// Non-padding token counts — shape: [batch_size]
    pub valid_lengths: Tensor<B, 1, Int>,

    /// Segment id sequences — shape: [batch_size, max_len]
    pub segment_ids: Tensor<B, 2, Int>,

    /// Class indices — shape: [batch_size]
    pub labels: Tensor<B, 1, Int>,
}

/// A batch of aspect samples with soft targets.
#[derive(Debug, Clone)]
pub struct AspectBatch<B: Backend> {
    pub token_ids:     Tensor<B, 2, Int>,
    pub valid_lengths: Tensor<B, 1, Int>,
    pub segment_ids:   Tensor<B, 2, Int>,

    /// Soft targets [neg_a, pos_a, neg_b, pos_b] — shape: [batch_size, 4]
    pub targets: Tensor<B, 2>,
}

// ─── ReviewBatcher ────────────────────────────────────────────────────────────
/// Holds the target device so tensors land on the right GPU/CPU.
#[derive(Clone, Debug)]
pub struct ReviewBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> ReviewBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    /// Stack the shared sequence fields of a batch:
    /// (token_ids [N, L], valid_lengths [N], segment_ids [N, L]).
    fn stack_sequences(
        &self,
        texts: &[&EncodedText],
    ) -> (Tensor<B, 2, Int>, Tensor<B, 1, Int>, Tensor<B, 2, Int>) {
        let batch_size = texts.len();
        let max_len    = texts[0].token_ids.len();

        let token_flat: Vec<i32> = texts
            .iter()
            .flat_map(|t| t.token_ids.iter().map(|&x| x as i32))
            .collect();

        let segment_flat: Vec<i32> = texts
            .iter()
            .flat_map(|t| t.segment_ids.iter().map(|&x| x as i32))
            .collect();

        let valid: Vec<i32> = texts.iter().map(|t| t.valid_length as i32).collect();

        let token_ids = Tensor::<B, 1, Int>::from_ints(token_flat.as_slice(), &self.device)
            .reshape([batch_size, max_len]);

        let segment_ids = Tensor::<B, 1, Int>::from_ints(segment_flat.as_slice(), &self.device)
            .reshape([batch_size, max_len]);

        let valid_lengths = Tensor::<B, 1, Int>::from_ints(valid.as_slice(), &self.device);

        (token_ids, valid_lengths, segment_ids)
    }
}

// ─── Burn Batcher Trait Implementations ───────────────────────────────────────
impl<B: Backend> Batcher<SentimentItem, SentimentBatch<B>> for ReviewBatcher<B> {
    fn batch(&self, items: Vec<SentimentItem>) -> SentimentBatch<B> {
        let texts: Vec<&EncodedText> = items.iter().map(|i| &i.text).collect();
        let (token_ids, valid_lengths, segment_ids) = self.stack_sequences(&texts);

        let labels: Vec<i32> = items.iter().map(|i| i.label as i32).collect();
        let labels = Tensor::<B, 1, Int>::from_ints(labels.as_slice(), &self.device);

        SentimentBatch { token_ids, valid_lengths, segment_ids, labels }
    }
}

impl<B: Backend> Batcher<AspectItem, AspectBatch<B>> for ReviewBatcher<B> {
    fn batch(&self, items: Vec<AspectItem>) -> AspectBatch<B> {
        let texts: Vec<&EncodedText> = items.iter().map(|i| &i.text).collect();
        let (token_ids, valid_lengths, segment_ids) = self.stack_sequences(&texts);

        let batch_size = items.len();
        let target_flat: Vec<f32> = items.iter().flat_map(|i| i.targets).collect();
        let targets = Tensor::<B, 1>::from_floats(target_flat.as_slice(), &self.device)
            .reshape([batch_size, 4]);

        AspectBatch { token_ids, valid_lengths, segment_ids, targets }
    }
}

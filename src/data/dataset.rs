// ============================================================
// Layer 4 — Samples and Datasets
// ============================================================
// Converts review text into the fixed-length token form the
// encoder consumes, and wraps the resulting samples in Burn's
// Dataset trait.
//
// Sequence format: [CLS] review tokens [SEP] [PAD]...
//   - every sequence is exactly max_len ids long
//   - valid_length counts the non-padding ids
//   - segment ids are all zero (single-sentence input)
//
// Reference: Burn Book §4 (Datasets and Dataloaders)
//            Devlin et al. (2019) BERT input format

use anyhow::Result;
use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};
use tokenizers::Tokenizer;

use crate::domain::label::{AspectTargets, Polarity};

/// BERT-convention special token ids used by the stored tokenizer
pub const PAD_ID: u32 = 0;
pub const CLS_ID: u32 = 101;
pub const SEP_ID: u32 = 102;

// ─── EncodedText ──────────────────────────────────────────────────────────────
/// One tokenised, framed and padded input sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodedText {
    /// Token ids, exactly max_len long
    pub token_ids: Vec<u32>,

    /// Number of non-padding ids at the front of token_ids
    pub valid_length: u32,

    /// Segment ids, exactly max_len long, all zero
    pub segment_ids: Vec<u32>,
}

/// A sentiment training sample: encoded text plus a class index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentItem {
    pub text:  EncodedText,
    pub label: usize,
}

/// An aspect training sample: encoded text plus 4-way soft targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AspectItem {
    pub text:    EncodedText,
    pub targets: [f32; 4],
}

// ─── SampleEncoder ────────────────────────────────────────────────────────────
/// Tokenises review text and frames it into EncodedText.
pub struct SampleEncoder {
    tokenizer: Tokenizer,
    max_len:   usize,
}

impl SampleEncoder {
    pub fn new(tokenizer: Tokenizer, max_len: usize) -> Self {
        Self { tokenizer, max_len }
    }

    /// Tokenise one review into a fixed-length input sequence.
    pub fn encode(&self, text: &str) -> Result<EncodedText> {
        let encoding = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| anyhow::anyhow!("Tokenisation error: {e}"))?;
        Ok(frame_and_pad(encoding.get_ids(), self.max_len))
    }

    /// Encode a labelled review into a sentiment sample.
    pub fn encode_sentiment(&self, text: &str, label: Polarity) -> Result<SentimentItem> {
        Ok(SentimentItem {
            text:  self.encode(text)?,
            label: label.class_index(),
        })
    }

    /// Encode an augmented review into an aspect sample.
    pub fn encode_aspect(&self, text: &str, targets: AspectTargets) -> Result<AspectItem> {
        Ok(AspectItem {
            text:    self.encode(text)?,
            targets: targets.0,
        })
    }
}

/// Frame token ids as [CLS] ids [SEP], truncate to max_len, and
/// pad with PAD_ID up to max_len. Pure so it is testable without
/// a tokenizer instance.
fn frame_and_pad(ids: &[u32], max_len: usize) -> EncodedText {
    let mut token_ids = Vec::with_capacity(max_len);
    token_ids.push(CLS_ID);
    token_ids.extend_from_slice(ids);
    token_ids.push(SEP_ID);

    // Truncation keeps the trailing [SEP] so the frame stays intact
    if token_ids.len() > max_len {
        token_ids.truncate(max_len);
        token_ids[max_len - 1] = SEP_ID;
    }

    let valid_length = token_ids.len() as u32;
    while token_ids.len() < max_len {
        token_ids.push(PAD_ID);
    }

    EncodedText {
        token_ids,
        valid_length,
        segment_ids: vec![0; max_len],
    }
}

// ─── ReviewDataset ────────────────────────────────────────────────────────────
/// In-memory dataset over any clonable sample type, as required
/// by Burn's DataLoader.
pub struct ReviewDataset<I> {
    items: Vec<I>,
}

impl<I> ReviewDataset<I> {
    pub fn new(items: Vec<I>) -> Self {
        Self { items }
    }

    pub fn sample_count(&self) -> usize {
        self.items.len()
    }
}

impl<I: Clone + Send + Sync> Dataset<I> for ReviewDataset<I> {
    fn get(&self, index: usize) -> Option<I> {
        self.items.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_adds_cls_and_sep() {
        let e = frame_and_pad(&[7, 8, 9], 8);
        assert_eq!(&e.token_ids[..5], &[CLS_ID, 7, 8, 9, SEP_ID]);
    }

    #[test]
    fn test_padding_fills_to_max_len() {
        let e = frame_and_pad(&[7, 8, 9], 8);
        assert_eq!(e.token_ids.len(), 8);
        assert_eq!(e.valid_length, 5);
        assert_eq!(&e.token_ids[5..], &[PAD_ID, PAD_ID, PAD_ID]);
    }

    #[test]
    fn test_segment_ids_are_zero_and_full_length() {
        let e = frame_and_pad(&[7, 8], 6);
        assert_eq!(e.segment_ids, vec![0; 6]);
    }

    #[test]
    fn test_truncation_keeps_trailing_sep() {
        let e = frame_and_pad(&[1, 2, 3, 4, 5, 6, 7, 8], 6);
        assert_eq!(e.token_ids.len(), 6);
        assert_eq!(e.valid_length, 6);
        assert_eq!(e.token_ids[0], CLS_ID);
        assert_eq!(e.token_ids[5], SEP_ID);
    }

    #[test]
    fn test_dataset_get_and_len() {
        let ds = ReviewDataset::new(vec![1u8, 2, 3]);
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.get(1), Some(2));
        assert_eq!(ds.get(9), None);
    }
}

// ============================================================
// Layer 3 — Polarity and Aspect Targets
// ============================================================
// Two label representations are used across the pipeline:
//
//   Polarity      — a hard binary class (Negative / Positive),
//                   used by the plain sentiment classifier.
//
//   AspectTargets — a 4-way soft target vector encoding two
//                   independent binary aspect polarities:
//                   [neg_a, pos_a, neg_b, pos_b].
//                   Used by the aspect-based classifier, where
//                   one sentence can mention two aspects with
//                   different sentiment each.
//
// A slot that carries no information is "neutral": (0.5, 0.5).
// A slot derived from a Polarity is "hard": (1, 0) or (0, 1).
//
// Reference: Rust Book §6 (Enums and Pattern Matching)

use serde::{Deserialize, Serialize};

/// Binary sentiment polarity of a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    Negative,
    Positive,
}

impl Polarity {
    /// Class index as used by the classifier output: 0 = negative, 1 = positive.
    pub fn class_index(self) -> usize {
        match self {
            Polarity::Negative => 0,
            Polarity::Positive => 1,
        }
    }

    /// Parse a corpus label field. The sentiment corpus uses "0"/"1",
    /// the aspect corpus uses "negative"/"positive".
    pub fn parse(field: &str) -> Option<Self> {
        match field.trim() {
            "0" | "negative" => Some(Polarity::Negative),
            "1" | "positive" => Some(Polarity::Positive),
            _ => None,
        }
    }

    /// The (negative, positive) probability pair of this polarity.
    pub fn hard_pair(self) -> (f32, f32) {
        match self {
            Polarity::Negative => (1.0, 0.0),
            Polarity::Positive => (0.0, 1.0),
        }
    }
}

// ─── AspectTargets ────────────────────────────────────────────────────────────
/// Soft targets for the two aspect heads: [neg_a, pos_a, neg_b, pos_b].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectTargets(pub [f32; 4]);

impl AspectTargets {
    /// Both aspect slots carry no information.
    pub fn neutral() -> Self {
        Self([0.5, 0.5, 0.5, 0.5])
    }

    /// Slot A derived from a polarity, slot B neutral.
    pub fn single(a: Polarity) -> Self {
        let (neg, pos) = a.hard_pair();
        Self([neg, pos, 0.5, 0.5])
    }

    /// Both slots derived from their own polarity.
    pub fn pair(a: Polarity, b: Polarity) -> Self {
        let (neg_a, pos_a) = a.hard_pair();
        let (neg_b, pos_b) = b.hard_pair();
        Self([neg_a, pos_a, neg_b, pos_b])
    }

    /// The (negative, positive) pair for slot A.
    pub fn slot_a(&self) -> (f32, f32) {
        (self.0[0], self.0[1])
    }

    /// The (negative, positive) pair for slot B.
    pub fn slot_b(&self) -> (f32, f32) {
        (self.0[2], self.0[3])
    }

    /// True if slot A carries a hard label (not neutral).
    pub fn slot_a_is_hard(&self) -> bool {
        self.0[0] != self.0[1]
    }

    /// True if slot B carries a hard label (not neutral).
    pub fn slot_b_is_hard(&self) -> bool {
        self.0[2] != self.0[3]
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_derives_zero_one() {
        assert_eq!(Polarity::Positive.hard_pair(), (0.0, 1.0));
    }

    #[test]
    fn test_negative_derives_one_zero() {
        assert_eq!(Polarity::Negative.hard_pair(), (1.0, 0.0));
    }

    #[test]
    fn test_parse_both_corpus_formats() {
        assert_eq!(Polarity::parse("1"), Some(Polarity::Positive));
        assert_eq!(Polarity::parse("0"), Some(Polarity::Negative));
        assert_eq!(Polarity::parse("positive"), Some(Polarity::Positive));
        assert_eq!(Polarity::parse("negative"), Some(Polarity::Negative));
        assert_eq!(Polarity::parse("meh"), None);
    }

    #[test]
    fn test_single_leaves_slot_b_neutral() {
        let t = AspectTargets::single(Polarity::Positive);
        assert_eq!(t.slot_a(), (0.0, 1.0));
        assert_eq!(t.slot_b(), (0.5, 0.5));
        assert!(t.slot_a_is_hard());
        assert!(!t.slot_b_is_hard());
    }

    #[test]
    fn test_pair_fills_both_slots() {
        let t = AspectTargets::pair(Polarity::Negative, Polarity::Positive);
        assert_eq!(t.0, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_neutral_is_not_hard() {
        let t = AspectTargets::neutral();
        assert!(!t.slot_a_is_hard());
        assert!(!t.slot_b_is_hard());
    }
}

// ============================================================
// Layer 3 — Review Domain Types
// ============================================================
// Two record shapes flow through the pipeline:
//
//   Review       — one sentiment corpus row: the review text
//                  and its overall polarity.
//
//   AspectReview — one aspect corpus row: the review text, the
//                  aspect term mentioned in it, and the
//                  polarity expressed towards that aspect.
//
// Reference: Rust Book §5 (Structs and Methods)

use serde::{Deserialize, Serialize};

use crate::domain::label::Polarity;

/// A movie review with an overall sentiment label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// The raw review text as read from the corpus
    pub text: String,

    /// Overall sentiment of the review
    pub label: Polarity,
}

impl Review {
    /// Create a new Review.
    /// Uses impl Into<String> so callers can pass &str or String.
    pub fn new(text: impl Into<String>, label: Polarity) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

/// A review annotated with an aspect term and the sentiment
/// expressed towards that aspect (not towards the whole review).
///
/// Example:
///   text:   "the acting was great but the plot dragged"
///   aspect: "acting"
///   label:  Positive
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AspectReview {
    /// The raw review text
    pub text: String,

    /// The aspect term that occurs in the text
    pub aspect: String,

    /// Sentiment towards the aspect term
    pub label: Polarity,
}

impl AspectReview {
    /// Create a new AspectReview
    pub fn new(text: impl Into<String>, aspect: impl Into<String>, label: Polarity) -> Self {
        Self {
            text:   text.into(),
            aspect: aspect.into(),
            label,
        }
    }

    /// The review text with this record's aspect term replaced by `marker`.
    /// Used by the augmentation step to make the classifier aspect-agnostic.
    pub fn substituted(&self, marker: &str) -> String {
        self.text.replace(&self.aspect, marker)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substituted_replaces_aspect() {
        let r = AspectReview::new("the score was haunting", "score", Polarity::Positive);
        assert_eq!(r.substituted("[A]"), "the [A] was haunting");
    }

    #[test]
    fn test_substituted_replaces_every_occurrence() {
        let r = AspectReview::new("plot twist after plot twist", "plot", Polarity::Negative);
        assert_eq!(r.substituted("[A]"), "[A] twist after [A] twist");
    }
}

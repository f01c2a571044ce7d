// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// By programming against traits instead of concrete types,
// implementations can be swapped without changing the code
// that uses them. For example:
//   - SentimentCorpus implements ReviewSource
//   - A future JsonCorpus could also implement ReviewSource
//   - The application layer only sees ReviewSource
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::review::Review;

// ─── ReviewSource ─────────────────────────────────────────────────────────────
/// Any component that can produce labelled reviews.
///
/// Implementations:
///   - SentimentCorpus → reads a tab-separated corpus file
pub trait ReviewSource {
    /// Load all available reviews from this source.
    fn load_all(&self) -> Result<Vec<Review>>;
}

// ─── TextHarvester ────────────────────────────────────────────────────────────
/// Any component that can collect raw review text from a remote target.
///
/// Implementations:
///   - MovieCrawler → scrapes review pages over HTTP
pub trait TextHarvester {
    /// Collect review texts from the given target URL.
    /// Blocks until the harvest is finished.
    fn harvest(&self, url: &str) -> Result<Vec<String>>;
}

// ============================================================
// Layer 4 — Corpus Readers
// ============================================================
// Parses the two tab-separated corpora used by the system:
//
//   Sentiment corpus — one review per row, columns:
//     id <TAB> document <TAB> label        (label: 0 or 1)
//
//   Aspect corpus — one annotated review per row, columns:
//     document <TAB> aspect <TAB> ... <TAB> polarity
//     (polarity: "positive" or "negative")
//
// Both corpora carry a header row that is discarded, and both
// are addressed by fixed field indices rather than by header
// name. Rows with missing fields or unparseable labels are
// skipped with a warning instead of aborting the whole load.
//
// The sentiment corpus (Naver sentiment movie corpus v1.0) is
// downloaded into the data directory on first use.
//
// Reference: csv crate documentation
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};

use crate::domain::label::Polarity;
use crate::domain::review::{AspectReview, Review};
use crate::domain::traits::ReviewSource;

const TRAIN_CORPUS_URL: &str = "https://raw.githubusercontent.com/e9t/nsmc/master/ratings_train.txt";
const TEST_CORPUS_URL:  &str = "https://raw.githubusercontent.com/e9t/nsmc/master/ratings_test.txt";

/// Ensure the train/test sentiment corpus files exist under `data_dir`,
/// downloading them when missing. Returns (train_path, test_path).
pub fn download_corpus_data(data_dir: &str) -> Result<(PathBuf, PathBuf)> {
    let dir = PathBuf::from(data_dir);
    fs::create_dir_all(&dir)
        .with_context(|| format!("Cannot create data directory '{}'", dir.display()))?;

    let train_path = dir.join("ratings_train.txt");
    let test_path  = dir.join("ratings_test.txt");

    fetch_if_missing(&train_path, TRAIN_CORPUS_URL)?;
    fetch_if_missing(&test_path,  TEST_CORPUS_URL)?;

    Ok((train_path, test_path))
}

/// Download `url` into `path` unless the file is already present.
fn fetch_if_missing(path: &Path, url: &str) -> Result<()> {
    if path.exists() {
        tracing::debug!("Corpus file '{}' already present", path.display());
        return Ok(());
    }

    tracing::info!("Downloading corpus from {}", url);
    let body = reqwest::blocking::get(url)
        .with_context(|| format!("Request to '{url}' failed"))?
        .error_for_status()
        .with_context(|| format!("Server rejected request to '{url}'"))?
        .text()
        .context("Cannot read corpus response body")?;

    fs::write(path, body)
        .with_context(|| format!("Cannot write corpus to '{}'", path.display()))?;
    tracing::info!("Saved corpus to '{}'", path.display());
    Ok(())
}

// ─── SentimentCorpus ──────────────────────────────────────────────────────────
/// Reads sentiment-labelled reviews from a TSV file.
/// Implements the ReviewSource trait from Layer 3.
pub struct SentimentCorpus {
    /// Path to the tab-separated corpus file
    path: PathBuf,
    /// Column holding the review text
    text_index: usize,
    /// Column holding the 0/1 label
    label_index: usize,
}

impl SentimentCorpus {
    pub fn new(path: impl Into<PathBuf>, text_index: usize, label_index: usize) -> Self {
        Self { path: path.into(), text_index, label_index }
    }
}

impl ReviewSource for SentimentCorpus {
    fn load_all(&self) -> Result<Vec<Review>> {
        let mut reviews = Vec::new();

        for record in tsv_records(&self.path)? {
            let record = record?;

            let text  = record.get(self.text_index);
            let label = record.get(self.label_index).and_then(Polarity::parse);

            match (text, label) {
                (Some(text), Some(label)) if !text.trim().is_empty() => {
                    reviews.push(Review::new(text, label));
                }
                _ => {
                    tracing::warn!("Skipping malformed corpus row: {:?}", record);
                }
            }
        }

        tracing::info!("Loaded {} reviews from '{}'", reviews.len(), self.path.display());
        Ok(reviews)
    }
}

// ─── AspectCorpus ─────────────────────────────────────────────────────────────
/// Reads aspect-annotated reviews from a TSV file.
pub struct AspectCorpus {
    path: PathBuf,
    text_index: usize,
    aspect_index: usize,
    label_index: usize,
}

impl AspectCorpus {
    pub fn new(
        path:         impl Into<PathBuf>,
        text_index:   usize,
        aspect_index: usize,
        label_index:  usize,
    ) -> Self {
        Self { path: path.into(), text_index, aspect_index, label_index }
    }

    pub fn load_all(&self) -> Result<Vec<AspectReview>> {
        let mut reviews = Vec::new();

        for record in tsv_records(&self.path)? {
            let record = record?;

            let text   = record.get(self.text_index);
            let aspect = record.get(self.aspect_index);
            let label  = record.get(self.label_index).and_then(Polarity::parse);

            match (text, aspect, label) {
                (Some(text), Some(aspect), Some(label))
                    if !text.trim().is_empty() && !aspect.trim().is_empty() =>
                {
                    reviews.push(AspectReview::new(text, aspect, label));
                }
                _ => {
                    tracing::warn!("Skipping malformed aspect row: {:?}", record);
                }
            }
        }

        tracing::info!(
            "Loaded {} aspect reviews from '{}'",
            reviews.len(),
            self.path.display()
        );
        Ok(reviews)
    }
}

/// Open a TSV file with the shared corpus conventions:
/// tab delimiter, first row discarded, no quoting, ragged rows allowed.
fn tsv_records(path: &Path) -> Result<csv::StringRecordsIntoIter<fs::File>> {
    let reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_path(path)
        .with_context(|| format!("Cannot open corpus file '{}'", path.display()))?;
    Ok(reader.into_records())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("movie-sentiment-test-{name}"));
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_first_row_is_discarded() {
        let path = write_temp(
            "sent-header.tsv",
            "id\tdocument\tlabel\n1\tloved every minute\t1\n2\tutterly dull\t0\n",
        );
        let corpus  = SentimentCorpus::new(&path, 1, 2);
        let reviews = corpus.load_all().unwrap();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].text, "loved every minute");
        assert_eq!(reviews[0].label, Polarity::Positive);
        assert_eq!(reviews[1].label, Polarity::Negative);
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let path = write_temp(
            "sent-bad.tsv",
            "id\tdocument\tlabel\n1\tfine film\t1\n2\tno label here\n3\tgood\tseven\n",
        );
        let corpus  = SentimentCorpus::new(&path, 1, 2);
        let reviews = corpus.load_all().unwrap();
        assert_eq!(reviews.len(), 1);
    }

    #[test]
    fn test_aspect_corpus_uses_fixed_indices() {
        let path = write_temp(
            "aspect.tsv",
            "document\taspect\tscore\tpolarity\n\
             the acting carried it\tacting\t4\tpositive\n\
             the plot went nowhere\tplot\t1\tnegative\n",
        );
        let corpus  = AspectCorpus::new(&path, 0, 1, 3);
        let reviews = corpus.load_all().unwrap();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].aspect, "acting");
        assert_eq!(reviews[0].label, Polarity::Positive);
        assert_eq!(reviews[1].label, Polarity::Negative);
    }
}

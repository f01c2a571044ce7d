// ============================================================
// Layer 2 — Crawl Use Case
// ============================================================
// Launches the blocking review crawl against a target URL and
// writes whatever text it collected as a tab-separated file:
//
//   id <TAB> document
//
// The same column layout as the sentiment corpus (minus the
// label), so crawled text can be annotated and fed back in.

use anyhow::{Context, Result};
use std::{fs, path::Path};

use crate::crawler::{CrawlerConfig, MovieCrawler};
use crate::data::preprocessor::Preprocessor;
use crate::domain::traits::TextHarvester;

pub struct CrawlUseCase {
    url:    String,
    output: String,
    config: CrawlerConfig,
}

impl CrawlUseCase {
    pub fn new(url: String, output: String, config: CrawlerConfig) -> Self {
        Self { url, output, config }
    }

    /// Run the crawl to completion and write the output file.
    /// Returns the number of reviews written.
    pub fn execute(&self) -> Result<usize> {
        let crawler = MovieCrawler::new(self.config.clone())?;
        let texts   = crawler.harvest(&self.url)?;

        // Crawled pages carry markup whitespace the corpus
        // files never would — clean before writing.
        let preprocessor = Preprocessor::new();
        let texts: Vec<String> = texts
            .iter()
            .map(|t| preprocessor.clean(t))
            .filter(|t| !t.is_empty())
            .collect();

        if let Some(parent) = Path::new(&self.output).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Cannot create output directory '{}'", parent.display()))?;
            }
        }

        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(csv::QuoteStyle::Never)
            .from_path(&self.output)
            .with_context(|| format!("Cannot create output file '{}'", self.output))?;

        writer.write_record(["id", "document"])?;
        for (id, text) in texts.iter().enumerate() {
            writer.write_record([id.to_string().as_str(), text.as_str()])?;
        }
        writer.flush()?;

        tracing::info!("Wrote {} crawled reviews to '{}'", texts.len(), self.output);
        Ok(texts.len())
    }
}

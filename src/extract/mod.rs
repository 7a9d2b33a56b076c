//! Content extraction for Kringkast.
//!
//! Turns heterogeneous episode input (PDF files, a URL, a pre-written
//! script) into plain text for script generation, enforcing the character
//! budget before any generation cost is incurred.

mod pdf;
mod web;

pub use pdf::extract_pdf_text;
pub use web::{ContentFetcher, ReaderProxyFetcher};

use crate::config::ExtractionSettings;
use crate::error::{KringkastError, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument};

/// Input sources for one episode.
#[derive(Debug, Clone, Default)]
pub struct SourceBundle {
    /// Uploaded PDF files.
    pub pdf_files: Vec<PathBuf>,
    /// A web page to include.
    pub url: Option<String>,
    /// A pre-written script. When non-blank this bypasses generation
    /// entirely and the other sources are ignored (policy, not an error).
    pub script: Option<String>,
}

impl SourceBundle {
    /// Bundle with a single URL source.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Bundle with a pre-written script.
    pub fn from_script(script: impl Into<String>) -> Self {
        Self {
            script: Some(script.into()),
            ..Default::default()
        }
    }

    /// The script text, if present and non-blank.
    pub fn script_text(&self) -> Option<&str> {
        self.script
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// True when no source of any kind was supplied.
    pub fn is_empty(&self) -> bool {
        self.pdf_files.is_empty() && self.url.is_none() && self.script_text().is_none()
    }
}

/// Extracts and concatenates text from PDF and URL sources.
pub struct ContentExtractor {
    fetcher: Arc<dyn ContentFetcher>,
    character_limit: usize,
}

impl ContentExtractor {
    /// Create an extractor with the reader-proxy fetcher from settings.
    pub fn new(settings: &ExtractionSettings) -> Self {
        Self::with_fetcher(
            Arc::new(ReaderProxyFetcher::new(settings)),
            settings.character_limit,
        )
    }

    /// Create an extractor with a custom fetch capability.
    pub fn with_fetcher(fetcher: Arc<dyn ContentFetcher>, character_limit: usize) -> Self {
        Self {
            fetcher,
            character_limit,
        }
    }

    /// Extract text from all non-script sources, in order: PDFs first, then
    /// the URL, joined by blank lines.
    ///
    /// Fails with `NoInput` when nothing yields content, and with
    /// `ContentTooLarge` when the combined text exceeds the character limit.
    #[instrument(skip(self, sources), fields(pdfs = sources.pdf_files.len(), url = sources.url.is_some()))]
    pub async fn extract(&self, sources: &SourceBundle) -> Result<String> {
        let mut text = String::new();

        for file in &sources.pdf_files {
            if !is_pdf(file) {
                return Err(KringkastError::UnsupportedFormat(
                    file.display().to_string(),
                ));
            }
            let pdf_text = extract_pdf_text(file)?;
            append_section(&mut text, &pdf_text);
        }

        if let Some(url) = &sources.url {
            info!("Fetching {}", url);
            let fetched = self.fetcher.fetch(url).await?;
            append_section(&mut text, &fetched);
        }

        let length = text.chars().count();
        if length > self.character_limit {
            return Err(KringkastError::ContentTooLarge {
                length,
                limit: self.character_limit,
            });
        }

        if text.trim().is_empty() {
            return Err(KringkastError::NoInput);
        }

        info!("Extracted {} characters of source text", length);
        Ok(text)
    }
}

/// Case-insensitive `.pdf` extension check.
fn is_pdf(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

fn append_section(text: &mut String, section: &str) {
    if section.trim().is_empty() {
        return;
    }
    if !text.is_empty() {
        text.push_str("\n\n");
    }
    text.push_str(section);
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedFetcher(String);

    #[async_trait]
    impl ContentFetcher for FixedFetcher {
        async fn fetch(&self, _url: &str) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    fn extractor(content: &str, limit: usize) -> ContentExtractor {
        ContentExtractor::with_fetcher(Arc::new(FixedFetcher(content.to_string())), limit)
    }

    #[test]
    fn test_script_text_trims_and_filters_blank() {
        assert_eq!(
            SourceBundle::from_script("  hello  ").script_text(),
            Some("hello")
        );
        assert_eq!(SourceBundle::from_script("   \n").script_text(), None);
        assert_eq!(SourceBundle::default().script_text(), None);
    }

    #[test]
    fn test_empty_bundle_is_empty() {
        assert!(SourceBundle::default().is_empty());
        assert!(!SourceBundle::from_url("https://example.com").is_empty());
        assert!(SourceBundle::from_script("  ").is_empty());
    }

    #[tokio::test]
    async fn test_no_content_is_no_input() {
        let result = extractor("", 100).extract(&SourceBundle::default()).await;
        match result {
            Err(KringkastError::NoInput) => {}
            other => panic!("expected NoInput, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_pdf_upload_is_rejected() {
        let bundle = SourceBundle {
            pdf_files: vec![PathBuf::from("notes.docx")],
            ..Default::default()
        };
        match extractor("", 100).extract(&bundle).await {
            Err(KringkastError::UnsupportedFormat(name)) => assert!(name.contains("docx")),
            other => panic!("expected UnsupportedFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_pdf_extension_is_case_insensitive() {
        assert!(is_pdf(std::path::Path::new("paper.PDF")));
        assert!(is_pdf(std::path::Path::new("paper.pdf")));
        assert!(!is_pdf(std::path::Path::new("paper.txt")));
        assert!(!is_pdf(std::path::Path::new("paper")));
    }

    #[tokio::test]
    async fn test_content_at_limit_is_accepted() {
        let content = "x".repeat(50);
        let result = extractor(&content, 50)
            .extract(&SourceBundle::from_url("https://example.com"))
            .await
            .unwrap();
        assert_eq!(result.chars().count(), 50);
    }

    #[tokio::test]
    async fn test_content_one_over_limit_is_too_large() {
        let content = "x".repeat(51);
        let result = extractor(&content, 50)
            .extract(&SourceBundle::from_url("https://example.com"))
            .await;
        match result {
            Err(KringkastError::ContentTooLarge { length, limit }) => {
                assert_eq!(length, 51);
                assert_eq!(limit, 50);
            }
            other => panic!("expected ContentTooLarge, got {:?}", other),
        }
    }
}

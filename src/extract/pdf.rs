//! PDF text extraction.

use crate::error::{KringkastError, Result};
use std::path::Path;
use tracing::debug;

/// Extract the text of every page, joined with blank lines.
pub fn extract_pdf_text(path: &Path) -> Result<String> {
    let pages = pdf_extract::extract_text_by_pages(path).map_err(|e| {
        KringkastError::Extraction {
            file: path.display().to_string(),
            message: e.to_string(),
        }
    })?;

    debug!("Extracted {} pages from {}", pages.len(), path.display());

    Ok(pages.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reports_the_file_name() {
        let result = extract_pdf_text(Path::new("/nonexistent/missing.pdf"));
        match result {
            Err(KringkastError::Extraction { file, .. }) => {
                assert!(file.contains("missing.pdf"));
            }
            other => panic!("expected Extraction error, got {:?}", other),
        }
    }
}

//! Error types for Kringkast.

use std::path::PathBuf;
use thiserror::Error;

/// Library-level error type for Kringkast operations.
#[derive(Error, Debug)]
pub enum KringkastError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Please provide at least one PDF file, a URL, or a script.")]
    NoInput,

    #[error("'{0}' is not a PDF. Please upload only PDF files.")]
    UnsupportedFormat(String),

    #[error("The combined content is {length} characters; the limit is {limit}. Please provide less input text.")]
    ContentTooLarge { length: usize, limit: usize },

    #[error("Failed to fetch {url} after {attempts} attempts: {message}")]
    Fetch {
        url: String,
        attempts: u32,
        message: String,
    },

    #[error("Error reading the PDF file '{file}': {message}")]
    Extraction { file: String, message: String },

    #[error("Script generation timed out after {seconds} seconds")]
    GenerationTimeout { seconds: u64 },

    #[error("No dialogue found in the script. Please check the format.")]
    EmptyScript,

    #[error("Speech synthesis for a {role} line (\"{preview}\") failed after {attempts} attempts: {message}")]
    Synthesis {
        role: String,
        preview: String,
        attempts: u32,
        message: String,
    },

    #[error("Cannot write to '{path}': {message}")]
    PermissionOrIo { path: PathBuf, message: String },

    #[error("Voice catalog error: {0}")]
    VoiceCatalog(String),

    #[error("Audio processing failed: {0}")]
    Audio(String),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("Package build failed: {0}")]
    Package(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),
}

impl KringkastError {
    /// Short preview of a dialogue line for error messages.
    pub fn preview(text: &str) -> String {
        const MAX: usize = 60;
        if text.chars().count() <= MAX {
            text.to_string()
        } else {
            let cut: String = text.chars().take(MAX).collect();
            format!("{}...", cut)
        }
    }
}

/// Result type alias for Kringkast operations.
pub type Result<T> = std::result::Result<T, KringkastError>;

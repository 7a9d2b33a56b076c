//! Generate command implementation.

use super::deliver_artifacts;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::extract::SourceBundle;
use crate::pipeline::{EpisodeRequest, Orchestrator};
use crate::script::LengthTier;
use anyhow::Result;
use std::path::PathBuf;

/// Run the generate command.
#[allow(clippy::too_many_arguments)]
pub async fn run_generate(
    pdf: Vec<String>,
    url: Option<String>,
    script: Option<String>,
    question: Option<String>,
    tone: String,
    length: &str,
    language: String,
    host_name: String,
    guest_name: Option<String>,
    host_voice: &str,
    guest_voice: &str,
    title: Option<String>,
    output: Option<String>,
    settings: Settings,
) -> Result<()> {
    let length: LengthTier = length.parse().map_err(anyhow::Error::msg)?;

    let script_content = match &script {
        Some(path) => Some(read_script_file(path)?),
        None => None,
    };

    let sources = SourceBundle {
        pdf_files: pdf.into_iter().map(PathBuf::from).collect(),
        url,
        script: script_content,
    };

    // A provided script skips generation, so the chat key isn't needed.
    let operation = if sources.script_text().is_some() {
        Operation::Synthesize
    } else {
        Operation::Generate
    };
    if let Err(e) = preflight::check(operation) {
        Output::error(&format!("{}", e));
        Output::info("Run 'kringkast doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let request = EpisodeRequest {
        sources,
        question,
        tone: Some(tone),
        length,
        language,
        host_name,
        guest_name,
        host_voice: host_voice.parse().unwrap_or_default(),
        guest_voice: guest_voice.parse().unwrap_or_default(),
        title,
    };

    let orchestrator = Orchestrator::new(settings)?;

    Output::info("Generating episode...");
    match orchestrator.generate_episode(request).await {
        Ok(artifacts) => deliver_artifacts(artifacts, output.as_deref()),
        Err(e) => {
            Output::error(&format!("{}", e));
            Err(e.into())
        }
    }
}

/// Read a script file, accepting only markdown/plain-text uploads.
pub(crate) fn read_script_file(path: &str) -> Result<String> {
    let allowed = std::path::Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| matches!(e.to_lowercase().as_str(), "md" | "txt"));
    if !allowed {
        anyhow::bail!("Please provide the script as a .md or .txt file: {}", path);
    }

    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Cannot read script file {}: {}", path, e))
}

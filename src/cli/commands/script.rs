//! Script command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::extract::SourceBundle;
use crate::pipeline::{EpisodeRequest, Orchestrator};
use crate::script::LengthTier;
use anyhow::Result;
use std::path::PathBuf;

/// Run the script command: generate the editable markdown without audio.
#[allow(clippy::too_many_arguments)]
pub async fn run_script(
    pdf: Vec<String>,
    url: Option<String>,
    question: Option<String>,
    tone: String,
    length: &str,
    language: String,
    host_name: String,
    guest_name: Option<String>,
    output: Option<String>,
    settings: Settings,
) -> Result<()> {
    let length: LengthTier = length.parse().map_err(anyhow::Error::msg)?;

    if let Err(e) = preflight::check(Operation::Script) {
        Output::error(&format!("{}", e));
        Output::info("Run 'kringkast doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let request = EpisodeRequest {
        sources: SourceBundle {
            pdf_files: pdf.into_iter().map(PathBuf::from).collect(),
            url,
            script: None,
        },
        question,
        tone: Some(tone),
        length,
        language,
        host_name,
        guest_name,
        ..Default::default()
    };

    let orchestrator = Orchestrator::new(settings)?;

    Output::info("Generating script...");
    let artifacts = match orchestrator.generate_script(request).await {
        Ok(artifacts) => artifacts,
        Err(e) => {
            Output::error(&format!("{}", e));
            return Err(e.into());
        }
    };

    match output {
        Some(path) => {
            std::fs::write(&path, &artifacts.script)?;
            Output::success(&format!("Script written to {}", path));
            Output::kv("Host", &artifacts.params.host_name);
            Output::kv("Guest", &artifacts.params.guest_name);
            Output::kv("Language", &artifacts.params.language);
            Output::info(&format!(
                "Edit it, then run: kringkast synth {} --guest-name '{}'",
                path, artifacts.params.guest_name
            ));
        }
        None => {
            println!("{}", artifacts.script);
        }
    }

    Ok(())
}

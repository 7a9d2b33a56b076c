//! Synth command implementation.

use super::deliver_artifacts;
use super::generate::read_script_file;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::pipeline::{Orchestrator, SynthesisParams};
use anyhow::Result;

/// Run the synth command: synthesize an episode from an edited script.
#[allow(clippy::too_many_arguments)]
pub async fn run_synth(
    script_path: &str,
    language: String,
    host_name: String,
    guest_name: String,
    host_voice: &str,
    guest_voice: &str,
    title: Option<String>,
    output: Option<String>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Synthesize) {
        Output::error(&format!("{}", e));
        Output::info("Run 'kringkast doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let script = read_script_file(script_path)?;

    let params = SynthesisParams {
        language,
        host_name,
        guest_name,
        host_voice: host_voice.parse().unwrap_or_default(),
        guest_voice: guest_voice.parse().unwrap_or_default(),
        title,
    };

    let orchestrator = Orchestrator::new(settings)?;

    Output::info(&format!("Synthesizing episode from {}...", script_path));
    match orchestrator.synthesize_from_script(&script, &params).await {
        Ok(artifacts) => deliver_artifacts(artifacts, output.as_deref()),
        Err(e) => {
            Output::error(&format!("{}", e));
            Err(e.into())
        }
    }
}

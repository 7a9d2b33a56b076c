//! Pre-flight checks before expensive operations.
//!
//! Validates that required tools and configuration are available
//! before starting operations that would otherwise fail midway.

use crate::error::{KringkastError, Result};
use crate::synth::GoogleTtsSynthesizer;
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Full generation requires both API keys and the audio tools.
    Generate,
    /// Script-only generation requires the chat API key.
    Script,
    /// Synthesis from a script requires the TTS key and the audio tools.
    Synthesize,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation) -> Result<()> {
    match operation {
        Operation::Generate => {
            check_openai_key()?;
            check_tts_key()?;
            check_tool("ffmpeg")?;
            check_tool("ffprobe")?;
        }
        Operation::Script => {
            check_openai_key()?;
        }
        Operation::Synthesize => {
            check_tts_key()?;
            check_tool("ffmpeg")?;
            check_tool("ffprobe")?;
        }
    }
    Ok(())
}

/// Check if the OpenAI API key is configured.
fn check_openai_key() -> Result<()> {
    if crate::openai::is_api_key_configured() {
        Ok(())
    } else {
        Err(KringkastError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        ))
    }
}

/// Check if the TTS API key is configured.
fn check_tts_key() -> Result<()> {
    if GoogleTtsSynthesizer::is_api_key_configured() {
        Ok(())
    } else {
        Err(KringkastError::Config(
            "GOOGLE_TTS_API_KEY not set. Set it with: export GOOGLE_TTS_API_KEY='...'".to_string(),
        ))
    }
}

/// Check if an external tool is available.
fn check_tool(name: &str) -> Result<()> {
    // ffmpeg/ffprobe use -version (single dash)
    match Command::new(name).arg("-version").output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(KringkastError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(KringkastError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(KringkastError::ToolNotFound(format!("{}: {}", name, e))),
    }
}

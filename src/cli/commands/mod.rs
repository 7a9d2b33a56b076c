//! CLI command implementations.

mod doctor;
mod generate;
mod init;
mod script;
mod synth;
mod voices;

pub use doctor::run_doctor;
pub use generate::run_generate;
pub use init::run_init;
pub use script::run_script;
pub use synth::run_synth;
pub use voices::run_voices;

use crate::cli::Output;
use crate::pipeline::EpisodeArtifacts;
use std::path::{Path, PathBuf};

/// Print artifact locations and the transcript, relocating the files first
/// when an output directory was requested.
pub(crate) fn deliver_artifacts(
    artifacts: EpisodeArtifacts,
    output: Option<&str>,
) -> anyhow::Result<()> {
    let artifacts = match output {
        Some(dir) => relocate_artifacts(artifacts, Path::new(dir))?,
        None => artifacts,
    };

    Output::success("Episode ready");
    Output::kv("Audio", &artifacts.audio_path.display().to_string());
    match &artifacts.caption_path {
        Some(path) => Output::kv("Captions", &path.display().to_string()),
        None => Output::kv("Captions", "unavailable"),
    }
    match &artifacts.package_path {
        Some(path) => Output::kv("Package", &path.display().to_string()),
        None => Output::kv("Package", "unavailable"),
    }
    if let Some(path) = &artifacts.host_track_path {
        Output::kv("Host track", &path.display().to_string());
    }
    if let Some(path) = &artifacts.guest_track_path {
        Output::kv("Guest track", &path.display().to_string());
    }

    println!("\n{}", artifacts.transcript);
    Ok(())
}

/// Move episode files out of the scratch directory.
///
/// The combined audio must move; everything else degrades with a warning,
/// matching the pipeline's partial-failure policy.
fn relocate_artifacts(
    mut artifacts: EpisodeArtifacts,
    dir: &Path,
) -> anyhow::Result<EpisodeArtifacts> {
    std::fs::create_dir_all(dir)?;

    artifacts.audio_path = move_file(&artifacts.audio_path, dir)?;
    artifacts.caption_path = move_optional(artifacts.caption_path.take(), dir);
    artifacts.package_path = move_optional(artifacts.package_path.take(), dir);
    artifacts.host_track_path = move_optional(artifacts.host_track_path.take(), dir);
    artifacts.guest_track_path = move_optional(artifacts.guest_track_path.take(), dir);

    Ok(artifacts)
}

/// Copy-then-remove so relocation works across filesystems.
fn move_file(source: &Path, dir: &Path) -> anyhow::Result<PathBuf> {
    let file_name = source
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Artifact path has no file name: {}", source.display()))?;
    let dest = dir.join(file_name);
    std::fs::copy(source, &dest)?;
    std::fs::remove_file(source).ok();
    Ok(dest)
}

fn move_optional(source: Option<PathBuf>, dir: &Path) -> Option<PathBuf> {
    let source = source?;
    match move_file(&source, dir) {
        Ok(dest) => Some(dest),
        Err(e) => {
            Output::warning(&format!("Could not move {}: {}", source.display(), e));
            None
        }
    }
}

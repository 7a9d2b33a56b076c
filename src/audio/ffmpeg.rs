//! ffmpeg/ffprobe subprocess helpers.

use crate::error::{KringkastError, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;
use uuid::Uuid;

/// Sample rate used for generated silence spans.
const SILENCE_SAMPLE_RATE: u32 = 24_000;

/// Queries the duration of an audio file using ffprobe with JSON output.
pub async fn probe_duration(path: &Path) -> Result<f64> {
    let result = Command::new("ffprobe")
        .arg("-v").arg("quiet")
        .arg("-print_format").arg("json")
        .arg("-show_format")
        .arg(path)
        .output()
        .await;

    let output = match result {
        Ok(o) => o,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(KringkastError::ToolNotFound("ffprobe".into()));
        }
        Err(e) => {
            return Err(KringkastError::Audio(format!("ffprobe failed: {e}")));
        }
    };

    if !output.status.success() {
        return Err(KringkastError::Audio(format!(
            "ffprobe returned error for {}",
            path.display()
        )));
    }

    // Parse JSON output to extract duration
    let json_str = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&json_str)
        .map_err(|_| KringkastError::Audio("Invalid ffprobe output".into()))?;

    parsed["format"]["duration"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| KringkastError::Audio("Could not determine audio duration".into()))
}

/// Concatenate MP3 clips strictly in order into a single MP3 file.
///
/// Uses the concat demuxer with re-encoding so clips of differing bitrates
/// join cleanly. No silence is inserted between clips.
pub async fn concat_clips(clips: &[PathBuf], dest: &Path) -> Result<()> {
    if clips.is_empty() {
        return Err(KringkastError::Audio("No clips to concatenate".into()));
    }

    let list_path = dest
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(format!("concat-{}.txt", Uuid::new_v4()));

    let mut list = String::new();
    for clip in clips {
        // Concat-demuxer quoting: single quotes in paths become '\''.
        let escaped = clip.display().to_string().replace('\'', r"'\''");
        list.push_str(&format!("file '{}'\n", escaped));
    }
    std::fs::write(&list_path, list)?;

    debug!("Concatenating {} clips into {}", clips.len(), dest.display());

    let result = Command::new("ffmpeg")
        .arg("-f").arg("concat")
        .arg("-safe").arg("0")
        .arg("-i").arg(&list_path)
        .arg("-codec:a").arg("libmp3lame")
        .arg("-qscale:a").arg("2")
        .arg("-y")
        .arg("-loglevel").arg("error")
        .arg(dest)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    let _ = std::fs::remove_file(&list_path);

    match result {
        Ok(out) if out.status.success() => Ok(()),
        Ok(out) => {
            let err = String::from_utf8_lossy(&out.stderr);
            Err(KringkastError::Audio(format!("ffmpeg concat failed: {err}")))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(KringkastError::ToolNotFound("ffmpeg".into()))
        }
        Err(e) => Err(KringkastError::Audio(format!("ffmpeg error: {e}"))),
    }
}

/// Generate an MP3 silence span of the given duration.
pub async fn make_silence(duration_seconds: f64, dest: &Path) -> Result<()> {
    let result = Command::new("ffmpeg")
        .arg("-f").arg("lavfi")
        .arg("-i").arg(format!("anullsrc=r={}:cl=mono", SILENCE_SAMPLE_RATE))
        .arg("-t").arg(format!("{:.3}", duration_seconds))
        .arg("-codec:a").arg("libmp3lame")
        .arg("-qscale:a").arg("2")
        .arg("-y")
        .arg("-loglevel").arg("error")
        .arg(dest)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    match result {
        Ok(out) if out.status.success() => Ok(()),
        Ok(out) => {
            let err = String::from_utf8_lossy(&out.stderr);
            Err(KringkastError::Audio(format!(
                "ffmpeg silence generation failed: {err}"
            )))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(KringkastError::ToolNotFound("ffmpeg".into()))
        }
        Err(e) => Err(KringkastError::Audio(format!("ffmpeg error: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_concat_rejects_empty_input() {
        let dir = tempfile::tempdir().unwrap();
        let result = concat_clips(&[], &dir.path().join("out.mp3")).await;
        assert!(result.is_err());
    }
}

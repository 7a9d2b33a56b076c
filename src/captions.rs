//! WebVTT caption output.
//!
//! Cues mirror the episode timeline exactly: numbered, contiguous, zero-gap,
//! with a voice tag carrying the speaker's display name.

use crate::audio::Timeline;
use crate::error::{KringkastError, Result};
use std::path::Path;

/// Format a timeline as a WebVTT document.
pub fn format_vtt(timeline: &Timeline) -> String {
    let mut output = String::from("WEBVTT\n\n");

    for (i, cue) in timeline.cues.iter().enumerate() {
        // Cue identifier (1-indexed)
        output.push_str(&format!("{}\n", i + 1));

        // Timestamps: 00:00:00.000 --> 00:00:00.000
        output.push_str(&format!(
            "{} --> {}\n",
            format_vtt_timestamp(cue.start_seconds),
            format_vtt_timestamp(cue.end_seconds)
        ));

        // Voice-tagged text
        output.push_str(&format!("<v {}>{}\n\n", cue.speaker, cue.text));
    }

    output
}

/// Write a timeline as a WebVTT file.
///
/// The caller treats failure as "no captions for this episode" rather than
/// failing the pipeline; the error carries the offending path for the log.
pub fn write_vtt(timeline: &Timeline, path: &Path) -> Result<()> {
    std::fs::write(path, format_vtt(timeline)).map_err(|e| KringkastError::PermissionOrIo {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Format timestamp for VTT (00:00:00.000).
fn format_vtt_timestamp(seconds: f64) -> String {
    let total_ms = (seconds * 1000.0) as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let ms = total_ms % 1000;

    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioClip, SpokenTurn};
    use crate::script::Role;
    use std::path::PathBuf;

    fn timeline() -> Timeline {
        let turns = vec![
            SpokenTurn {
                role: Role::Host,
                speaker: "Sam".to_string(),
                text: "Welcome to the show.".to_string(),
            },
            SpokenTurn {
                role: Role::Guest,
                speaker: "Ada".to_string(),
                text: "Great to be here.".to_string(),
            },
        ];
        let clips = vec![
            AudioClip {
                path: PathBuf::from("a.mp3"),
                duration_seconds: 2.5,
            },
            AudioClip {
                path: PathBuf::from("b.mp3"),
                duration_seconds: 3661.25,
            },
        ];
        Timeline::from_turns(&turns, &clips)
    }

    #[test]
    fn test_vtt_header_and_cues() {
        let vtt = format_vtt(&timeline());
        assert!(vtt.starts_with("WEBVTT\n\n"));
        assert!(vtt.contains("1\n00:00:00.000 --> 00:00:02.500\n<v Sam>Welcome to the show.\n"));
        assert!(vtt.contains("2\n00:00:02.500 --> 01:01:03.750\n<v Ada>Great to be here.\n"));
    }

    #[test]
    fn test_cues_are_contiguous() {
        let vtt = format_vtt(&timeline());
        // The end of cue 1 is the start of cue 2.
        assert_eq!(vtt.matches("00:00:02.500").count(), 2);
    }

    #[test]
    fn test_timestamp_formatting() {
        assert_eq!(format_vtt_timestamp(0.0), "00:00:00.000");
        assert_eq!(format_vtt_timestamp(61.5), "00:01:01.500");
        assert_eq!(format_vtt_timestamp(3599.75), "00:59:59.750");
        assert_eq!(format_vtt_timestamp(3661.125), "01:01:01.125");
    }

    #[test]
    fn test_write_vtt_to_unwritable_path_reports_path() {
        let result = write_vtt(&timeline(), Path::new("/nonexistent/dir/captions.vtt"));
        match result {
            Err(KringkastError::PermissionOrIo { path, .. }) => {
                assert!(path.to_string_lossy().contains("captions.vtt"));
            }
            other => panic!("expected PermissionOrIo, got {:?}", other),
        }
    }

    #[test]
    fn test_write_vtt_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("episode.vtt");
        write_vtt(&timeline(), &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("WEBVTT"));
    }
}

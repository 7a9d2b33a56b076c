//! Audio assembly for Kringkast.
//!
//! Per-turn clips are probed, laid out on a timeline, and stitched into the
//! combined episode track plus optional per-speaker isolated tracks.
//! ffmpeg and ffprobe do the heavy lifting as external tools.

mod ffmpeg;
mod timeline;

pub use ffmpeg::{concat_clips, make_silence, probe_duration};
pub use timeline::{AssembledEpisode, SpokenTurn, Timeline, TimelineAssembler, TimelineCue};

use std::path::PathBuf;

/// A synthesized clip on disk plus its probed duration.
///
/// Owned transiently during one episode's assembly and deleted afterwards.
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub path: PathBuf,
    pub duration_seconds: f64,
}

//! Timeline reconstruction and episode track assembly.

use super::{concat_clips, make_silence, AudioClip};
use crate::error::{KringkastError, Result};
use crate::script::Role;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{info, warn};
use uuid::Uuid;

/// One spoken turn as handed to the assembler: the role, its resolved
/// display name, and the text that was synthesized.
#[derive(Debug, Clone)]
pub struct SpokenTurn {
    pub role: Role,
    pub speaker: String,
    pub text: String,
}

/// One cue in the reconstructed episode timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineCue {
    pub turn_index: usize,
    pub speaker: String,
    pub text: String,
    pub start_seconds: f64,
    pub end_seconds: f64,
}

/// The derived start/end offsets of each turn within the combined track.
///
/// Offsets accumulate clip durations in turn order: `start[0] == 0`,
/// `start[i] == end[i-1]`, no gaps.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    pub cues: Vec<TimelineCue>,
}

impl Timeline {
    /// Build a timeline by accumulating clip durations in turn order.
    pub fn from_turns(turns: &[SpokenTurn], clips: &[AudioClip]) -> Self {
        let mut cues = Vec::with_capacity(turns.len());
        let mut offset = 0.0f64;

        for (index, (turn, clip)) in turns.iter().zip(clips).enumerate() {
            let end = offset + clip.duration_seconds;
            cues.push(TimelineCue {
                turn_index: index,
                speaker: turn.speaker.clone(),
                text: turn.text.clone(),
                start_seconds: offset,
                end_seconds: end,
            });
            offset = end;
        }

        Timeline { cues }
    }

    /// Total duration of the combined track.
    pub fn total_duration(&self) -> f64 {
        self.cues.last().map(|c| c.end_seconds).unwrap_or(0.0)
    }
}

/// Output of episode assembly.
#[derive(Debug)]
pub struct AssembledEpisode {
    pub combined_path: PathBuf,
    pub timeline: Timeline,
    /// Silence-padded isolated track per role; `None` when per-speaker
    /// export failed (the combined track is still delivered).
    pub speaker_tracks: Option<HashMap<Role, PathBuf>>,
}

/// Entry in a per-speaker concat plan: either the original clip or a span
/// of silence with the same duration.
#[derive(Debug, Clone, PartialEq)]
enum PlanEntry {
    Clip(usize),
    Silence(f64),
}

/// Assembles per-turn clips into the combined track, the timeline, and
/// per-speaker isolated tracks.
pub struct TimelineAssembler {
    scratch_dir: PathBuf,
}

impl TimelineAssembler {
    pub fn new(scratch_dir: PathBuf) -> Self {
        Self { scratch_dir }
    }

    /// Assemble an episode from turns and their clips (parallel slices, in
    /// turn order).
    ///
    /// The combined track and timeline are mandatory; per-speaker track
    /// failures are logged and degrade to `speaker_tracks = None`.
    pub async fn assemble(
        &self,
        turns: &[SpokenTurn],
        clips: &[AudioClip],
    ) -> Result<AssembledEpisode> {
        if turns.len() != clips.len() {
            return Err(KringkastError::Audio(format!(
                "Turn/clip count mismatch: {} turns, {} clips",
                turns.len(),
                clips.len()
            )));
        }
        if turns.is_empty() {
            return Err(KringkastError::Audio("Nothing to assemble".into()));
        }

        let timeline = Timeline::from_turns(turns, clips);

        let combined_path = self.scratch_dir.join(format!("podcast-{}.mp3", Uuid::new_v4()));
        let clip_paths: Vec<PathBuf> = clips.iter().map(|c| c.path.clone()).collect();
        concat_clips(&clip_paths, &combined_path).await?;
        info!(
            "Combined {} clips into {} ({:.1}s)",
            clips.len(),
            combined_path.display(),
            timeline.total_duration()
        );

        let speaker_tracks = match self.build_speaker_tracks(turns, clips).await {
            Ok(tracks) => Some(tracks),
            Err(e) => {
                warn!("Per-speaker track export failed, continuing without: {}", e);
                None
            }
        };

        Ok(AssembledEpisode {
            combined_path,
            timeline,
            speaker_tracks,
        })
    }

    /// One isolated track per distinct role, silence-padded so every track
    /// matches the combined track's duration.
    async fn build_speaker_tracks(
        &self,
        turns: &[SpokenTurn],
        clips: &[AudioClip],
    ) -> Result<HashMap<Role, PathBuf>> {
        let mut roles: Vec<Role> = Vec::new();
        for turn in turns {
            if !roles.contains(&turn.role) {
                roles.push(turn.role);
            }
        }

        // Silence spans are generated once per distinct duration and shared
        // between plans.
        let mut silence_files: HashMap<u64, PathBuf> = HashMap::new();
        let mut tracks = HashMap::new();

        for role in roles {
            let plan = speaker_plan(turns, clips, role);
            let mut paths = Vec::with_capacity(plan.len());

            for entry in plan {
                match entry {
                    PlanEntry::Clip(index) => paths.push(clips[index].path.clone()),
                    PlanEntry::Silence(duration) => {
                        let key = (duration * 1000.0).round() as u64;
                        let path = match silence_files.get(&key) {
                            Some(existing) => existing.clone(),
                            None => {
                                let path = self
                                    .scratch_dir
                                    .join(format!("silence-{}ms-{}.mp3", key, Uuid::new_v4()));
                                make_silence(duration, &path).await?;
                                silence_files.insert(key, path.clone());
                                path
                            }
                        };
                        paths.push(path);
                    }
                }
            }

            let track_path = self
                .scratch_dir
                .join(format!("track-{}-{}.mp3", role, Uuid::new_v4()));
            concat_clips(&paths, &track_path).await?;
            tracks.insert(role, track_path);
        }

        // Shared silence spans are only needed during concatenation.
        for path in silence_files.values() {
            let _ = std::fs::remove_file(path);
        }

        Ok(tracks)
    }
}

/// Concat plan for one role: each turn is either that role's clip or an
/// equal-duration silence span, so plan duration equals combined duration.
fn speaker_plan(turns: &[SpokenTurn], clips: &[AudioClip], role: Role) -> Vec<PlanEntry> {
    turns
        .iter()
        .zip(clips)
        .enumerate()
        .map(|(index, (turn, clip))| {
            if turn.role == role {
                PlanEntry::Clip(index)
            } else {
                PlanEntry::Silence(clip.duration_seconds)
            }
        })
        .collect()
}

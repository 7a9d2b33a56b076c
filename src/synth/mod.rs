//! Speech synthesis for dialogue turns.
//!
//! The synthesis capability is injected behind a trait; the stage wraps it
//! with bounded retries and writes one scratch clip per turn. A turn that
//! still fails after all attempts is fatal to the episode: a silently
//! dropped turn would desynchronize the caption timeline.

mod google;

pub use google::GoogleTtsSynthesizer;

use crate::config::SynthesisSettings;
use crate::error::{KringkastError, Result};
use crate::script::Role;
use crate::voice::VoiceDescriptor;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

/// Speech-synthesis capability: text in, encoded MP3 bytes out.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, voice_id: &str, language_code: &str) -> Result<Vec<u8>>;
}

/// Per-turn synthesis with retries.
pub struct SynthesisStage {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    scratch_dir: PathBuf,
    attempts: u32,
    retry_delay: Duration,
}

impl SynthesisStage {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        scratch_dir: PathBuf,
        settings: &SynthesisSettings,
    ) -> Self {
        Self {
            synthesizer,
            scratch_dir,
            attempts: settings.retry_attempts.max(1),
            retry_delay: Duration::from_secs(settings.retry_delay_seconds),
        }
    }

    /// Ensure the scratch directory exists and is writable.
    ///
    /// Probed up front so a permission problem surfaces as a clear error
    /// before any synthesis spend, not as a generic I/O failure mid-episode.
    pub fn prepare_scratch_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.scratch_dir).map_err(|e| {
            KringkastError::PermissionOrIo {
                path: self.scratch_dir.clone(),
                message: e.to_string(),
            }
        })?;

        let probe = self.scratch_dir.join(format!(".probe-{}", Uuid::new_v4()));
        std::fs::write(&probe, b"").map_err(|e| KringkastError::PermissionOrIo {
            path: self.scratch_dir.clone(),
            message: e.to_string(),
        })?;
        let _ = std::fs::remove_file(&probe);

        Ok(())
    }

    /// Synthesize one dialogue turn into a scratch MP3 file.
    pub async fn synthesize_turn(
        &self,
        text: &str,
        role: Role,
        voice: &VoiceDescriptor,
    ) -> Result<PathBuf> {
        let language_code = language_code_of(&voice.id);
        let mut last_error = String::new();

        for attempt in 1..=self.attempts {
            match self
                .synthesizer
                .synthesize(text, &voice.id, &language_code)
                .await
            {
                Ok(bytes) => {
                    let path = self.scratch_dir.join(format!("turn-{}.mp3", Uuid::new_v4()));
                    std::fs::write(&path, &bytes).map_err(|e| KringkastError::PermissionOrIo {
                        path: path.clone(),
                        message: e.to_string(),
                    })?;
                    debug!(
                        "Synthesized {} bytes for {} with voice {}",
                        bytes.len(),
                        role,
                        voice.id
                    );
                    return Ok(path);
                }
                Err(e) => {
                    last_error = e.to_string();
                    if attempt < self.attempts {
                        warn!(
                            "Synthesis attempt {}/{} failed for the {} role: {}",
                            attempt, self.attempts, role, last_error
                        );
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }

        Err(KringkastError::Synthesis {
            role: role.to_string(),
            preview: KringkastError::preview(text),
            attempts: self.attempts,
            message: last_error,
        })
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }
}

/// Derive the BCP-47 language code from a provider voice id
/// ("en-US-Chirp-HD-F" -> "en-US").
pub fn language_code_of(voice_id: &str) -> String {
    let mut parts = voice_id.splitn(3, '-');
    match (parts.next(), parts.next()) {
        (Some(lang), Some(region)) => format!("{}-{}", lang, region),
        _ => voice_id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::Gender;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn voice() -> VoiceDescriptor {
        VoiceDescriptor {
            id: "en-US-Chirp-HD-F".to_string(),
            display_name: "Chirp HD F".to_string(),
            gender: Gender::Female,
            language: "English".to_string(),
        }
    }

    fn settings() -> SynthesisSettings {
        SynthesisSettings {
            retry_attempts: 3,
            retry_delay_seconds: 0,
            ..Default::default()
        }
    }

    /// Fails the first `failures` calls, then succeeds.
    struct FlakySynthesizer {
        calls: AtomicU32,
        failures: u32,
    }

    #[async_trait]
    impl SpeechSynthesizer for FlakySynthesizer {
        async fn synthesize(
            &self,
            _text: &str,
            _voice_id: &str,
            _language_code: &str,
        ) -> Result<Vec<u8>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(KringkastError::Audio("transient".to_string()))
            } else {
                Ok(vec![0u8; 16])
            }
        }
    }

    #[test]
    fn test_language_code_of() {
        assert_eq!(language_code_of("en-US-Chirp-HD-F"), "en-US");
        assert_eq!(language_code_of("de-DE-Chirp-HD-D"), "de-DE");
        assert_eq!(language_code_of("weird"), "weird");
    }

    #[tokio::test]
    async fn test_retry_recovers_from_transient_failures() {
        let dir = tempfile::tempdir().unwrap();
        let stage = SynthesisStage::new(
            Arc::new(FlakySynthesizer {
                calls: AtomicU32::new(0),
                failures: 2,
            }),
            dir.path().to_path_buf(),
            &settings(),
        );

        let path = stage
            .synthesize_turn("Hello there", Role::Host, &voice())
            .await
            .unwrap();
        assert!(path.exists());
        assert_eq!(std::fs::read(&path).unwrap().len(), 16);
    }

    #[tokio::test]
    async fn test_exhausted_retries_fail_the_turn() {
        let dir = tempfile::tempdir().unwrap();
        let stage = SynthesisStage::new(
            Arc::new(FlakySynthesizer {
                calls: AtomicU32::new(0),
                failures: 99,
            }),
            dir.path().to_path_buf(),
            &settings(),
        );

        match stage
            .synthesize_turn("Hello there", Role::Guest, &voice())
            .await
        {
            Err(KringkastError::Synthesis {
                role,
                attempts,
                preview,
                ..
            }) => {
                assert_eq!(role, "guest");
                assert_eq!(attempts, 3);
                assert_eq!(preview, "Hello there");
            }
            other => panic!("expected Synthesis error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_prepare_scratch_dir_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = dir.path().join("nested").join("scratch");
        let stage = SynthesisStage::new(
            Arc::new(FlakySynthesizer {
                calls: AtomicU32::new(0),
                failures: 0,
            }),
            scratch.clone(),
            &settings(),
        );

        stage.prepare_scratch_dir().unwrap();
        assert!(scratch.is_dir());
    }
}

//! Episode orchestration for Kringkast.
//!
//! Coordinates the entire pipeline from source extraction to the final
//! artifact bundle: extraction, script generation, per-turn synthesis,
//! timeline assembly, captions, and packaging. Caption and package failures
//! degrade to absent artifacts; synthesis failures fail the episode.

mod sweeper;

pub use sweeper::{sweep_scratch, ScratchSweeper};

use crate::audio::{probe_duration, AudioClip, SpokenTurn, TimelineAssembler};
use crate::captions::write_vtt;
use crate::config::{Prompts, Settings};
use crate::error::{KringkastError, Result};
use crate::extract::{ContentExtractor, SourceBundle};
use crate::package::PackageBuilder;
use crate::script::{
    parse_script, serialize_script, DialogueTurn, GenerationParams, LengthTier, Role,
    ScriptGenerator, ScriptRequest,
};
use crate::synth::{language_code_of, GoogleTtsSynthesizer, SpeechSynthesizer, SynthesisStage};
use crate::voice::{VoiceCatalog, VoiceRegistry, VoiceSelection};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Default host display name when the caller does not choose one.
pub const DEFAULT_HOST_NAME: &str = "Sam";

/// Guest display name used when a hand-written script names nobody.
pub const DEFAULT_GUEST_NAME: &str = "AI Assistant";

/// One episode-generation request.
#[derive(Debug, Clone)]
pub struct EpisodeRequest {
    pub sources: SourceBundle,
    /// Optional focus question or topic.
    pub question: Option<String>,
    /// Conversational tone (e.g. "Fun", "Formal").
    pub tone: Option<String>,
    pub length: LengthTier,
    pub language: String,
    pub host_name: String,
    /// Overrides the model's guest name when set.
    pub guest_name: Option<String>,
    pub host_voice: VoiceSelection,
    pub guest_voice: VoiceSelection,
    /// Title for the transcript package.
    pub title: Option<String>,
}

impl Default for EpisodeRequest {
    fn default() -> Self {
        Self {
            sources: SourceBundle::default(),
            question: None,
            tone: None,
            length: LengthTier::default(),
            language: "English".to_string(),
            host_name: DEFAULT_HOST_NAME.to_string(),
            guest_name: None,
            host_voice: VoiceSelection::Random,
            guest_voice: VoiceSelection::Random,
            title: None,
        }
    }
}

impl EpisodeRequest {
    /// Request with a single URL source and default settings.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            sources: SourceBundle::from_url(url),
            ..Default::default()
        }
    }
}

/// Parameters for synthesizing an existing (possibly edited) script.
#[derive(Debug, Clone)]
pub struct SynthesisParams {
    pub language: String,
    pub host_name: String,
    pub guest_name: String,
    pub host_voice: VoiceSelection,
    pub guest_voice: VoiceSelection,
    pub title: Option<String>,
}

/// Terminal output bundle of one episode.
///
/// Files live in the scratch directory; the caller is expected to relocate
/// or delete them. Anything left behind is swept by age.
#[derive(Debug)]
pub struct EpisodeArtifacts {
    pub audio_path: PathBuf,
    pub transcript: String,
    pub caption_path: Option<PathBuf>,
    pub package_path: Option<PathBuf>,
    pub host_track_path: Option<PathBuf>,
    pub guest_track_path: Option<PathBuf>,
}

/// Script-only output: the editable markdown document plus the parameters
/// needed to synthesize it later.
#[derive(Debug)]
pub struct ScriptArtifacts {
    pub script: String,
    pub params: GenerationParams,
}

/// The main orchestrator for the Kringkast pipeline.
pub struct Orchestrator {
    settings: Settings,
    extractor: ContentExtractor,
    generator: ScriptGenerator,
    /// Injected synthesis capability; built from settings at episode time
    /// when absent, so script-only flows never require a TTS key.
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    catalog: Arc<VoiceCatalog>,
    scratch_dir: PathBuf,
}

impl Orchestrator {
    /// Create a new orchestrator with default components.
    pub fn new(settings: Settings) -> Result<Self> {
        // Load prompts (with optional custom directory and variables)
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let extractor = ContentExtractor::new(&settings.extraction);
        let generator = ScriptGenerator::new(&settings.generation, prompts);
        let catalog = Arc::new(VoiceCatalog::new(
            settings.voices_dir(),
            &settings.synthesis.provider,
        ));

        let scratch_dir = settings.scratch_dir();
        std::fs::create_dir_all(&scratch_dir)?;

        Ok(Self {
            settings,
            extractor,
            generator,
            synthesizer: None,
            catalog,
            scratch_dir,
        })
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        extractor: ContentExtractor,
        generator: ScriptGenerator,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        catalog: Arc<VoiceCatalog>,
    ) -> Result<Self> {
        let scratch_dir = settings.scratch_dir();
        std::fs::create_dir_all(&scratch_dir)?;

        Ok(Self {
            settings,
            extractor,
            generator,
            synthesizer: Some(synthesizer),
            catalog,
            scratch_dir,
        })
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get the voice catalog.
    pub fn catalog(&self) -> Arc<VoiceCatalog> {
        self.catalog.clone()
    }

    /// Generate a full episode from sources.
    ///
    /// A non-blank script source bypasses generation entirely; PDFs and URL
    /// are then ignored by policy.
    #[instrument(skip(self, request), fields(length = %request.length, language = %request.language))]
    pub async fn generate_episode(&self, request: EpisodeRequest) -> Result<EpisodeArtifacts> {
        if let Some(script) = request.sources.script_text() {
            info!("Script provided, skipping generation and synthesizing directly");
            if !request.sources.pdf_files.is_empty() || request.sources.url.is_some() {
                info!(
                    "Ignoring {} PDF file(s) and URL ({}) because a script was provided",
                    request.sources.pdf_files.len(),
                    request.sources.url.is_some()
                );
            }

            let params = SynthesisParams {
                language: request.language.clone(),
                host_name: request.host_name.clone(),
                guest_name: request
                    .guest_name
                    .clone()
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_GUEST_NAME.to_string()),
                host_voice: request.host_voice.clone(),
                guest_voice: request.guest_voice.clone(),
                title: request.title.clone(),
            };
            return self.synthesize_from_script(script, &params).await;
        }

        if request.sources.is_empty() {
            return Err(KringkastError::NoInput);
        }

        // Extract
        info!("Extracting source content");
        let source_text = self.extractor.extract(&request.sources).await?;

        // Generate the dialogue
        info!("Generating dialogue script");
        let dialogue = self
            .generator
            .generate(&ScriptRequest {
                source_text,
                question: request.question.clone(),
                tone: request.tone.clone(),
                length: request.length,
                language: request.language.clone(),
                host_name: request.host_name.clone(),
                guest_name: request.guest_name.clone(),
            })
            .await?;

        let turns: Vec<DialogueTurn> = dialogue.spoken_turns().cloned().collect();
        info!(
            "Dialogue ready: {} turns, guest '{}'",
            turns.len(),
            dialogue.guest_name
        );

        let params = SynthesisParams {
            language: request.language.clone(),
            host_name: request.host_name.clone(),
            guest_name: dialogue.guest_name.clone(),
            host_voice: request.host_voice.clone(),
            guest_voice: request.guest_voice.clone(),
            title: request.title.clone(),
        };

        self.produce_episode(&turns, &params).await
    }

    /// Generate only the editable markdown script, without synthesis.
    #[instrument(skip(self, request))]
    pub async fn generate_script(&self, request: EpisodeRequest) -> Result<ScriptArtifacts> {
        // A supplied script goes straight to the editor untouched.
        if let Some(script) = request.sources.script_text() {
            return Ok(ScriptArtifacts {
                script: script.to_string(),
                params: GenerationParams {
                    language: request.language.clone(),
                    host_name: request.host_name.clone(),
                    guest_name: request
                        .guest_name
                        .clone()
                        .filter(|n| !n.trim().is_empty())
                        .unwrap_or_else(|| DEFAULT_GUEST_NAME.to_string()),
                    length: request.length,
                },
            });
        }

        if request.sources.is_empty() {
            return Err(KringkastError::NoInput);
        }

        let source_text = self.extractor.extract(&request.sources).await?;

        let dialogue = self
            .generator
            .generate(&ScriptRequest {
                source_text,
                question: request.question.clone(),
                tone: request.tone.clone(),
                length: request.length,
                language: request.language.clone(),
                host_name: request.host_name.clone(),
                guest_name: request.guest_name.clone(),
            })
            .await?;

        let script = serialize_script(&dialogue, &request.host_name);

        Ok(ScriptArtifacts {
            script,
            params: GenerationParams {
                language: request.language,
                host_name: request.host_name,
                guest_name: dialogue.guest_name,
                length: request.length,
            },
        })
    }

    /// Synthesize an episode from an existing (possibly edited) script.
    #[instrument(skip(self, script, params), fields(language = %params.language))]
    pub async fn synthesize_from_script(
        &self,
        script: &str,
        params: &SynthesisParams,
    ) -> Result<EpisodeArtifacts> {
        let turns = parse_script(script, &params.host_name)?;
        self.produce_episode(&turns, params).await
    }

    /// Shared back half of the pipeline: per-turn synthesis, assembly,
    /// captions, package.
    async fn produce_episode(
        &self,
        turns: &[DialogueTurn],
        params: &SynthesisParams,
    ) -> Result<EpisodeArtifacts> {
        let spoken_count = turns.iter().filter(|t| !t.text.trim().is_empty()).count();
        if spoken_count == 0 {
            return Err(KringkastError::EmptyScript);
        }

        let synthesizer: Arc<dyn SpeechSynthesizer> = match &self.synthesizer {
            Some(s) => s.clone(),
            None => Arc::new(GoogleTtsSynthesizer::new(&self.settings.synthesis)?),
        };

        let stage = SynthesisStage::new(
            synthesizer,
            self.scratch_dir.clone(),
            &self.settings.synthesis,
        );
        stage.prepare_scratch_dir()?;

        // Episode-owned voice bindings: resolving both roles up front lets
        // collision avoidance see every claim before the first turn.
        let mut registry =
            VoiceRegistry::new(self.catalog.clone(), &self.settings.voices.default_language);
        registry.resolve(Role::Host, &params.language, &params.host_voice)?;
        registry.resolve(Role::Guest, &params.language, &params.guest_voice)?;

        // Synthesize strictly in turn order; any turn failing after retries
        // fails the whole episode so captions never drift from the audio.
        let mut clips: Vec<AudioClip> = Vec::with_capacity(spoken_count);
        let mut spoken: Vec<SpokenTurn> = Vec::with_capacity(spoken_count);

        for turn in turns {
            if turn.text.trim().is_empty() {
                continue;
            }

            let voice = registry.resolve(turn.speaker, &params.language, &VoiceSelection::Random)?;
            info!("Synthesizing {} line with voice {}", turn.speaker, voice.id);

            let path = match stage.synthesize_turn(&turn.text, turn.speaker, &voice).await {
                Ok(path) => path,
                Err(e) => {
                    self.cleanup_clips(&clips);
                    return Err(e);
                }
            };

            let duration_seconds = match probe_duration(&path).await {
                Ok(d) => d,
                Err(e) => {
                    let _ = std::fs::remove_file(&path);
                    self.cleanup_clips(&clips);
                    return Err(e);
                }
            };

            spoken.push(SpokenTurn {
                role: turn.speaker,
                speaker: turn
                    .speaker
                    .display_name(&params.host_name, &params.guest_name)
                    .to_string(),
                text: turn.text.clone(),
            });
            clips.push(AudioClip {
                path,
                duration_seconds,
            });
        }

        // Assemble the combined track and timeline
        let assembler = TimelineAssembler::new(self.scratch_dir.clone());
        let assembled = match assembler.assemble(&spoken, &clips).await {
            Ok(assembled) => assembled,
            Err(e) => {
                self.cleanup_clips(&clips);
                return Err(e);
            }
        };

        // The transcript is rendered only after every clip exists, so audio
        // and transcript cannot diverge on failure.
        let transcript = render_transcript(&spoken);

        // Captions are best-effort
        let caption_path = {
            let path = assembled.combined_path.with_extension("vtt");
            match write_vtt(&assembled.timeline, &path) {
                Ok(()) => Some(path),
                Err(e) => {
                    warn!("Caption write failed, episode continues without captions: {}", e);
                    None
                }
            }
        };

        // The package embeds the captions, so no captions means no package
        let package_path = caption_path.as_ref().and_then(|captions| {
            let language_code = registry
                .assignment(Role::Host)
                .map(|v| language_code_of(&v.id))
                .unwrap_or_else(|| "en".to_string());
            let title = params.title.clone().unwrap_or_else(|| "Podcast".to_string());

            let builder = PackageBuilder::new(
                self.settings.package_template_dir(),
                self.scratch_dir.clone(),
            );
            builder.build(&assembled.combined_path, captions, &language_code, &title)
        });

        let mut host_track_path = None;
        let mut guest_track_path = None;
        if let Some(mut tracks) = assembled.speaker_tracks {
            host_track_path = tracks.remove(&Role::Host);
            guest_track_path = tracks.remove(&Role::Guest);
        }

        // Per-turn clips are scratch-only; the sweeper would get them
        // eventually, but be tidy now.
        self.cleanup_clips(&clips);
        sweep_scratch(
            &self.scratch_dir,
            Duration::from_secs(self.settings.cleanup.max_age_seconds),
        );

        info!(
            "Episode complete: {} ({} turns, {:.1}s)",
            assembled.combined_path.display(),
            spoken.len(),
            assembled.timeline.total_duration()
        );

        Ok(EpisodeArtifacts {
            audio_path: assembled.combined_path,
            transcript,
            caption_path,
            package_path,
            host_track_path,
            guest_track_path,
        })
    }

    /// Remove per-turn scratch clips; failures are logged, never raised, so
    /// cleanup cannot mask a primary error.
    fn cleanup_clips(&self, clips: &[AudioClip]) {
        for clip in clips {
            if let Err(e) = std::fs::remove_file(&clip.path) {
                warn!("Failed to clean up clip {}: {}", clip.path.display(), e);
            }
        }
    }
}

/// Render the plain-text transcript in turn order.
fn render_transcript(turns: &[SpokenTurn]) -> String {
    let mut transcript = String::new();
    for turn in turns {
        transcript.push_str(&format!("**{}**: {}\n\n", turn.speaker, turn.text));
    }
    transcript
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ContentFetcher;
    use crate::script::{Dialogue, DialogueModel};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct MarkingFetcher {
        called: Arc<AtomicBool>,
    }

    #[async_trait]
    impl ContentFetcher for MarkingFetcher {
        async fn fetch(&self, _url: &str) -> Result<String> {
            self.called.store(true, Ordering::SeqCst);
            Ok("fetched content".to_string())
        }
    }

    struct MarkingModel {
        called: Arc<AtomicBool>,
    }

    #[async_trait]
    impl DialogueModel for MarkingModel {
        async fn complete(&self, _system: &str, _user: &str) -> Result<Dialogue> {
            self.called.store(true, Ordering::SeqCst);
            Ok(Dialogue {
                scratchpad: String::new(),
                guest_name: "Guest".to_string(),
                turns: Vec::new(),
            })
        }
    }

    struct FailingSynthesizer;

    #[async_trait]
    impl crate::synth::SpeechSynthesizer for FailingSynthesizer {
        async fn synthesize(
            &self,
            _text: &str,
            _voice_id: &str,
            _language_code: &str,
        ) -> Result<Vec<u8>> {
            Err(KringkastError::Audio("synthesis backend down".to_string()))
        }
    }

    struct TestFixture {
        orchestrator: Orchestrator,
        scratch: tempfile::TempDir,
        _voices: tempfile::TempDir,
        fetcher_called: Arc<AtomicBool>,
        model_called: Arc<AtomicBool>,
    }

    fn fixture() -> TestFixture {
        let scratch = tempfile::tempdir().unwrap();
        let voices = tempfile::tempdir().unwrap();

        let provider_dir = voices.path().join("google_tts");
        std::fs::create_dir_all(&provider_dir).unwrap();
        std::fs::write(
            provider_dir.join("english.json"),
            r#"{"voices": [
                {"id": "en-F1", "name": "F One", "gender": "female"},
                {"id": "en-M1", "name": "M One", "gender": "male"}
            ]}"#,
        )
        .unwrap();

        let mut settings = Settings::default();
        settings.general.scratch_dir = scratch.path().display().to_string();
        settings.synthesis.retry_attempts = 2;
        settings.synthesis.retry_delay_seconds = 0;

        let fetcher_called = Arc::new(AtomicBool::new(false));
        let model_called = Arc::new(AtomicBool::new(false));

        let extractor = ContentExtractor::with_fetcher(
            Arc::new(MarkingFetcher {
                called: fetcher_called.clone(),
            }),
            settings.extraction.character_limit,
        );
        let generator = ScriptGenerator::with_model(
            Arc::new(MarkingModel {
                called: model_called.clone(),
            }),
            Prompts::default(),
            Duration::from_secs(5),
            Duration::from_secs(5),
        );
        let catalog = Arc::new(VoiceCatalog::new(
            voices.path().to_path_buf(),
            "google_tts",
        ));

        let orchestrator = Orchestrator::with_components(
            settings,
            extractor,
            generator,
            Arc::new(FailingSynthesizer),
            catalog,
        )
        .unwrap();

        TestFixture {
            orchestrator,
            scratch,
            _voices: voices,
            fetcher_called,
            model_called,
        }
    }

    #[tokio::test]
    async fn test_no_sources_is_no_input() {
        let fixture = fixture();
        match fixture
            .orchestrator
            .generate_episode(EpisodeRequest::default())
            .await
        {
            Err(KringkastError::NoInput) => {}
            other => panic!("expected NoInput, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_script_source_bypasses_generation_entirely() {
        let fixture = fixture();

        // A script alongside PDFs and a URL: only the script path is used.
        let request = EpisodeRequest {
            sources: SourceBundle {
                pdf_files: vec!["ignored.pdf".into()],
                url: Some("https://example.com".to_string()),
                script: Some("**Sam:** Hello.\n\n**Ada:** Hi.".to_string()),
            },
            ..Default::default()
        };

        // Synthesis fails by construction; what matters is that neither the
        // fetcher nor the model was ever consulted.
        let result = fixture.orchestrator.generate_episode(request).await;
        assert!(matches!(result, Err(KringkastError::Synthesis { .. })));
        assert!(!fixture.fetcher_called.load(Ordering::SeqCst));
        assert!(!fixture.model_called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_failed_synthesis_leaves_no_episode_files() {
        let fixture = fixture();

        let request = EpisodeRequest {
            sources: SourceBundle::from_script("**Sam:** Hello.\n\n**Ada:** Hi."),
            ..Default::default()
        };

        match fixture.orchestrator.generate_episode(request).await {
            Err(KringkastError::Synthesis { attempts, .. }) => assert_eq!(attempts, 2),
            other => panic!("expected Synthesis, got {:?}", other),
        }

        // No combined audio or stray clips attributable to the failed episode.
        for entry in std::fs::read_dir(fixture.scratch.path()).unwrap().flatten() {
            let name = entry.file_name().to_string_lossy().to_string();
            assert!(
                !name.starts_with("podcast-") && !name.starts_with("turn-"),
                "unexpected leftover: {}",
                name
            );
        }
    }

    #[tokio::test]
    async fn test_generate_script_passes_supplied_script_through() {
        let fixture = fixture();

        let request = EpisodeRequest {
            sources: SourceBundle::from_script("**Sam:** Already written."),
            ..Default::default()
        };

        let artifacts = fixture.orchestrator.generate_script(request).await.unwrap();
        assert_eq!(artifacts.script, "**Sam:** Already written.");
        assert_eq!(artifacts.params.guest_name, DEFAULT_GUEST_NAME);
        assert!(!fixture.model_called.load(Ordering::SeqCst));
    }

    #[test]
    fn test_render_transcript_format_and_order() {
        let turns = vec![
            SpokenTurn {
                role: Role::Host,
                speaker: "Sam".to_string(),
                text: "Hello.".to_string(),
            },
            SpokenTurn {
                role: Role::Guest,
                speaker: "Ada".to_string(),
                text: "Hi there.".to_string(),
            },
        ];

        let transcript = render_transcript(&turns);
        assert_eq!(transcript, "**Sam**: Hello.\n\n**Ada**: Hi there.\n\n");
    }

    #[test]
    fn test_default_request_values() {
        let request = EpisodeRequest::default();
        assert_eq!(request.host_name, "Sam");
        assert_eq!(request.language, "English");
        assert_eq!(request.length, LengthTier::Medium);
        assert_eq!(request.host_voice, VoiceSelection::Random);
    }
}

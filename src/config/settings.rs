//! Configuration settings for Kringkast.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub extraction: ExtractionSettings,
    pub generation: GenerationSettings,
    pub synthesis: SynthesisSettings,
    pub voices: VoiceSettings,
    pub cleanup: CleanupSettings,
    pub prompts: PromptSettings,
}


/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data (voice catalogs, package template).
    pub data_dir: String,
    /// Directory for transient episode files (clips, captions, packages).
    pub scratch_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.kringkast".to_string(),
            scratch_dir: "/tmp/kringkast".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Content extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionSettings {
    /// Maximum combined character count across all sources.
    pub character_limit: usize,
    /// Reader-proxy endpoint prepended to fetched URLs.
    pub reader_url: String,
    /// Number of fetch attempts before giving up.
    pub fetch_attempts: u32,
    /// Delay between fetch attempts, in seconds.
    pub fetch_retry_delay_seconds: u64,
    /// Per-request fetch timeout, in seconds.
    pub fetch_timeout_seconds: u64,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            character_limit: 100_000,
            reader_url: "https://r.jina.ai/".to_string(),
            fetch_attempts: 3,
            fetch_retry_delay_seconds: 5,
            fetch_timeout_seconds: 60,
        }
    }
}

/// Script generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Chat model used for dialogue generation.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Timeout for the first-draft pass, in seconds.
    pub first_pass_timeout_seconds: u64,
    /// Timeout for the improvement pass, in seconds. Shorter than the first
    /// pass: a slow improvement is abandoned in favor of the draft.
    pub second_pass_timeout_seconds: u64,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            temperature: 0.1,
            first_pass_timeout_seconds: 180,
            second_pass_timeout_seconds: 90,
        }
    }
}

/// Speech synthesis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisSettings {
    /// TTS provider key; selects the voice catalog subdirectory.
    pub provider: String,
    /// Synthesis endpoint.
    pub endpoint: String,
    /// Number of synthesis attempts per line before the episode fails.
    pub retry_attempts: u32,
    /// Delay between synthesis attempts, in seconds.
    pub retry_delay_seconds: u64,
}

impl Default for SynthesisSettings {
    fn default() -> Self {
        Self {
            provider: "google_tts".to_string(),
            endpoint: "https://texttospeech.googleapis.com/v1/text:synthesize".to_string(),
            retry_attempts: 3,
            retry_delay_seconds: 5,
        }
    }
}

/// Voice catalog settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceSettings {
    /// Directory holding per-provider voice catalogs. Relative paths resolve
    /// under the data directory.
    pub voices_dir: String,
    /// Language used when a requested language has no catalog.
    pub default_language: String,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            voices_dir: "voices".to_string(),
            default_language: "English".to_string(),
        }
    }
}

/// Scratch directory cleanup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupSettings {
    /// Age in seconds after which scratch files become eligible for deletion.
    pub max_age_seconds: u64,
    /// Interval between background sweeps, in seconds.
    pub sweep_interval_seconds: u64,
}

impl Default for CleanupSettings {
    fn default() -> Self {
        Self {
            max_age_seconds: 24 * 60 * 60, // 1 day
            sweep_interval_seconds: 3600,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}


impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::KringkastError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kringkast")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded scratch directory path.
    pub fn scratch_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.scratch_dir)
    }

    /// Get the expanded voice catalog directory path.
    ///
    /// A relative `voices_dir` lives under the data directory.
    pub fn voices_dir(&self) -> PathBuf {
        let expanded = Self::expand_path(&self.voices.voices_dir);
        if expanded.is_absolute() {
            expanded
        } else {
            self.data_dir().join(expanded)
        }
    }

    /// Get the expanded package template directory path.
    pub fn package_template_dir(&self) -> PathBuf {
        self.data_dir().join("transcript_template")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.extraction.character_limit, 100_000);
        assert_eq!(settings.synthesis.retry_attempts, 3);
        assert_eq!(settings.cleanup.max_age_seconds, 86_400);
    }

    #[test]
    fn test_relative_voices_dir_under_data_dir() {
        let settings = Settings::default();
        assert!(settings.voices_dir().starts_with(settings.data_dir()));
    }

    #[test]
    fn test_absolute_voices_dir_kept() {
        let mut settings = Settings::default();
        settings.voices.voices_dir = "/srv/voices".to_string();
        assert_eq!(settings.voices_dir(), PathBuf::from("/srv/voices"));
    }
}

//! Configuration module for Kringkast.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, ScriptPrompts};
pub use settings::{
    CleanupSettings, ExtractionSettings, GeneralSettings, GenerationSettings, PromptSettings,
    Settings, SynthesisSettings, VoiceSettings,
};

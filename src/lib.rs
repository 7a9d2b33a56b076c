//! Kringkast - Podcast Generation
//!
//! Turn PDFs, web pages, or hand-written scripts into multi-speaker audio
//! podcasts with synchronized captions and a packaged interactive transcript.
//!
//! The name "Kringkast" comes from the Norwegian word for "broadcast."
//!
//! # Overview
//!
//! Kringkast allows you to:
//! - Extract text from PDFs and web pages
//! - Generate a two-speaker dialogue script with an LLM
//! - Edit the script as markdown before synthesis
//! - Synthesize each line with per-role voices and stitch a full episode
//! - Export WebVTT captions and an interactive-transcript package
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `extract` - Content extraction (PDF, URL)
//! - `script` - Dialogue types, LLM script generation, markdown round-trip
//! - `voice` - Voice catalogs and per-episode voice assignment
//! - `synth` - Speech synthesis with retries
//! - `audio` - Timeline assembly and ffmpeg-backed audio export
//! - `captions` - WebVTT caption writing
//! - `package` - Interactive-transcript package building
//! - `pipeline` - Episode orchestration and scratch cleanup
//!
//! # Example
//!
//! ```rust,no_run
//! use kringkast::config::Settings;
//! use kringkast::pipeline::{EpisodeRequest, Orchestrator};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let request = EpisodeRequest::from_url("https://en.wikipedia.org/wiki/Podcast");
//!     let artifacts = orchestrator.generate_episode(request).await?;
//!     println!("Episode audio: {}", artifacts.audio_path.display());
//!
//!     Ok(())
//! }
//! ```

pub mod audio;
pub mod captions;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod openai;
pub mod package;
pub mod pipeline;
pub mod script;
pub mod synth;
pub mod voice;

pub use error::{KringkastError, Result};

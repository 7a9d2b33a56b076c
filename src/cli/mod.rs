//! CLI module for Kringkast.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Kringkast - Podcast Generation
///
/// Turn PDFs, web pages, or hand-written scripts into multi-speaker audio
/// podcasts with captions. The name "Kringkast" comes from the Norwegian
/// word for "broadcast."
#[derive(Parser, Debug)]
#[command(name = "kringkast")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Kringkast and verify system requirements
    Init,

    /// Check system requirements and configuration
    Doctor,

    /// Generate a full episode from PDFs, a URL, or a script file
    Generate {
        /// PDF files to include as source material
        #[arg(short, long)]
        pdf: Vec<String>,

        /// URL to include as source material
        #[arg(short, long)]
        url: Option<String>,

        /// Markdown script file; skips generation and synthesizes directly
        #[arg(long)]
        script: Option<String>,

        /// Focus question or topic for the conversation
        #[arg(short, long)]
        question: Option<String>,

        /// Conversational tone
        #[arg(long, default_value = "Fun")]
        tone: String,

        /// Episode length (short, medium, long)
        #[arg(short, long, default_value = "medium")]
        length: String,

        /// Output language
        #[arg(long, default_value = "English")]
        language: String,

        /// Host display name
        #[arg(long, default_value = "Sam")]
        host_name: String,

        /// Guest display name (the model picks one when omitted)
        #[arg(long)]
        guest_name: Option<String>,

        /// Host voice: "male", "female", "random", or a concrete voice id
        #[arg(long, default_value = "random")]
        host_voice: String,

        /// Guest voice: "male", "female", "random", or a concrete voice id
        #[arg(long, default_value = "random")]
        guest_voice: String,

        /// Title for the transcript package
        #[arg(long)]
        title: Option<String>,

        /// Directory to move the episode artifacts into
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Generate an editable markdown script without synthesizing audio
    Script {
        /// PDF files to include as source material
        #[arg(short, long)]
        pdf: Vec<String>,

        /// URL to include as source material
        #[arg(short, long)]
        url: Option<String>,

        /// Focus question or topic for the conversation
        #[arg(short, long)]
        question: Option<String>,

        /// Conversational tone
        #[arg(long, default_value = "Fun")]
        tone: String,

        /// Episode length (short, medium, long)
        #[arg(short, long, default_value = "medium")]
        length: String,

        /// Output language
        #[arg(long, default_value = "English")]
        language: String,

        /// Host display name
        #[arg(long, default_value = "Sam")]
        host_name: String,

        /// Guest display name (the model picks one when omitted)
        #[arg(long)]
        guest_name: Option<String>,

        /// Write the script here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Synthesize an episode from an edited markdown script
    Synth {
        /// Path to the markdown script file
        script: String,

        /// Output language
        #[arg(long, default_value = "English")]
        language: String,

        /// Host display name (must match the script's speaker tags)
        #[arg(long, default_value = "Sam")]
        host_name: String,

        /// Guest display name
        #[arg(long, default_value = "AI Assistant")]
        guest_name: String,

        /// Host voice: "male", "female", "random", or a concrete voice id
        #[arg(long, default_value = "random")]
        host_voice: String,

        /// Guest voice: "male", "female", "random", or a concrete voice id
        #[arg(long, default_value = "random")]
        guest_voice: String,

        /// Title for the transcript package
        #[arg(long)]
        title: Option<String>,

        /// Directory to move the episode artifacts into
        #[arg(short, long)]
        output: Option<String>,
    },

    /// List voice catalog languages, or the voices for one language
    Voices {
        /// Language to list voices for (lists languages when omitted)
        language: Option<String>,
    },
}

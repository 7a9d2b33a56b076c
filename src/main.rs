//! Kringkast CLI entry point.

use anyhow::Result;
use clap::Parser;
use kringkast::cli::{commands, Cli, Commands};
use kringkast::config::Settings;
use kringkast::pipeline::ScratchSweeper;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("kringkast={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Ensure data directories exist
    std::fs::create_dir_all(settings.data_dir())?;
    std::fs::create_dir_all(settings.scratch_dir())?;

    // Background scratch cleanup runs for the life of the process
    let sweeper = ScratchSweeper::start(settings.scratch_dir(), &settings.cleanup);

    // Execute command
    let result = match cli.command {
        Commands::Init => commands::run_init(&settings),

        Commands::Doctor => commands::run_doctor(&settings),

        Commands::Generate {
            pdf,
            url,
            script,
            question,
            tone,
            length,
            language,
            host_name,
            guest_name,
            host_voice,
            guest_voice,
            title,
            output,
        } => {
            commands::run_generate(
                pdf,
                url,
                script,
                question,
                tone,
                &length,
                language,
                host_name,
                guest_name,
                &host_voice,
                &guest_voice,
                title,
                output,
                settings,
            )
            .await
        }

        Commands::Script {
            pdf,
            url,
            question,
            tone,
            length,
            language,
            host_name,
            guest_name,
            output,
        } => {
            commands::run_script(
                pdf,
                url,
                question,
                tone,
                &length,
                language,
                host_name,
                guest_name,
                output,
                settings,
            )
            .await
        }

        Commands::Synth {
            script,
            language,
            host_name,
            guest_name,
            host_voice,
            guest_voice,
            title,
            output,
        } => {
            commands::run_synth(
                &script,
                language,
                host_name,
                guest_name,
                &host_voice,
                &guest_voice,
                title,
                output,
                settings,
            )
            .await
        }

        Commands::Voices { language } => commands::run_voices(language, &settings),
    };

    sweeper.stop();
    result
}

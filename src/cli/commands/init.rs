//! Init command - first-run setup.

use crate::cli::Output;
use crate::config::Settings;
use crate::openai;
use crate::synth::GoogleTtsSynthesizer;
use console::style;

/// Run the init command: create directories, write a default config, and
/// point out anything still missing.
pub fn run_init(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Kringkast Setup");
    println!();

    std::fs::create_dir_all(settings.data_dir())?;
    std::fs::create_dir_all(settings.scratch_dir())?;
    std::fs::create_dir_all(settings.voices_dir().join(&settings.synthesis.provider))?;
    Output::success(&format!("Data directory: {}", settings.data_dir().display()));
    Output::success(&format!(
        "Scratch directory: {}",
        settings.scratch_dir().display()
    ));

    let config_path = Settings::default_config_path();
    if config_path.exists() {
        Output::info(&format!("Using configuration at {}", config_path.display()));
    } else {
        settings.save()?;
        Output::success(&format!(
            "Wrote default configuration to {}",
            config_path.display()
        ));
    }

    println!();
    if !openai::is_api_key_configured() {
        Output::warning("OPENAI_API_KEY is not set (needed for script generation).");
        println!("  {}", style("export OPENAI_API_KEY='sk-...'").green());
    }
    if !GoogleTtsSynthesizer::is_api_key_configured() {
        Output::warning("GOOGLE_TTS_API_KEY is not set (needed for speech synthesis).");
        println!("  {}", style("export GOOGLE_TTS_API_KEY='...'").green());
    }

    println!();
    Output::info("Drop voice catalogs into:");
    println!(
        "  {}",
        settings
            .voices_dir()
            .join(&settings.synthesis.provider)
            .join("english.json")
            .display()
    );
    Output::info("Place the transcript package template at:");
    println!("  {}", settings.package_template_dir().display());
    println!();
    Output::info("Run 'kringkast doctor' to verify the full setup.");

    Ok(())
}

//! Voices command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::voice::VoiceCatalog;
use anyhow::Result;

/// Run the voices command: list languages, or the voices for one language.
pub fn run_voices(language: Option<String>, settings: &Settings) -> Result<()> {
    let catalog = VoiceCatalog::new(settings.voices_dir(), &settings.synthesis.provider);

    match language {
        None => {
            let languages = catalog.available_languages();
            if languages.is_empty() {
                Output::warning(&format!(
                    "No voice catalogs found under {}",
                    settings.voices_dir().display()
                ));
                Output::info("Expected layout: <voices_dir>/<provider>/<language>.json");
                return Ok(());
            }

            Output::header(&format!("Languages ({})", catalog.provider()));
            for language in languages {
                Output::list_item(&language);
            }
        }
        Some(language) => {
            let (male, female) = catalog.options_by_gender(&language);
            if male.is_empty() && female.is_empty() {
                Output::warning(&format!(
                    "No voices for '{}' (provider '{}')",
                    language,
                    catalog.provider()
                ));
                return Ok(());
            }

            Output::header(&format!("{} voices ({})", language, catalog.provider()));
            println!("\nFemale:");
            for voice in female {
                Output::kv(&voice.id, &voice.display_name);
            }
            println!("\nMale:");
            for voice in male {
                Output::kv(&voice.id, &voice.display_name);
            }
        }
    }

    Ok(())
}

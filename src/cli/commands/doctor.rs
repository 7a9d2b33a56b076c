//! Doctor command - verify system requirements and configuration.

use crate::cli::Output;
use crate::config::Settings;
use crate::openai;
use crate::synth::GoogleTtsSynthesizer;
use console::style;
use std::process::Command;

/// Check result for a single item.
#[derive(Debug)]
struct CheckResult {
    name: String,
    status: CheckStatus,
    message: String,
    hint: Option<String>,
}

#[derive(Debug, PartialEq)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Kringkast Doctor");
    println!();

    let mut results = Vec::new();

    results.push(check_tool("ffmpeg"));
    results.push(check_tool("ffprobe"));

    results.push(if openai::is_api_key_configured() {
        CheckResult::ok("OPENAI_API_KEY", "configured")
    } else {
        CheckResult::error(
            "OPENAI_API_KEY",
            "not set",
            "export OPENAI_API_KEY='sk-...' (needed for script generation)",
        )
    });

    results.push(if GoogleTtsSynthesizer::is_api_key_configured() {
        CheckResult::ok("GOOGLE_TTS_API_KEY", "configured")
    } else {
        CheckResult::error(
            "GOOGLE_TTS_API_KEY",
            "not set",
            "export GOOGLE_TTS_API_KEY='...' (needed for speech synthesis)",
        )
    });

    results.push(check_scratch_dir(settings));
    results.push(check_voice_catalogs(settings));

    results.push(if settings.package_template_dir().is_dir() {
        CheckResult::ok("package template", "present")
    } else {
        CheckResult::warning(
            "package template",
            "missing",
            &format!(
                "Place the transcript template at {} or episodes will skip the package",
                settings.package_template_dir().display()
            ),
        )
    });

    for result in &results {
        result.print();
    }

    println!();
    let errors = results.iter().filter(|r| r.status == CheckStatus::Error).count();
    let warnings = results
        .iter()
        .filter(|r| r.status == CheckStatus::Warning)
        .count();

    if errors == 0 && warnings == 0 {
        Output::success("All checks passed.");
    } else if errors == 0 {
        Output::warning(&format!("{} warning(s); generation should still work.", warnings));
    } else {
        Output::error(&format!("{} error(s), {} warning(s).", errors, warnings));
    }

    Ok(())
}

fn check_tool(name: &str) -> CheckResult {
    match Command::new(name).arg("-version").output() {
        Ok(output) if output.status.success() => CheckResult::ok(name, "installed"),
        _ => CheckResult::error(
            name,
            "not found",
            &format!("Install {} and ensure it's in your PATH", name),
        ),
    }
}

fn check_scratch_dir(settings: &Settings) -> CheckResult {
    let dir = settings.scratch_dir();
    if std::fs::create_dir_all(&dir).is_err() {
        return CheckResult::error(
            "scratch directory",
            "cannot create",
            &format!("Check permissions for {}", dir.display()),
        );
    }

    let probe = dir.join(".doctor-probe");
    match std::fs::write(&probe, b"") {
        Ok(()) => {
            let _ = std::fs::remove_file(&probe);
            CheckResult::ok("scratch directory", "writable")
        }
        Err(e) => CheckResult::error(
            "scratch directory",
            "not writable",
            &format!("{}: {}", dir.display(), e),
        ),
    }
}

fn check_voice_catalogs(settings: &Settings) -> CheckResult {
    let catalog = crate::voice::VoiceCatalog::new(settings.voices_dir(), &settings.synthesis.provider);
    let languages = catalog.available_languages();
    if languages.is_empty() {
        CheckResult::warning(
            "voice catalogs",
            "none found",
            &format!(
                "Add <language>.json files under {}",
                settings
                    .voices_dir()
                    .join(&settings.synthesis.provider)
                    .display()
            ),
        )
    } else {
        CheckResult::ok(
            "voice catalogs",
            &format!("{} language(s) available", languages.len()),
        )
    }
}

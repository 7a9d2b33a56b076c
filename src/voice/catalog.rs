//! On-disk voice catalogs.
//!
//! Layout: `<voices_dir>/<provider>/<language>.json`, each file holding
//! `{"voices": [{"id": ..., "name": ..., "gender": "male"|"female"}, ...]}`.
//! Files are loaded lazily and cached; the catalog is read-only after load.

use super::{Gender, VoiceDescriptor};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;
use tracing::warn;

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    voices: Vec<VoiceDescriptor>,
}

/// Voice catalog for one provider.
pub struct VoiceCatalog {
    voices_dir: PathBuf,
    provider: String,
    cache: RwLock<HashMap<String, Vec<VoiceDescriptor>>>,
}

impl VoiceCatalog {
    pub fn new(voices_dir: PathBuf, provider: &str) -> Self {
        Self {
            voices_dir,
            provider: provider.to_string(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// All voices for a language. Missing or unreadable catalog files yield
    /// an empty list (logged), never an error: resolution has fallbacks.
    pub fn load(&self, language: &str) -> Vec<VoiceDescriptor> {
        let key = language.to_lowercase();

        if let Some(cached) = self.cache.read().expect("catalog lock").get(&key) {
            return cached.clone();
        }

        let path = self
            .voices_dir
            .join(&self.provider)
            .join(format!("{}.json", key));

        let voices = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<CatalogFile>(&content) {
                Ok(file) => file
                    .voices
                    .into_iter()
                    .map(|mut v| {
                        v.language = language.to_string();
                        v
                    })
                    .collect(),
                Err(e) => {
                    warn!("Invalid voice catalog {}: {}", path.display(), e);
                    Vec::new()
                }
            },
            Err(_) => {
                warn!("Voice catalog not found: {}", path.display());
                Vec::new()
            }
        };

        self.cache
            .write()
            .expect("catalog lock")
            .insert(key, voices.clone());
        voices
    }

    /// Voices for a language filtered by gender.
    pub fn by_gender(&self, language: &str, gender: Gender) -> Vec<VoiceDescriptor> {
        self.load(language)
            .into_iter()
            .filter(|v| v.gender == gender)
            .collect()
    }

    /// Look up a voice by id.
    pub fn by_id(&self, language: &str, id: &str) -> Option<VoiceDescriptor> {
        self.load(language).into_iter().find(|v| v.id == id)
    }

    /// Languages with a catalog file for this provider, sorted.
    pub fn available_languages(&self) -> Vec<String> {
        let provider_dir = self.voices_dir.join(&self.provider);
        let Ok(entries) = std::fs::read_dir(&provider_dir) else {
            return Vec::new();
        };

        let mut languages: Vec<String> = entries
            .flatten()
            .filter_map(|entry| {
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) == Some("json") {
                    path.file_stem()
                        .and_then(|s| s.to_str())
                        .map(capitalize)
                } else {
                    None
                }
            })
            .collect();

        languages.sort();
        languages
    }

    /// All voices for a language, grouped by gender.
    pub fn options_by_gender(
        &self,
        language: &str,
    ) -> (Vec<VoiceDescriptor>, Vec<VoiceDescriptor>) {
        let voices = self.load(language);
        let (male, female) = voices
            .into_iter()
            .partition(|v| v.gender == Gender::Male);
        (male, female)
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_catalog(dir: &std::path::Path, provider: &str, language: &str, json: &str) {
        let provider_dir = dir.join(provider);
        fs::create_dir_all(&provider_dir).unwrap();
        fs::write(
            provider_dir.join(format!("{}.json", language.to_lowercase())),
            json,
        )
        .unwrap();
    }

    const ENGLISH: &str = r#"{"voices": [
        {"id": "en-US-Chirp-HD-F", "name": "Chirp HD F", "gender": "female"},
        {"id": "en-US-Chirp-HD-O", "name": "Chirp HD O", "gender": "female"},
        {"id": "en-US-Chirp-HD-D", "name": "Chirp HD D", "gender": "male"}
    ]}"#;

    #[test]
    fn test_load_and_filter() {
        let dir = tempfile::tempdir().unwrap();
        write_catalog(dir.path(), "google_tts", "English", ENGLISH);

        let catalog = VoiceCatalog::new(dir.path().to_path_buf(), "google_tts");
        assert_eq!(catalog.load("English").len(), 3);
        assert_eq!(catalog.by_gender("English", Gender::Female).len(), 2);
        assert_eq!(catalog.by_gender("English", Gender::Male).len(), 1);

        let voice = catalog.by_id("English", "en-US-Chirp-HD-D").unwrap();
        assert_eq!(voice.gender, Gender::Male);
        assert_eq!(voice.language, "English");
    }

    #[test]
    fn test_missing_catalog_is_empty_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = VoiceCatalog::new(dir.path().to_path_buf(), "google_tts");
        assert!(catalog.load("Klingon").is_empty());
    }

    #[test]
    fn test_language_lookup_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        write_catalog(dir.path(), "google_tts", "English", ENGLISH);

        let catalog = VoiceCatalog::new(dir.path().to_path_buf(), "google_tts");
        assert_eq!(catalog.load("english").len(), 3);
        assert_eq!(catalog.load("ENGLISH").len(), 3);
    }

    #[test]
    fn test_available_languages_sorted() {
        let dir = tempfile::tempdir().unwrap();
        write_catalog(dir.path(), "google_tts", "Spanish", r#"{"voices": []}"#);
        write_catalog(dir.path(), "google_tts", "English", r#"{"voices": []}"#);

        let catalog = VoiceCatalog::new(dir.path().to_path_buf(), "google_tts");
        assert_eq!(catalog.available_languages(), vec!["English", "Spanish"]);
    }

    #[test]
    fn test_options_by_gender_partitions() {
        let dir = tempfile::tempdir().unwrap();
        write_catalog(dir.path(), "google_tts", "English", ENGLISH);

        let catalog = VoiceCatalog::new(dir.path().to_path_buf(), "google_tts");
        let (male, female) = catalog.options_by_gender("English");
        assert_eq!(male.len(), 1);
        assert_eq!(female.len(), 2);
    }
}

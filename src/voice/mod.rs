//! Voice catalogs and per-episode voice assignment.
//!
//! Catalogs live on disk as JSON files keyed by provider and language and
//! are read-only at runtime. Assignment of concrete voices to the Host and
//! Guest roles is episode-scoped: resolved once, cached for the episode,
//! and reset before the next one.

mod catalog;
mod registry;

pub use catalog::VoiceCatalog;
pub use registry::VoiceRegistry;

use serde::{Deserialize, Serialize};

/// Voice gender tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Pick a gender uniformly at random.
    pub fn pick_random() -> Self {
        use rand::seq::SliceRandom;
        *[Gender::Male, Gender::Female]
            .choose(&mut rand::thread_rng())
            .expect("non-empty slice")
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

/// A concrete, provider-specific synthesizable voice identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceDescriptor {
    /// Provider voice id (e.g. "en-US-Chirp-HD-F").
    pub id: String,
    /// Human-readable name shown in voice listings.
    #[serde(rename = "name")]
    pub display_name: String,
    pub gender: Gender,
    /// Catalog language; filled from the catalog file name at load time.
    #[serde(skip)]
    pub language: String,
}

/// How a caller asks for a role's voice.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VoiceSelection {
    /// Pick a gender at random, then a voice of that gender.
    #[default]
    Random,
    /// Pick a random voice of this gender.
    Gender(Gender),
    /// Use this concrete voice id; degrades to a random pick when absent
    /// from the catalog.
    Id(String),
}

impl std::str::FromStr for VoiceSelection {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "" | "random" => VoiceSelection::Random,
            "male" => VoiceSelection::Gender(Gender::Male),
            "female" => VoiceSelection::Gender(Gender::Female),
            _ => VoiceSelection::Id(s.trim().to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_parsing() {
        assert_eq!("random".parse::<VoiceSelection>().unwrap(), VoiceSelection::Random);
        assert_eq!("".parse::<VoiceSelection>().unwrap(), VoiceSelection::Random);
        assert_eq!(
            "Male".parse::<VoiceSelection>().unwrap(),
            VoiceSelection::Gender(Gender::Male)
        );
        assert_eq!(
            "en-US-Chirp-HD-F".parse::<VoiceSelection>().unwrap(),
            VoiceSelection::Id("en-US-Chirp-HD-F".to_string())
        );
    }

    #[test]
    fn test_descriptor_deserialization() {
        let json = r#"{"id": "en-US-Chirp-HD-F", "name": "Chirp HD F", "gender": "female"}"#;
        let descriptor: VoiceDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(descriptor.gender, Gender::Female);
        assert_eq!(descriptor.display_name, "Chirp HD F");
        assert!(descriptor.language.is_empty());
    }
}

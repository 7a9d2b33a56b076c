//! Dialogue script types and generation.
//!
//! A script is an ordered sequence of turns, each attributed to the abstract
//! Host or Guest role. Display names are bound only when rendering
//! transcripts and markdown, so the generation contract stays stable no
//! matter what the user calls the speakers.

mod generate;
mod markdown;

pub use generate::{DialogueModel, OpenAiDialogueModel, ScriptGenerator, ScriptRequest};
pub use markdown::{parse_script, serialize_script};

use serde::{Deserialize, Serialize};

/// Abstract speaker role, independent of the display name chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Host,
    Guest,
}

impl Role {
    /// Resolve the display name for this role.
    pub fn display_name<'a>(&self, host_name: &'a str, guest_name: &'a str) -> &'a str {
        match self {
            Role::Host => host_name,
            Role::Guest => guest_name,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Host => write!(f, "host"),
            Role::Guest => write!(f, "guest"),
        }
    }
}

/// Requested episode length tier.
///
/// The tier translates into advisory turn-count guidance for the model; the
/// generated dialogue is not strictly bounded by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LengthTier {
    /// Roughly 1-2 minutes.
    Short,
    /// Roughly 3-5 minutes.
    #[default]
    Medium,
    /// Roughly 10-12 minutes.
    Long,
}

impl LengthTier {
    /// Advisory (min, max) turn count for this tier.
    pub fn turn_guidance(&self) -> (u32, u32) {
        match self {
            LengthTier::Short => (11, 17),
            LengthTier::Medium => (19, 29),
            LengthTier::Long => (70, 100),
        }
    }
}

impl std::str::FromStr for LengthTier {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "short" => Ok(LengthTier::Short),
            "medium" => Ok(LengthTier::Medium),
            "long" => Ok(LengthTier::Long),
            _ => Err(format!("Unknown length tier: {}. Use short, medium, or long.", s)),
        }
    }
}

impl std::fmt::Display for LengthTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LengthTier::Short => write!(f, "short"),
            LengthTier::Medium => write!(f, "medium"),
            LengthTier::Long => write!(f, "long"),
        }
    }
}

/// One line of dialogue attributed to a single speaker role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueTurn {
    pub speaker: Role,
    pub text: String,
}

/// A complete generated dialogue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dialogue {
    /// Model planning notes; never spoken.
    #[serde(default)]
    pub scratchpad: String,
    /// Guest display name chosen by the model (or overridden by the caller).
    pub guest_name: String,
    /// Ordered dialogue turns.
    #[serde(rename = "dialogue")]
    pub turns: Vec<DialogueTurn>,
}

impl Dialogue {
    /// Turns with non-empty text, in original order.
    ///
    /// The generator itself never drops turns; consumers filter here before
    /// synthesis or rendering.
    pub fn spoken_turns(&self) -> impl Iterator<Item = &DialogueTurn> {
        self.turns.iter().filter(|t| !t.text.trim().is_empty())
    }
}

/// Parameters captured at script-generation time and needed again when the
/// edited script comes back for synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationParams {
    pub language: String,
    pub host_name: String,
    pub guest_name: String,
    pub length: LengthTier,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_display_name() {
        assert_eq!(Role::Host.display_name("Sam", "Dr. Kim"), "Sam");
        assert_eq!(Role::Guest.display_name("Sam", "Dr. Kim"), "Dr. Kim");
    }

    #[test]
    fn test_length_tier_guidance() {
        assert_eq!(LengthTier::Short.turn_guidance(), (11, 17));
        assert_eq!(LengthTier::Medium.turn_guidance(), (19, 29));
        assert_eq!(LengthTier::Long.turn_guidance(), (70, 100));
    }

    #[test]
    fn test_length_tier_parse() {
        assert_eq!("short".parse::<LengthTier>().unwrap(), LengthTier::Short);
        assert_eq!("LONG".parse::<LengthTier>().unwrap(), LengthTier::Long);
        assert!("epic".parse::<LengthTier>().is_err());
    }

    #[test]
    fn test_spoken_turns_skips_empty_text() {
        let dialogue = Dialogue {
            scratchpad: String::new(),
            guest_name: "Guest".to_string(),
            turns: vec![
                DialogueTurn {
                    speaker: Role::Host,
                    text: "Welcome!".to_string(),
                },
                DialogueTurn {
                    speaker: Role::Guest,
                    text: "   ".to_string(),
                },
                DialogueTurn {
                    speaker: Role::Guest,
                    text: "Thanks for having me.".to_string(),
                },
            ],
        };

        let spoken: Vec<_> = dialogue.spoken_turns().collect();
        assert_eq!(spoken.len(), 2);
        assert_eq!(spoken[1].text, "Thanks for having me.");
    }

    #[test]
    fn test_dialogue_json_shape() {
        // The wire shape the model is asked to produce.
        let json = r#"{
            "scratchpad": "plan",
            "guest_name": "Dr. Kim",
            "dialogue": [
                {"speaker": "host", "text": "Hello"},
                {"speaker": "guest", "text": "Hi"}
            ]
        }"#;

        let dialogue: Dialogue = serde_json::from_str(json).unwrap();
        assert_eq!(dialogue.turns.len(), 2);
        assert_eq!(dialogue.turns[0].speaker, Role::Host);
        assert_eq!(dialogue.turns[1].speaker, Role::Guest);
    }
}

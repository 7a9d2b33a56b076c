//! Markdown round-trip for editable scripts.
//!
//! A generated dialogue is rendered as a small markdown document so a human
//! can revise it before synthesis, then parsed back into turns. Speaker tags
//! use the resolved display names; parsing classifies a tag as Host when it
//! matches the host name case-insensitively, anything else is the Guest.

use super::{Dialogue, DialogueTurn, Role};
use crate::error::{KringkastError, Result};

/// Separator between the header block and the dialogue body.
const SEPARATOR: &str = "---";

/// Render a dialogue as an editable markdown script.
pub fn serialize_script(dialogue: &Dialogue, host_name: &str) -> String {
    let mut out = String::from("# Podcast Script\n\n");
    out.push_str(&format!("**Host:** {}\n", host_name));
    out.push_str(&format!("**Guest:** {}\n\n", dialogue.guest_name));
    out.push_str(SEPARATOR);
    out.push_str("\n\n");

    for turn in dialogue.spoken_turns() {
        let name = turn.speaker.display_name(host_name, &dialogue.guest_name);
        out.push_str(&format!("**{}:** {}\n\n", name, turn.text));
    }

    out
}

/// Parse an edited markdown script back into dialogue turns.
///
/// Everything before the first `---` separator is header material and is
/// skipped, so the `**Host:**`/`**Guest:**` header lines are never mistaken
/// for dialogue. Lines following a speaker tag accumulate into that
/// speaker's paragraph until the next tag or end of input.
pub fn parse_script(document: &str, host_name: &str) -> Result<Vec<DialogueTurn>> {
    let body = match document.split_once("\n---") {
        Some((_, rest)) => rest,
        // No separator: treat the whole document as the body so bare
        // hand-written scripts still parse.
        None => document,
    };

    let mut turns: Vec<DialogueTurn> = Vec::new();
    let mut current: Option<(Role, String)> = None;

    for raw_line in body.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') || line == SEPARATOR {
            continue;
        }

        if let Some((name, rest)) = split_speaker_tag(line) {
            if let Some((role, text)) = current.take() {
                push_turn(&mut turns, role, text);
            }
            let role = if name.eq_ignore_ascii_case(host_name) {
                Role::Host
            } else {
                Role::Guest
            };
            current = Some((role, rest.trim().to_string()));
        } else if let Some((_, text)) = current.as_mut() {
            // Continuation line of the current speaker's paragraph.
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(line);
        }
        // Text before the first speaker tag is ignored.
    }

    if let Some((role, text)) = current.take() {
        push_turn(&mut turns, role, text);
    }

    if turns.is_empty() {
        return Err(KringkastError::EmptyScript);
    }

    Ok(turns)
}

/// Split a `**Name:** text` line into (name, remaining text).
fn split_speaker_tag(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix("**")?;
    let (name, text) = rest.split_once(":**")?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name, text))
}

fn push_turn(turns: &mut Vec<DialogueTurn>, speaker: Role, text: String) {
    let text = text.trim().to_string();
    if !text.is_empty() {
        turns.push(DialogueTurn { speaker, text });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dialogue() -> Dialogue {
        Dialogue {
            scratchpad: "plan the show".to_string(),
            guest_name: "Dr. Kim".to_string(),
            turns: vec![
                DialogueTurn {
                    speaker: Role::Host,
                    text: "Welcome to the show! Today we're joined by Dr. Kim.".to_string(),
                },
                DialogueTurn {
                    speaker: Role::Guest,
                    text: "Thanks, Sam. Happy to be here.".to_string(),
                },
                DialogueTurn {
                    speaker: Role::Host,
                    text: "Let's dive right in.".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_serialize_layout() {
        let doc = serialize_script(&sample_dialogue(), "Sam");
        assert!(doc.starts_with("# Podcast Script"));
        assert!(doc.contains("**Host:** Sam"));
        assert!(doc.contains("**Guest:** Dr. Kim"));
        assert!(doc.contains("---"));
        assert!(doc.contains("**Sam:** Welcome to the show!"));
        assert!(doc.contains("**Dr. Kim:** Thanks, Sam."));
    }

    #[test]
    fn test_round_trip_preserves_roles_and_text() {
        let dialogue = sample_dialogue();
        let doc = serialize_script(&dialogue, "Sam");
        let parsed = parse_script(&doc, "Sam").unwrap();

        assert_eq!(parsed.len(), dialogue.turns.len());
        for (parsed_turn, original) in parsed.iter().zip(&dialogue.turns) {
            assert_eq!(parsed_turn.speaker, original.speaker);
            assert_eq!(parsed_turn.text, original.text);
        }
    }

    #[test]
    fn test_parse_multi_line_paragraphs() {
        let doc = "# Podcast Script\n\n**Host:** Sam\n\n---\n\n\
                   **Sam:** This is the first line\nand this continues it.\n\n\
                   **Dr. Kim:** Short reply.\n";
        let parsed = parse_script(doc, "Sam").unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(
            parsed[0].text,
            "This is the first line and this continues it."
        );
        assert_eq!(parsed[0].speaker, Role::Host);
        assert_eq!(parsed[1].speaker, Role::Guest);
    }

    #[test]
    fn test_parse_host_match_is_case_insensitive() {
        let doc = "---\n\n**sam:** hello there\n";
        let parsed = parse_script(doc, "Sam").unwrap();
        assert_eq!(parsed[0].speaker, Role::Host);
    }

    #[test]
    fn test_parse_header_names_not_taken_as_turns() {
        let dialogue = sample_dialogue();
        let doc = serialize_script(&dialogue, "Sam");
        let parsed = parse_script(&doc, "Sam").unwrap();
        // The **Host:**/**Guest:** header lines live above the separator.
        assert!(parsed.iter().all(|t| t.text != "Sam" && t.text != "Dr. Kim"));
    }

    #[test]
    fn test_parse_no_tags_is_empty_script() {
        let doc = "# Podcast Script\n\n---\n\nJust some prose without any tags.\n";
        match parse_script(doc, "Sam") {
            Err(KringkastError::EmptyScript) => {}
            other => panic!("expected EmptyScript, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_without_separator_accepts_bare_script() {
        let doc = "**Sam:** Hello!\n\n**Ada:** Hi Sam.\n";
        let parsed = parse_script(doc, "Sam").unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].speaker, Role::Guest);
    }
}

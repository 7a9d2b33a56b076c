//! Prompt templates for Kringkast.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub script: ScriptPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}


/// Prompts for dialogue script generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptPrompts {
    /// Base system prompt establishing the podcast format.
    pub system: String,
    /// Appended when the listener supplied a focus question.
    pub question_modifier: String,
    /// Appended to set the conversational tone.
    pub tone_modifier: String,
    /// Appended to set the output language.
    pub language_modifier: String,
    /// Second-pass instruction asking the model to improve its own draft.
    pub improve: String,
}

impl Default for ScriptPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a world-class podcast producer. Your task is to transform the provided input text into an engaging two-person podcast dialogue between a host named {{host_name}} and a single guest.

The dialogue must:
1. Open with the host welcoming listeners and introducing the guest by name
2. Stay grounded in the input text; never invent facts that are not supported by it
3. Alternate naturally between the speakers, with the host guiding the conversation and the guest providing depth
4. Use spoken, conversational language - contractions, short sentences, occasional interjections
5. Close with the host thanking the guest and signing off

Use the scratchpad to plan the structure of the conversation before writing it. Every dialogue line must have non-empty text.

Respond with a JSON object of the form:
{
  "scratchpad": "your planning notes",
  "guest_name": "the guest's name",
  "dialogue": [
    {"speaker": "host", "text": "..."},
    {"speaker": "guest", "text": "..."}
  ]
}

The "speaker" field must be exactly "host" or "guest"."#
                .to_string(),

            question_modifier: "Make sure the conversation answers the following question or covers the following topic:"
                .to_string(),

            tone_modifier: "The tone of the podcast should be:".to_string(),

            language_modifier: "The podcast should be in this language:".to_string(),

            improve: r#"Here is the first draft of the dialogue you provided:

{{draft}}

Please improve the dialogue. Make it more natural and engaging. Keep the speaker roles and the guest name exactly as they are, keep every line's text non-empty, and respond in the same JSON format."#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        // Store custom variables
        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            // Load script prompts if file exists
            let script_path = custom_path.join("script.toml");
            if script_path.exists() {
                let content = std::fs::read_to_string(&script_path)?;
                prompts.script = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        // Start with custom variables, then override with provided vars
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

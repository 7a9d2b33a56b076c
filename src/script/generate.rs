//! LLM-backed dialogue generation.
//!
//! Two passes: the first produces a draft dialogue constrained to the JSON
//! shape in the system prompt; the second feeds the draft back and asks for
//! an improved version. A failed or slow improvement pass never defeats a
//! successful draft.

use super::{Dialogue, LengthTier};
use crate::config::{GenerationSettings, Prompts};
use crate::error::{KringkastError, Result};
use crate::openai::create_client_with_timeout;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Everything the generator needs to know about one script request.
#[derive(Debug, Clone)]
pub struct ScriptRequest {
    /// Source text extracted from PDFs and/or a URL.
    pub source_text: String,
    /// Optional focus question or topic.
    pub question: Option<String>,
    /// Optional conversational tone (e.g. "Fun", "Formal").
    pub tone: Option<String>,
    pub length: LengthTier,
    pub language: String,
    pub host_name: String,
    /// Caller-chosen guest name; overrides the model's choice when set.
    pub guest_name: Option<String>,
}

/// Text-generation capability: one structured dialogue per call.
#[async_trait]
pub trait DialogueModel: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_text: &str) -> Result<Dialogue>;
}

/// OpenAI chat-completion implementation of [`DialogueModel`].
pub struct OpenAiDialogueModel {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl OpenAiDialogueModel {
    pub fn new(settings: &GenerationSettings) -> Self {
        // The HTTP timeout sits above the pass timeouts so the caller-side
        // deadline fires first.
        let http_timeout = Duration::from_secs(settings.first_pass_timeout_seconds + 30);
        Self {
            client: create_client_with_timeout(http_timeout),
            model: settings.model.clone(),
            temperature: settings.temperature,
        }
    }

    /// Parse the model response into a dialogue.
    ///
    /// Models occasionally wrap JSON in markdown fences or prose; extract
    /// the outermost object before deserializing.
    fn parse_dialogue(response: &str) -> Result<Dialogue> {
        let json_start = response.find('{');
        let json_end = response.rfind('}');

        let json_str = match (json_start, json_end) {
            (Some(start), Some(end)) if end > start => &response[start..=end],
            _ => response,
        };

        serde_json::from_str(json_str).map_err(|e| {
            KringkastError::OpenAI(format!(
                "Failed to parse dialogue response: {}. Response was: {}",
                e,
                &response[..response.len().min(500)]
            ))
        })
    }
}

#[async_trait]
impl DialogueModel for OpenAiDialogueModel {
    async fn complete(&self, system_prompt: &str, user_text: &str) -> Result<Dialogue> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_prompt)
                .build()
                .map_err(|e| KringkastError::OpenAI(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_text)
                .build()
                .map_err(|e| KringkastError::OpenAI(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(|e| KringkastError::OpenAI(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| KringkastError::OpenAI(format!("Dialogue request failed: {}", e)))?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| KringkastError::OpenAI("Empty response from model".to_string()))?;

        debug!("Dialogue response: {}", &content[..content.len().min(500)]);

        Self::parse_dialogue(content)
    }
}

/// Two-pass script generator.
pub struct ScriptGenerator {
    model: Arc<dyn DialogueModel>,
    prompts: Prompts,
    first_pass_timeout: Duration,
    second_pass_timeout: Duration,
}

impl ScriptGenerator {
    /// Create a generator backed by the OpenAI chat model from settings.
    pub fn new(settings: &GenerationSettings, prompts: Prompts) -> Self {
        Self::with_model(
            Arc::new(OpenAiDialogueModel::new(settings)),
            prompts,
            Duration::from_secs(settings.first_pass_timeout_seconds),
            Duration::from_secs(settings.second_pass_timeout_seconds),
        )
    }

    /// Create a generator with a custom model capability.
    pub fn with_model(
        model: Arc<dyn DialogueModel>,
        prompts: Prompts,
        first_pass_timeout: Duration,
        second_pass_timeout: Duration,
    ) -> Self {
        Self {
            model,
            prompts,
            first_pass_timeout,
            second_pass_timeout,
        }
    }

    /// Generate a dialogue from source text.
    pub async fn generate(&self, request: &ScriptRequest) -> Result<Dialogue> {
        let system_prompt = self.build_system_prompt(request);

        let first_draft = match tokio::time::timeout(
            self.first_pass_timeout,
            self.model.complete(&system_prompt, &request.source_text),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => {
                return Err(KringkastError::GenerationTimeout {
                    seconds: self.first_pass_timeout.as_secs(),
                })
            }
        };
        info!("First draft contains {} turns", first_draft.turns.len());

        let mut dialogue = self.improve(&system_prompt, first_draft).await;

        // Caller-supplied guest name wins over the model's choice.
        if let Some(name) = &request.guest_name {
            if !name.trim().is_empty() {
                dialogue.guest_name = name.trim().to_string();
            }
        }

        Ok(dialogue)
    }

    /// Run the improvement pass; any failure returns the draft unchanged.
    async fn improve(&self, system_prompt: &str, draft: Dialogue) -> Dialogue {
        let draft_json = match serde_json::to_string(&draft) {
            Ok(json) => json,
            Err(e) => {
                warn!("Could not serialize draft for improvement pass: {}", e);
                return draft;
            }
        };

        let mut vars = HashMap::new();
        vars.insert("draft".to_string(), draft_json);
        let improve_block = self
            .prompts
            .render_with_custom(&self.prompts.script.improve, &vars);
        let improve_prompt = format!("{}\n\n{}", system_prompt, improve_block);

        match tokio::time::timeout(
            self.second_pass_timeout,
            self.model
                .complete(&improve_prompt, "Please improve the dialogue."),
        )
        .await
        {
            Ok(Ok(improved)) if !improved.turns.is_empty() => improved,
            Ok(Ok(_)) => {
                warn!("Improvement pass returned an empty dialogue, keeping first draft");
                draft
            }
            Ok(Err(e)) => {
                warn!("Improvement pass failed, keeping first draft: {}", e);
                draft
            }
            Err(_) => {
                warn!(
                    "Improvement pass timed out after {}s, keeping first draft",
                    self.second_pass_timeout.as_secs()
                );
                draft
            }
        }
    }

    /// Assemble the system prompt from the base template and request modifiers.
    fn build_system_prompt(&self, request: &ScriptRequest) -> String {
        let mut vars = HashMap::new();
        vars.insert("host_name".to_string(), request.host_name.clone());

        let mut prompt = self
            .prompts
            .render_with_custom(&self.prompts.script.system, &vars);

        if let Some(question) = &request.question {
            prompt.push_str(&format!(
                "\n\n{} {}",
                self.prompts.script.question_modifier, question
            ));
        }
        if let Some(tone) = &request.tone {
            prompt.push_str(&format!("\n\n{} {}.", self.prompts.script.tone_modifier, tone));
        }

        let (min_turns, max_turns) = request.length.turn_guidance();
        prompt.push_str(&format!(
            "\n\nThe dialogue should contain between {} and {} items.",
            min_turns, max_turns
        ));

        prompt.push_str(&format!(
            "\n\n{} {}.",
            self.prompts.script.language_modifier, request.language
        ));

        prompt
    }
}

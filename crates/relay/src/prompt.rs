//! Prompt assembly.
//!
//! Converts a conversation transcript plus a resolved model config into
//! the exact call shape the provider expects: a structured message list
//! with a system prompt, or a single flattened prompt string for
//! reasoning-style models.

use crate::RelayError;
use llm::{General, Message, Role, Tool};
use model::{CallKind, ChatModelConfig, ModelTier};

/// Base system prompt for structured chat models.
pub const REGULAR_PROMPT: &str =
    "You are a friendly assistant! Keep your responses concise and helpful.";

/// Tool guidance appended for full-tier models.
pub const DOCUMENT_PROMPT: &str = "\
When asked to write, create, or update a document, use the document tools: \
createDocument starts a new document, updateDocument revises an existing one, \
and requestSuggestions gathers improvement suggestions. Prefer a document for \
long-form content and keep the chat reply short.";

/// The exact call shape sent to a provider.
#[derive(Debug, Clone)]
pub struct ProviderCall {
    /// Messages in provider order (system prompt first, when present).
    pub messages: Vec<Message>,
    /// Call configuration (model name, tools).
    pub config: General,
}

/// Select the system prompt for a structured model.
pub fn system_prompt(model: &ChatModelConfig) -> String {
    match model.tier {
        ModelTier::Full => format!("{REGULAR_PROMPT}\n\n{DOCUMENT_PROMPT}"),
        ModelTier::Fast => REGULAR_PROMPT.to_owned(),
    }
}

/// Assemble a provider call from a transcript.
///
/// Rejects with [`RelayError::NoUserMessage`] when the transcript is
/// empty or its last entry is not user-authored — before any provider
/// call is attempted.
pub fn assemble(
    transcript: &[Message],
    model: &ChatModelConfig,
    tools: &[Tool],
) -> Result<ProviderCall, RelayError> {
    if transcript.last().map(|m| m.role) != Some(Role::User) {
        return Err(RelayError::NoUserMessage);
    }

    match model.kind {
        CallKind::Flattened => {
            let mut prompt = String::new();
            for message in transcript {
                let label = match message.role {
                    Role::User => "User:",
                    Role::Assistant => "Assistant:",
                    // Flattened transcripts carry only the dialogue.
                    Role::System | Role::Tool => continue,
                };
                if !prompt.is_empty() {
                    prompt.push('\n');
                }
                prompt.push_str(label);
                prompt.push(' ');
                prompt.push_str(&message.content);
            }

            Ok(ProviderCall {
                messages: vec![Message::user(prompt)],
                config: General::new(model.model.clone()),
            })
        }
        CallKind::Structured => {
            let mut messages = Vec::with_capacity(transcript.len() + 1);
            messages.push(Message::system(system_prompt(model)));
            messages.extend(transcript.iter().cloned());

            let enabled = model.tier == ModelTier::Full && !tools.is_empty();
            let config = General {
                tools: enabled.then(|| tools.to_vec()),
                ..General::new(model.model.clone())
            };

            Ok(ProviderCall { messages, config })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{ModelRegistry, ProviderKind};

    fn tools() -> Vec<Tool> {
        ["getWeather", "createDocument", "updateDocument", "requestSuggestions"]
            .into_iter()
            .map(|name| Tool {
                name: name.into(),
                description: String::new(),
                parameters: schemars::schema_for!(String),
                strict: false,
            })
            .collect()
    }

    fn registry() -> ModelRegistry {
        ModelRegistry::standard()
    }

    #[test]
    fn empty_transcript_is_rejected() {
        let registry = registry();
        let model = registry.resolve("chat-model-small").unwrap();
        let err = assemble(&[], model, &tools()).unwrap_err();
        assert!(matches!(err, RelayError::NoUserMessage));
    }

    #[test]
    fn trailing_assistant_message_is_rejected() {
        let registry = registry();
        let model = registry.resolve("chat-model-small").unwrap();
        let transcript = [Message::user("hi"), Message::assistant("hello")];
        let err = assemble(&transcript, model, &tools()).unwrap_err();
        assert!(matches!(err, RelayError::NoUserMessage));
    }

    #[test]
    fn structured_call_prepends_system_prompt() {
        let registry = registry();
        let model = registry.resolve("chat-model-small").unwrap();
        let transcript = [Message::user("hi")];
        let call = assemble(&transcript, model, &tools()).unwrap();

        assert_eq!(call.messages.len(), 2);
        assert_eq!(call.messages[0].role, Role::System);
        assert!(call.messages[0].content.starts_with(REGULAR_PROMPT));
        assert_eq!(call.messages[1].content, "hi");
        assert_eq!(call.config.model, "gpt-4o-mini");
    }

    #[test]
    fn full_tier_enables_all_tools() {
        let registry = registry();
        let model = registry.resolve("chat-model-large").unwrap();
        let call = assemble(&[Message::user("hi")], model, &tools()).unwrap();

        let enabled = call.config.tools.expect("tools enabled");
        assert_eq!(enabled.len(), 4);
        assert!(call.messages[0].content.contains("createDocument"));
    }

    #[test]
    fn fast_tier_disables_all_tools() {
        let registry = registry();
        let model = registry.resolve("chat-model-small").unwrap();
        let call = assemble(&[Message::user("hi")], model, &tools()).unwrap();
        assert!(call.config.tools.is_none());
    }

    #[test]
    fn flattened_call_is_one_labelled_prompt() {
        let registry = registry();
        let model = registry.resolve("chat-model-reasoning").unwrap();
        let transcript = [
            Message::user("first question"),
            Message::assistant("first answer"),
            Message::user("second question"),
        ];
        let call = assemble(&transcript, model, &tools()).unwrap();

        assert_eq!(call.messages.len(), 1);
        assert_eq!(call.messages[0].role, Role::User);
        assert_eq!(
            call.messages[0].content,
            "User: first question\nAssistant: first answer\nUser: second question"
        );
        assert_eq!(call.config.model, "accounts/fireworks/models/deepseek-r1");
    }

    #[test]
    fn flattened_call_never_enables_tools() {
        let registry = registry();
        for id in ["chat-model-reasoning", "chat-model-reasoning-2"] {
            let model = registry.resolve(id).unwrap();
            let call = assemble(&[Message::user("hi")], model, &tools()).unwrap();
            assert!(call.config.tools.is_none(), "{id} must not get tools");
        }
    }

    #[test]
    fn flattened_call_has_no_system_prompt() {
        let registry = registry();
        let model = registry.resolve("chat-model-reasoning").unwrap();
        let call = assemble(&[Message::user("hi")], model, &tools()).unwrap();
        assert!(call.messages.iter().all(|m| m.role != Role::System));
    }

    #[test]
    fn custom_flattened_model_follows_its_kind_not_its_id() {
        // The call shape is the config's tagged variant; an id with no
        // "reasoning" marker still flattens when built that way.
        let registry = ModelRegistry::new(vec![
            model::ChatModelConfig::new("plain-id", ProviderKind::OpenAI, "o1-mini").flattened(),
        ])
        .unwrap();
        let model = registry.resolve("plain-id").unwrap();
        let call = assemble(&[Message::user("hi")], model, &tools()).unwrap();
        assert_eq!(call.messages.len(), 1);
        assert!(call.messages[0].content.starts_with("User: hi"));
    }
}

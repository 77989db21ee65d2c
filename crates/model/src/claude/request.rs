//! Request body for the Anthropic Messages API.

use llm::{Config, General, Message, Role, Tool, ToolChoice};
use serde::Serialize;
use serde_json::{Value, json};

/// Default generation ceiling when the caller does not set one.
const MAX_TOKENS: usize = 4096;

/// The request body for the Anthropic Messages API.
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    /// The model identifier.
    pub model: String,
    /// Maximum tokens to generate.
    pub max_tokens: usize,
    /// System prompt (top-level, not in the messages array).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// The messages array (Anthropic content block format).
    pub messages: Vec<Value>,
    /// Whether to stream the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    /// Tools the model may call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Value>>,
    /// Tool choice control.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<Value>,
}

impl Request {
    /// Build the request with the given messages, converting from the
    /// unified `Message` format to Anthropic content blocks.
    pub fn messages(&self, messages: &[Message]) -> Self {
        let mut system = self.system.clone();
        let mut blocks = Vec::new();

        for msg in messages {
            match msg.role {
                Role::System => {
                    system = Some(msg.content.clone());
                }
                Role::User => {
                    blocks.push(json!({
                        "role": "user",
                        "content": msg.content,
                    }));
                }
                Role::Assistant => {
                    let mut content = Vec::new();
                    if !msg.content.is_empty() {
                        content.push(json!({
                            "type": "text",
                            "text": msg.content,
                        }));
                    }
                    for tc in &msg.tool_calls {
                        let input: Value =
                            serde_json::from_str(&tc.function.arguments).unwrap_or(json!({}));
                        content.push(json!({
                            "type": "tool_use",
                            "id": tc.id,
                            "name": tc.function.name,
                            "input": input,
                        }));
                    }
                    if content.is_empty() {
                        content.push(json!({
                            "type": "text",
                            "text": "",
                        }));
                    }
                    blocks.push(json!({
                        "role": "assistant",
                        "content": content,
                    }));
                }
                Role::Tool => {
                    blocks.push(json!({
                        "role": "user",
                        "content": [{
                            "type": "tool_result",
                            "tool_use_id": msg.tool_call_id,
                            "content": msg.content,
                        }],
                    }));
                }
            }
        }

        Self {
            system,
            messages: blocks,
            ..self.clone()
        }
    }

    /// Enable streaming for the request.
    pub fn stream(mut self) -> Self {
        self.stream = Some(true);
        self
    }
}

impl From<General> for Request {
    fn from(config: General) -> Self {
        let mut request = Self {
            model: config.model.to_string(),
            max_tokens: MAX_TOKENS,
            system: None,
            messages: Vec::new(),
            stream: None,
            tools: None,
            tool_choice: None,
        };

        if let Some(tools) = config.tools {
            request = request.with_tools(tools);
        }
        if let Some(tool_choice) = config.tool_choice {
            request = request.with_tool_choice(tool_choice);
        }

        request
    }
}

impl Config for Request {
    fn with_tools(self, tools: Vec<Tool>) -> Self {
        let tools = tools
            .into_iter()
            .map(|tool| {
                json!({
                    "name": tool.name,
                    "description": tool.description,
                    "input_schema": tool.parameters,
                })
            })
            .collect::<Vec<_>>();
        Self {
            tools: Some(tools),
            ..self
        }
    }

    fn with_tool_choice(self, tool_choice: ToolChoice) -> Self {
        Self {
            tool_choice: match tool_choice {
                ToolChoice::None => Some(json!({"type": "none"})),
                ToolChoice::Auto => Some(json!({"type": "auto"})),
                ToolChoice::Required => Some(json!({"type": "any"})),
                ToolChoice::Function(name) => Some(json!({
                    "type": "tool",
                    "name": name,
                })),
            },
            ..self
        }
    }
}

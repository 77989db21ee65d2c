//! Shared OpenAI-compatible request body.
//!
//! Superset of the fields used by the OpenAI, Fireworks, and Google
//! compatibility endpoints. Fields use `Option` + `skip_serializing_if`
//! so provider-specific extras are simply absent when unused.

use llm::{Config, General, Message, Tool, ToolChoice};
use serde::Serialize;
use serde_json::{Value, json};

/// OpenAI-compatible chat completions request body.
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    /// The messages to send.
    pub messages: Vec<Message>,
    /// The model identifier.
    pub model: String,
    /// Maximum tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,
    /// Whether to stream the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    /// Whether to enable the reasoning trace (DeepSeek-style models).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking: Option<Value>,
    /// Tool choice control.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<Value>,
    /// Tools the model may call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Value>,
}

impl Request {
    /// Build the request with the given messages.
    pub fn messages(&self, messages: &[Message]) -> Self {
        Self {
            messages: messages.to_vec(),
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
            messages: Vec::new(),
            model: config.model.to_string(),
            max_tokens: None,
            stream: None,
            thinking: if config.think {
                Some(json!({ "type": "enabled" }))
            } else {
                None
            },
            tool_choice: None,
            tools: None,
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
                    "type": "function",
                    "function": json!(tool),
                })
            })
            .collect::<Vec<_>>();
        Self {
            tools: Some(json!(tools)),
            ..self
        }
    }

    fn with_tool_choice(self, tool_choice: ToolChoice) -> Self {
        Self {
            tool_choice: match tool_choice {
                ToolChoice::None => Some(json!("none")),
                ToolChoice::Auto => Some(json!("auto")),
                ToolChoice::Required => Some(json!("required")),
                ToolChoice::Function(name) => Some(json!({
                    "type": "function",
                    "function": { "name": name }
                })),
            },
            ..self
        }
    }
}

//! The tool registry.
//!
//! Four named capabilities the model may invoke mid-stream. Each tool
//! receives the current session and the shared output stream, so
//! long-running tools can emit progress while they work. Side effects
//! are scoped to resources owned by the session's user.

use crate::{Session, StreamEvent};
use compact_str::CompactString;
use llm::{Message, Tool, ToolCall};
use model::{Backends, ModelRegistry};
use store::ChatStore;
use tokio::sync::mpsc::UnboundedSender;

pub mod document;
pub mod suggestions;
pub mod weather;

/// Context handed to every tool invocation.
pub struct ToolContext<'a, B: Backends, S: ChatStore> {
    /// The authenticated caller.
    pub session: &'a Session,
    /// Durable store for tool side effects.
    pub store: &'a S,
    /// Provider routing, for tools that generate content.
    pub backends: &'a B,
    /// Model registry, for resolving internal generation models.
    pub registry: &'a ModelRegistry,
    /// The request's outbound stream, for progress events.
    pub events: &'a UnboundedSender<StreamEvent>,
}

/// The registered tools.
#[derive(Clone)]
pub struct Toolbox {
    client: reqwest::Client,
}

impl Toolbox {
    /// Create a toolbox sharing the given HTTP client.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Declarations for every registered tool, in registration order.
    pub fn specs(&self) -> Vec<Tool> {
        vec![
            weather::spec(),
            document::create_spec(),
            document::update_spec(),
            suggestions::spec(),
        ]
    }

    /// Dispatch a tool call and build its tool-result message.
    ///
    /// Tool failures never abort the stream: they come back as an error
    /// string in the result message, and the model decides what to do
    /// with it.
    pub async fn dispatch<B: Backends, S: ChatStore>(
        &self,
        call: &ToolCall,
        ctx: &ToolContext<'_, B, S>,
    ) -> Message {
        let name = call.function.name.as_str();
        let arguments = call.function.arguments.as_str();
        let output = match name {
            weather::NAME => weather::run(&self.client, arguments).await,
            document::CREATE_NAME => document::create(arguments, ctx).await,
            document::UPDATE_NAME => document::update(arguments, ctx).await,
            suggestions::NAME => suggestions::run(arguments, ctx).await,
            other => Ok(format!("function {other} not available")),
        };

        let output = output.unwrap_or_else(|e| {
            tracing::warn!("tool {name} failed: {e:#}");
            format!("error: {e:#}")
        });
        Message::tool(output, CompactString::from(call.id.as_str()))
    }
}

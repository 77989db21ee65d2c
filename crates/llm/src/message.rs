//! Chat messages and stream accumulation.

use crate::{StreamChunk, ToolCall};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;

/// A message in a conversation transcript.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct Message {
    /// The role of the message author.
    pub role: Role,

    /// The content of the message.
    #[serde(default)]
    pub content: String,

    /// The reasoning trace, when the model produced one.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reasoning_content: String,

    /// The tool call this message answers (tool role only).
    #[serde(default, skip_serializing_if = "CompactString::is_empty")]
    pub tool_call_id: CompactString,

    /// Tool calls made by the model (assistant role only).
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub tool_calls: SmallVec<[ToolCall; 4]>,
}

impl Message {
    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            ..Default::default()
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            ..Default::default()
        }
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            ..Default::default()
        }
    }

    /// Create a new tool result message answering `call`.
    pub fn tool(content: impl Into<String>, call: impl Into<CompactString>) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
            tool_call_id: call.into(),
            ..Default::default()
        }
    }
}

/// The role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The user role.
    #[default]
    User,
    /// The assistant role.
    Assistant,
    /// The system role.
    System,
    /// The tool role.
    Tool,
}

/// Accumulates stream chunks into a complete message.
///
/// Tool call fragments arrive keyed by index and are merged as they
/// stream in; content and reasoning deltas are appended.
pub struct MessageBuilder {
    message: Message,
    calls: BTreeMap<u32, ToolCall>,
}

impl MessageBuilder {
    /// Create a new builder for a message with the given role.
    pub fn new(role: Role) -> Self {
        Self {
            message: Message {
                role,
                ..Default::default()
            },
            calls: BTreeMap::new(),
        }
    }

    /// Fold a stream chunk into the message under construction.
    pub fn accept(&mut self, chunk: &StreamChunk) {
        if let Some(calls) = chunk.tool_calls() {
            for call in calls {
                let entry = self.calls.entry(call.index).or_default();
                entry.merge(call);
            }
        }

        if let Some(content) = chunk.content() {
            self.message.content.push_str(content);
        }

        if let Some(reason) = chunk.reasoning_content() {
            self.message.reasoning_content.push_str(reason);
        }
    }

    /// Build the accumulated message.
    pub fn build(mut self) -> Message {
        if !self.calls.is_empty() {
            self.message.tool_calls = self.calls.into_values().collect();
        }
        self.message
    }
}

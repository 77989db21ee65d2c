//! Outbound stream events.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An incremental unit of output flowing to the caller.
///
/// Events are transient and never persisted. They are emitted on a
/// single ordered channel per request, interleaved in the order
/// produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum StreamEvent {
    /// A visible text delta.
    TextDelta {
        /// The text fragment.
        delta: String,
    },

    /// A reasoning-trace delta.
    ReasoningDelta {
        /// The reasoning fragment.
        delta: String,
    },

    /// The model invoked a tool.
    ToolCall {
        /// Provider-assigned call id.
        id: String,
        /// Tool name.
        name: CompactString,
        /// JSON-encoded arguments.
        arguments: String,
    },

    /// A tool finished and produced output.
    ToolResult {
        /// Provider-assigned call id.
        id: String,
        /// Tool name.
        name: CompactString,
        /// Tool output.
        output: String,
    },

    /// Tool-emitted progress (e.g. incremental document content).
    Data {
        /// Payload discriminator.
        kind: CompactString,
        /// Payload.
        data: Value,
    },

    /// Terminal error. A single generic event; no internal detail.
    Error {
        /// Caller-facing message.
        message: String,
    },

    /// The stream completed normally.
    Finish,
}

//! Tool declarations and tool calls.

use compact_str::CompactString;
use schemars::Schema;
use serde::{Deserialize, Serialize};

/// A tool the model may call.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Tool {
    /// The name of the tool.
    pub name: CompactString,

    /// The description of the tool.
    pub description: String,

    /// JSON schema for the tool arguments.
    pub parameters: Schema,

    /// Whether to strictly validate the parameters.
    pub strict: bool,
}

/// A tool call made by the model.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ToolCall {
    /// The ID of the tool call.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// The index of the tool call (used in streaming).
    #[serde(default, skip_serializing)]
    pub index: u32,

    /// The type of tool (currently only "function").
    #[serde(default, rename = "type")]
    pub call_type: String,

    /// The function to call.
    pub function: FunctionCall,
}

impl ToolCall {
    /// Merge a streamed fragment into this call.
    ///
    /// Providers stream tool calls in pieces: the first fragment carries
    /// id and name, later fragments append to the arguments string.
    pub fn merge(&mut self, call: &Self) {
        if !call.id.is_empty() {
            self.id.clone_from(&call.id);
        }
        if !call.call_type.is_empty() {
            self.call_type.clone_from(&call.call_type);
        }
        if !call.function.name.is_empty() {
            self.function.name.clone_from(&call.function.name);
        }
        self.function.arguments.push_str(&call.function.arguments);
    }
}

/// A function call within a tool call.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct FunctionCall {
    /// The name of the function to call.
    #[serde(default, skip_serializing_if = "CompactString::is_empty")]
    pub name: CompactString,

    /// The arguments to pass to the function (JSON string).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub arguments: String,
}

/// Controls which tool is called by the model.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ToolChoice {
    /// Model will not call any tool.
    None,

    /// Model can pick between generating a message or calling tools.
    #[default]
    Auto,

    /// Model must call one or more tools.
    Required,

    /// Model must call the named function.
    Function(CompactString),
}

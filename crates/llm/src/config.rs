//! Configuration for a single provider call.

use crate::{Tool, ToolChoice};
use compact_str::CompactString;

/// Provider request configuration.
///
/// Each provider's wire `Request` type implements this so the relay can
/// build calls without knowing provider specifics.
pub trait Config: From<General> + Sized + Clone {
    /// Attach tool declarations to the call.
    fn with_tools(self, tools: Vec<Tool>) -> Self;

    /// Constrain which tool the model may call.
    fn with_tool_choice(self, tool_choice: ToolChoice) -> Self;
}

/// Provider-independent call configuration.
#[derive(Debug, Clone)]
pub struct General {
    /// The upstream model name to call.
    pub model: CompactString,

    /// Whether to enable the model's reasoning trace.
    pub think: bool,

    /// The tools the model may call.
    pub tools: Option<Vec<Tool>>,

    /// Constraint on which tool the model may call.
    pub tool_choice: Option<ToolChoice>,
}

impl General {
    /// Create a new configuration for the given upstream model.
    pub fn new(model: impl Into<CompactString>) -> Self {
        Self {
            model: model.into(),
            think: false,
            tools: None,
            tool_choice: None,
        }
    }
}

impl Default for General {
    fn default() -> Self {
        Self::new("gpt-4o-mini")
    }
}

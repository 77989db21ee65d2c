//! Provider kinds and credentials.

use serde::{Deserialize, Serialize};

/// Supported LLM provider kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// OpenAI chat completions API.
    OpenAI,
    /// Anthropic Messages API.
    Anthropic,
    /// Google Gemini — OpenAI-compatible endpoint.
    Google,
    /// Fireworks — OpenAI-compatible endpoint.
    Fireworks,
}

impl ProviderKind {
    /// The provider name as it appears in configuration and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::Anthropic => "anthropic",
            Self::Google => "google",
            Self::Fireworks => "fireworks",
        }
    }
}

/// API keys for each provider, typically loaded from configuration.
///
/// A provider with no key is simply not constructed; requests routed to
/// it fail with a provider error at call time.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderKeys {
    /// OpenAI API key.
    pub openai: Option<String>,
    /// Anthropic API key.
    pub anthropic: Option<String>,
    /// Google API key.
    pub google: Option<String>,
    /// Fireworks API key.
    pub fireworks: Option<String>,
}

//! The model registry.
//!
//! Maps chat model identifiers to provider configurations. The registry
//! is an explicit immutable value constructed once at process start and
//! passed by reference into the relay — there is no global state, and a
//! model's call shape is decided here, not re-derived per request.

use crate::ProviderKind;
use compact_str::CompactString;

/// The model selected when the caller does not name one.
pub const DEFAULT_CHAT_MODEL: &str = "chat-model-small";

/// Lookup failure: the requested model id is not in the registry.
#[derive(Debug, thiserror::Error)]
#[error("unknown model: {0}")]
pub struct UnknownModel(pub CompactString);

/// How a model expects its conversation delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// Structured role/content message list with a system prompt.
    Structured,
    /// Single flattened prompt string; no system prompt, no tools.
    Flattened,
}

/// Capability tier, which gates tool access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTier {
    /// Latency-optimized; tools disabled.
    Fast,
    /// Full capability; all registered tools enabled.
    Full,
}

/// A chat model's backing provider configuration.
///
/// Immutable after registry construction; looked up by id on every
/// request and bound to that request for its entire duration.
#[derive(Debug, Clone)]
pub struct ChatModelConfig {
    /// The public model identifier.
    pub id: CompactString,
    /// Human-readable name for the catalog.
    pub name: CompactString,
    /// One-line description for the catalog.
    pub description: String,
    /// The provider backing this model.
    pub provider: ProviderKind,
    /// The upstream model name sent to the provider.
    pub model: CompactString,
    /// The call shape this model expects.
    pub kind: CallKind,
    /// Capability tier.
    pub tier: ModelTier,
    /// Tag delimiting an inline reasoning trace in raw output
    /// (e.g. `think` for `<think>…</think>`), when the provider does
    /// not report reasoning separately.
    pub reasoning_tag: Option<CompactString>,
    /// Whether this model appears in the presentation catalog.
    pub listed: bool,
}

impl ChatModelConfig {
    /// Create a structured, fast-tier, listed model config.
    pub fn new(
        id: impl Into<CompactString>,
        provider: ProviderKind,
        model: impl Into<CompactString>,
    ) -> Self {
        Self {
            id: id.into(),
            name: CompactString::default(),
            description: String::new(),
            provider,
            model: model.into(),
            kind: CallKind::Structured,
            tier: ModelTier::Fast,
            reasoning_tag: None,
            listed: true,
        }
    }

    /// Set the catalog name.
    pub fn name(mut self, name: impl Into<CompactString>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the catalog description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Mark this model as flattened-prompt style.
    pub fn flattened(mut self) -> Self {
        self.kind = CallKind::Flattened;
        self
    }

    /// Set the capability tier.
    pub fn tier(mut self, tier: ModelTier) -> Self {
        self.tier = tier;
        self
    }

    /// Set the inline reasoning tag.
    pub fn reasoning_tag(mut self, tag: impl Into<CompactString>) -> Self {
        self.reasoning_tag = Some(tag.into());
        self
    }

    /// Hide this model from the presentation catalog.
    pub fn unlisted(mut self) -> Self {
        self.listed = false;
        self
    }
}

/// Immutable mapping from model id to provider configuration.
pub struct ModelRegistry {
    configs: Vec<ChatModelConfig>,
}

impl ModelRegistry {
    /// Build a registry from the given configs.
    ///
    /// Fails when two configs share an id.
    pub fn new(configs: Vec<ChatModelConfig>) -> anyhow::Result<Self> {
        for (i, config) in configs.iter().enumerate() {
            if configs[..i].iter().any(|c| c.id == config.id) {
                anyhow::bail!("duplicate model id: {}", config.id);
            }
        }
        Ok(Self { configs })
    }

    /// The standard authored catalog.
    pub fn standard() -> Self {
        let configs = vec![
            ChatModelConfig::new("chat-model-small", ProviderKind::OpenAI, "gpt-4o-mini")
                .name("GPT 4o mini")
                .description("Small model for fast, lightweight tasks"),
            ChatModelConfig::new("chat-model-large", ProviderKind::OpenAI, "gpt-4o")
                .name("GPT 4o")
                .description("Large model for complex, multi-step tasks")
                .tier(ModelTier::Full),
            ChatModelConfig::new(
                "chat-model-reasoning",
                ProviderKind::Fireworks,
                "accounts/fireworks/models/deepseek-r1",
            )
            .name("DeepSeek R1")
            .description("Uses advanced reasoning (Best DeepSeek model)")
            .flattened()
            .reasoning_tag("think"),
            ChatModelConfig::new("chat-model-reasoning-2", ProviderKind::OpenAI, "o1-mini")
                .name("o1-mini")
                .description("Uses advanced reasoning")
                .flattened(),
            ChatModelConfig::new("chat-model-reasoning-3", ProviderKind::OpenAI, "o1-preview")
                .name("o1-preview")
                .description("Uses advanced reasoning (Best OpenAI model)")
                .flattened(),
            ChatModelConfig::new(
                "chat-model-claude",
                ProviderKind::Anthropic,
                "claude-3-5-sonnet-latest",
            )
            .name("Claude 3.5 Sonnet")
            .description("Anthropic model for complex, multi-step tasks")
            .tier(ModelTier::Full),
            ChatModelConfig::new("chat-model-gemini", ProviderKind::Google, "gemini-2.0-flash")
                .name("Gemini 2.0 Flash")
                .description("Google model for fast, lightweight tasks"),
            ChatModelConfig::new("title-model", ProviderKind::OpenAI, "gpt-4-turbo").unlisted(),
            ChatModelConfig::new("document-model", ProviderKind::OpenAI, "gpt-4o-mini").unlisted(),
        ];
        Self { configs }
    }

    /// Resolve a model id to its configuration.
    pub fn resolve(&self, id: &str) -> Result<&ChatModelConfig, UnknownModel> {
        self.configs
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| UnknownModel(id.into()))
    }

    /// The authored presentation catalog, in authored order.
    pub fn list_available(&self) -> impl Iterator<Item = &ChatModelConfig> {
        self.configs.iter().filter(|c| c.listed)
    }
}

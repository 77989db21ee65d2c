//! Tests for the model registry.

use otter_model::{
    CallKind, ChatModelConfig, DEFAULT_CHAT_MODEL, ModelRegistry, ModelTier, ProviderKind,
};

#[test]
fn resolve_known_model() {
    let registry = ModelRegistry::standard();
    let config = registry.resolve("chat-model-large").unwrap();
    assert_eq!(config.provider, ProviderKind::OpenAI);
    assert_eq!(config.model, "gpt-4o");
    assert_eq!(config.kind, CallKind::Structured);
    assert_eq!(config.tier, ModelTier::Full);
}

#[test]
fn resolve_unknown_model_fails() {
    let registry = ModelRegistry::standard();
    let err = registry.resolve("chat-model-nope").unwrap_err();
    assert!(err.to_string().contains("chat-model-nope"));
}

#[test]
fn default_model_is_registered_and_fast() {
    let registry = ModelRegistry::standard();
    let config = registry.resolve(DEFAULT_CHAT_MODEL).unwrap();
    assert_eq!(config.tier, ModelTier::Fast);
    assert_eq!(config.kind, CallKind::Structured);
}

#[test]
fn reasoning_model_is_flattened_with_tag() {
    let registry = ModelRegistry::standard();
    let config = registry.resolve("chat-model-reasoning").unwrap();
    assert_eq!(config.kind, CallKind::Flattened);
    assert_eq!(config.provider, ProviderKind::Fireworks);
    assert_eq!(config.reasoning_tag.as_deref(), Some("think"));
}

#[test]
fn openai_reasoning_models_have_no_tag() {
    let registry = ModelRegistry::standard();
    for id in ["chat-model-reasoning-2", "chat-model-reasoning-3"] {
        let config = registry.resolve(id).unwrap();
        assert_eq!(config.kind, CallKind::Flattened);
        assert!(config.reasoning_tag.is_none());
    }
}

#[test]
fn catalog_excludes_internal_models() {
    let registry = ModelRegistry::standard();
    let listed: Vec<&str> = registry.list_available().map(|c| c.id.as_str()).collect();
    assert!(listed.contains(&"chat-model-small"));
    assert!(listed.contains(&"chat-model-reasoning"));
    assert!(!listed.contains(&"title-model"));
    assert!(!listed.contains(&"document-model"));

    // Authored order is preserved.
    assert_eq!(listed[0], "chat-model-small");
    assert_eq!(listed[1], "chat-model-large");
}

#[test]
fn internal_models_still_resolve() {
    let registry = ModelRegistry::standard();
    assert!(registry.resolve("title-model").is_ok());
    assert!(registry.resolve("document-model").is_ok());
}

#[test]
fn duplicate_ids_rejected() {
    let configs = vec![
        ChatModelConfig::new("m", ProviderKind::OpenAI, "gpt-4o"),
        ChatModelConfig::new("m", ProviderKind::Google, "gemini-2.0-flash"),
    ];
    assert!(ModelRegistry::new(configs).is_err());
}

#[test]
fn call_kind_is_fixed_at_construction() {
    // A model whose id mentions "reasoning" but is built structured
    // stays structured: the kind is a tagged variant, not a string probe.
    let configs = vec![
        ChatModelConfig::new("my-reasoning-model", ProviderKind::OpenAI, "gpt-4o"),
    ];
    let registry = ModelRegistry::new(configs).unwrap();
    let config = registry.resolve("my-reasoning-model").unwrap();
    assert_eq!(config.kind, CallKind::Structured);
}

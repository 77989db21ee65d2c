//! Gateway configuration tests.

use otter_gateway::{GatewayConfig, StoreBackend};

#[test]
fn parse_minimal_config() {
    let config = GatewayConfig::from_toml("").unwrap();
    assert_eq!(config.server.bind, "127.0.0.1:8080");
    assert_eq!(config.store.backend, StoreBackend::Sqlite);
    assert_eq!(config.store.path, "otter.db");
    assert!(config.auth.api_keys.is_empty());
    assert!(config.providers.openai.is_none());
}

#[test]
fn parse_full_config() {
    let toml = r#"
[server]
bind = "0.0.0.0:3000"

[store]
backend = "in_memory"

[auth]
api_keys = [
    { key = "key-1", user = "alice" },
    { key = "key-2", user = "bob" },
]

[providers]
openai = "sk-test"
fireworks = "fw-test"
"#;
    let config = GatewayConfig::from_toml(toml).unwrap();
    assert_eq!(config.server.bind, "0.0.0.0:3000");
    assert_eq!(config.store.backend, StoreBackend::InMemory);
    assert_eq!(config.auth.api_keys.len(), 2);
    assert_eq!(config.auth.api_keys[0].user, "alice");
    assert_eq!(config.providers.openai.as_deref(), Some("sk-test"));
    assert_eq!(config.providers.fireworks.as_deref(), Some("fw-test"));
    assert!(config.providers.anthropic.is_none());
}

#[test]
fn env_vars_expand_in_provider_keys() {
    unsafe { std::env::set_var("OTTER_TEST_OPENAI_KEY", "sk-from-env") };
    let toml = r#"
[providers]
openai = "${OTTER_TEST_OPENAI_KEY}"
"#;
    let config = GatewayConfig::from_toml(toml).unwrap();
    assert_eq!(config.providers.openai.as_deref(), Some("sk-from-env"));
}

#[test]
fn unset_env_var_means_unconfigured() {
    let toml = r#"
[auth]
api_keys = [{ key = "${OTTER_TEST_MISSING_KEY_XYZ}", user = "ghost" }]

[providers]
openai = "${OTTER_TEST_MISSING_KEY_XYZ}"
"#;
    let config = GatewayConfig::from_toml(toml).unwrap();
    assert!(config.providers.openai.is_none());
    assert!(config.auth.api_keys.is_empty());
}

#[test]
fn load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gateway.toml");
    std::fs::write(&path, "[server]\nbind = \"127.0.0.1:9999\"\n").unwrap();

    let config = GatewayConfig::load(&path).unwrap();
    assert_eq!(config.server.bind, "127.0.0.1:9999");
}

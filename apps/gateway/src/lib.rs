//! Otter gateway — HTTP application shell composing the relay,
//! provider pool, model registry, durable store, and session
//! resolution.

pub use auth::ApiKeySessions;
pub use config::{ApiKeyEntry, AuthConfig, GatewayConfig, ServerConfig, StoreBackend, StoreConfig};
pub use router::router;
pub use serve::{ServeHandle, serve};
pub use state::AppState;

pub mod auth;
pub mod config;
pub mod router;
pub mod serve;
pub mod state;
mod utils;

//! Provider backends and the model registry.
//!
//! This crate owns everything between a chat model identifier and the
//! provider wire: the registry mapping ids to [`ChatModelConfig`], the
//! OpenAI-compatible and Anthropic HTTP clients, and the
//! [`ProviderPool`] that routes a resolved model to its backend behind
//! the [`Backends`] trait.

pub use claude::Claude;
pub use config::{ProviderKeys, ProviderKind};
pub use openai::OpenAI;
pub use provider::{Backends, Provider, ProviderPool};
pub use registry::{
    CallKind, ChatModelConfig, DEFAULT_CHAT_MODEL, ModelRegistry, ModelTier, UnknownModel,
};
pub use request::Request;
#[cfg(feature = "testing")]
pub use scripted::{RecordedCall, ScriptedPool};

pub mod claude;
mod config;
pub mod openai;
mod provider;
mod registry;
mod request;
#[cfg(feature = "testing")]
pub mod scripted;

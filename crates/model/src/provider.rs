//! Provider routing.
//!
//! A unified [`Provider`] enum with enum dispatch over concrete wire
//! clients, and the [`ProviderPool`] that holds one constructed client
//! per configured [`ProviderKind`]. The relay talks to the pool through
//! the [`Backends`] trait so tests can substitute scripted providers.

use crate::{Claude, OpenAI, ProviderKeys, ProviderKind, registry::ChatModelConfig};
use anyhow::Result;
use async_stream::try_stream;
use futures_core::Stream;
use futures_util::StreamExt;
use llm::{General, LLM, Message, Response, StreamChunk};
use reqwest::Client;
use std::collections::BTreeMap;

/// A unified LLM provider.
///
/// Fireworks and Google ride the OpenAI-compatible client with their
/// own endpoints; Anthropic has its own wire format.
#[derive(Clone)]
pub enum Provider {
    /// OpenAI-compatible API (covers OpenAI, Fireworks, Google).
    OpenAI(OpenAI),
    /// Anthropic Messages API.
    Claude(Claude),
}

impl Provider {
    /// Send a non-streaming chat completion.
    pub async fn send(&self, config: &General, messages: &[Message]) -> Result<Response> {
        match self {
            Self::OpenAI(p) => {
                let req = crate::Request::from(config.clone());
                p.send(&req, messages).await
            }
            Self::Claude(p) => {
                let req = crate::claude::Request::from(config.clone());
                p.send(&req, messages).await
            }
        }
    }

    /// Send a streaming chat completion.
    pub fn stream(
        &self,
        config: General,
        messages: &[Message],
    ) -> impl Stream<Item = Result<StreamChunk>> + Send + use<> {
        let messages = messages.to_vec();
        let this = self.clone();
        try_stream! {
            match this {
                Provider::OpenAI(p) => {
                    let req = crate::Request::from(config);
                    let mut stream = std::pin::pin!(p.stream(req, &messages));
                    while let Some(chunk) = stream.next().await {
                        yield chunk?;
                    }
                }
                Provider::Claude(p) => {
                    let req = crate::claude::Request::from(config);
                    let mut stream = std::pin::pin!(p.stream(req, &messages));
                    while let Some(chunk) = stream.next().await {
                        yield chunk?;
                    }
                }
            }
        }
    }
}

/// Routes chat calls to the provider backing each resolved model.
///
/// Implemented by [`ProviderPool`] in production and by scripted pools
/// in tests.
pub trait Backends: Clone + Send + Sync {
    /// Send a non-streaming completion through the model's provider.
    fn send(
        &self,
        model: &ChatModelConfig,
        config: General,
        messages: &[Message],
    ) -> impl Future<Output = Result<Response>> + Send;

    /// Send a streaming completion through the model's provider.
    fn stream(
        &self,
        model: &ChatModelConfig,
        config: General,
        messages: &[Message],
    ) -> impl Stream<Item = Result<StreamChunk>> + Send;
}

/// One constructed provider client per configured kind.
#[derive(Clone, Default)]
pub struct ProviderPool {
    providers: BTreeMap<ProviderKind, Provider>,
}

impl ProviderPool {
    /// Construct providers for every kind with a configured key.
    pub fn from_keys(client: Client, keys: &ProviderKeys) -> Result<Self> {
        let mut providers = BTreeMap::new();
        if let Some(key) = keys.openai.as_deref() {
            providers.insert(
                ProviderKind::OpenAI,
                Provider::OpenAI(OpenAI::api(client.clone(), key)?),
            );
        }
        if let Some(key) = keys.anthropic.as_deref() {
            providers.insert(
                ProviderKind::Anthropic,
                Provider::Claude(Claude::anthropic(client.clone(), key)?),
            );
        }
        if let Some(key) = keys.google.as_deref() {
            providers.insert(
                ProviderKind::Google,
                Provider::OpenAI(OpenAI::google(client.clone(), key)?),
            );
        }
        if let Some(key) = keys.fireworks.as_deref() {
            providers.insert(
                ProviderKind::Fireworks,
                Provider::OpenAI(OpenAI::fireworks(client, key)?),
            );
        }
        Ok(Self { providers })
    }

    /// Register a provider for a kind (replacing any existing one).
    pub fn insert(&mut self, kind: ProviderKind, provider: Provider) {
        self.providers.insert(kind, provider);
    }

    /// Get the provider for a kind, if configured.
    pub fn get(&self, kind: ProviderKind) -> Option<&Provider> {
        self.providers.get(&kind)
    }

    /// The configured provider kinds.
    pub fn kinds(&self) -> impl Iterator<Item = ProviderKind> {
        self.providers.keys().copied()
    }
}

impl Backends for ProviderPool {
    async fn send(
        &self,
        model: &ChatModelConfig,
        config: General,
        messages: &[Message],
    ) -> Result<Response> {
        let Some(provider) = self.get(model.provider) else {
            anyhow::bail!("provider {} is not configured", model.provider.as_str());
        };
        provider.send(&config, messages).await
    }

    fn stream(
        &self,
        model: &ChatModelConfig,
        config: General,
        messages: &[Message],
    ) -> impl Stream<Item = Result<StreamChunk>> + Send {
        let provider = self.get(model.provider).cloned().ok_or_else(|| {
            anyhow::anyhow!("provider {} is not configured", model.provider.as_str())
        });
        let messages = messages.to_vec();
        try_stream! {
            let provider = provider?;
            let mut stream = std::pin::pin!(provider.stream(config, &messages));
            while let Some(chunk) = stream.next().await {
                yield chunk?;
            }
        }
    }
}

//! Provider abstraction for the unified LLM interface.

use crate::{Config, Message, Response, StreamChunk};
use anyhow::Result;
use futures_core::Stream;

/// A trait for LLM providers.
pub trait LLM: Clone {
    /// The provider's wire request configuration.
    type ChatConfig: Config + Send;

    /// Send a chat completion request.
    fn send(
        &self,
        config: &Self::ChatConfig,
        messages: &[Message],
    ) -> impl Future<Output = Result<Response>> + Send;

    /// Send a chat completion request with streaming.
    fn stream(
        &self,
        config: Self::ChatConfig,
        messages: &[Message],
    ) -> impl Stream<Item = Result<StreamChunk>> + Send;
}

//! Shared application state for the gateway server.

use model::{Backends, ModelRegistry};
use relay::{Relay, SessionGateway};
use std::sync::Arc;
use store::ChatStore;

/// Shared state available to all request handlers.
pub struct AppState<B: Backends + 'static, S: ChatStore + 'static, G: SessionGateway> {
    /// The streaming relay.
    pub relay: Relay<B, S>,
    /// The model registry (immutable after init).
    pub registry: Arc<ModelRegistry>,
    /// The durable store, for history and delete endpoints.
    pub store: S,
    /// Session gateway.
    pub sessions: Arc<G>,
}

impl<B: Backends + 'static, S: ChatStore + 'static, G: SessionGateway> Clone
    for AppState<B, S, G>
{
    fn clone(&self) -> Self {
        Self {
            relay: self.relay.clone(),
            registry: Arc::clone(&self.registry),
            store: self.store.clone(),
            sessions: Arc::clone(&self.sessions),
        }
    }
}

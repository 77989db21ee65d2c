//! Provider-routing and response-streaming relay.
//!
//! The relay is the path between an inbound chat request and the
//! provider wire: it resolves the selected model, validates the
//! transcript, ensures the chat record exists, persists the user
//! message, then merges the provider's output (text, reasoning trace,
//! tool invocations) into a single ordered outbound event stream,
//! persisting the assistant's sanitized response on completion.

pub use error::RelayError;
pub use event::StreamEvent;
pub use extract::{Extracted, ReasoningExtractor};
pub use prompt::{ProviderCall, assemble, system_prompt};
pub use relay::{ChatRequest, MAX_STEPS, Relay};
pub use sanitize::sanitize_response_messages;
pub use session::{Session, SessionGateway};
pub use smooth::WordSmoother;
pub use title::derive_title;
pub use tools::{ToolContext, Toolbox};

mod error;
mod event;
mod extract;
mod prompt;
mod relay;
mod sanitize;
mod session;
mod smooth;
mod title;
pub mod tools;

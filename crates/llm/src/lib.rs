//! Unified LLM interface types and traits.
//!
//! This crate provides the shared types used across all LLM providers:
//! `Message`, `Response`, `StreamChunk`, `Tool`, `General`, and the
//! [`LLM`] trait. Providers translate these into their own wire formats;
//! everything above the provider layer speaks only these types.

pub use config::{Config, General};
pub use message::{Message, MessageBuilder, Role};
pub use provider::LLM;
pub use response::{Choice, CompletionMeta, Delta, FinishReason, Response, Usage};
pub use stream::{StreamChoice, StreamChunk};
pub use tool::{FunctionCall, Tool, ToolCall, ToolChoice};

mod config;
mod message;
mod provider;
mod response;
mod stream;
mod tool;

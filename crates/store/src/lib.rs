//! Durable chat and document storage.
//!
//! The relay consumes storage through the [`ChatStore`] trait: every
//! call is atomic on its own, and no transactional guarantee spans
//! calls. [`SqliteStore`] is the persistent backend; [`MemStore`]
//! mirrors its semantics for tests and no-persistence deployments.

pub use mem::MemStore;
pub use sqlite::SqliteStore;

use anyhow::Result;
use chrono::{DateTime, Utc};
use compact_str::CompactString;
use llm::Role;
use serde::Serialize;

mod mem;
mod sqlite;

/// A conversation record.
///
/// Created lazily on the first message of a conversation; the title is
/// derived once from that message and never recomputed.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Chat {
    /// Caller-supplied conversation id.
    pub id: CompactString,
    /// The owning user.
    pub user_id: CompactString,
    /// Title derived from the first user message.
    pub title: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// A persisted message within a chat. Append-only; never mutated.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatMessage {
    /// Message id (UUID).
    pub id: CompactString,
    /// The chat this message belongs to.
    pub chat_id: CompactString,
    /// Author role.
    pub role: Role,
    /// Message content.
    pub content: String,
    /// Reasoning trace, for assistant messages that carried one.
    pub reasoning: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// A document created by the model through the document tools.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Document {
    /// Document id (UUID).
    pub id: CompactString,
    /// The owning user.
    pub user_id: CompactString,
    /// Document title.
    pub title: String,
    /// Document kind (e.g. "text").
    pub kind: CompactString,
    /// Document content.
    pub content: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// A stored improvement suggestion for a document.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Suggestion {
    /// Suggestion id (UUID).
    pub id: CompactString,
    /// The document this suggestion applies to.
    pub document_id: CompactString,
    /// The suggested improvement.
    pub description: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Durable store for chats, messages, and documents.
///
/// Message ordering within a chat is insertion order — the order the
/// relay appended them, never a client-supplied index. Chat creation is
/// idempotent on the chat id: a lost race between two first messages
/// leaves exactly one row.
pub trait ChatStore: Clone + Send + Sync {
    /// Look up a chat by id.
    fn chat_by_id(&self, id: &str) -> impl Future<Output = Result<Option<Chat>>> + Send;

    /// Persist a chat record. A chat with the same id already present
    /// is left untouched.
    fn save_chat(&self, chat: &Chat) -> impl Future<Output = Result<()>> + Send;

    /// Append messages in order.
    fn save_messages(&self, messages: &[ChatMessage]) -> impl Future<Output = Result<()>> + Send;

    /// All messages of a chat, in append order.
    fn messages_by_chat(
        &self,
        chat_id: &str,
    ) -> impl Future<Output = Result<Vec<ChatMessage>>> + Send;

    /// All chats owned by a user, newest first.
    fn chats_by_user(&self, user_id: &str) -> impl Future<Output = Result<Vec<Chat>>> + Send;

    /// Delete a chat and its messages.
    fn delete_chat(&self, id: &str) -> impl Future<Output = Result<()>> + Send;

    /// Look up a document by id.
    fn document_by_id(&self, id: &str) -> impl Future<Output = Result<Option<Document>>> + Send;

    /// Persist a document, replacing the content of an existing one
    /// with the same id.
    fn save_document(&self, document: &Document) -> impl Future<Output = Result<()>> + Send;

    /// Append suggestions for a document.
    fn save_suggestions(
        &self,
        suggestions: &[Suggestion],
    ) -> impl Future<Output = Result<()>> + Send;
}

//! SQLite-backed chat store.
//!
//! Wraps a `rusqlite::Connection` in a `Mutex` for thread safety. All
//! SQL lives in `sql/*.sql` files, loaded via `include_str!`. Writes
//! within one call run inside a transaction; nothing spans calls.

use crate::{Chat, ChatMessage, ChatStore, Document, Suggestion};
use anyhow::Result;
use chrono::{DateTime, Utc};
use llm::Role;
use rusqlite::Connection;
use std::{
    path::Path,
    sync::{Arc, Mutex},
};

const SQL_SCHEMA: &str = include_str!("../sql/schema.sql");
const SQL_INSERT_CHAT: &str = include_str!("../sql/insert_chat.sql");
const SQL_SELECT_CHAT: &str = include_str!("../sql/select_chat.sql");
const SQL_SELECT_CHATS_BY_USER: &str = include_str!("../sql/select_chats_by_user.sql");
const SQL_INSERT_MESSAGE: &str = include_str!("../sql/insert_message.sql");
const SQL_SELECT_MESSAGES: &str = include_str!("../sql/select_messages.sql");
const SQL_DELETE_CHAT: &str = include_str!("../sql/delete_chat.sql");
const SQL_UPSERT_DOCUMENT: &str = include_str!("../sql/upsert_document.sql");
const SQL_SELECT_DOCUMENT: &str = include_str!("../sql/select_document.sql");
const SQL_INSERT_SUGGESTION: &str = include_str!("../sql/insert_suggestion.sql");

/// SQLite-backed [`ChatStore`].
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open or create a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Create an in-memory database (useful for testing).
    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.execute_batch(SQL_SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn chat_by_id_sync(&self, id: &str) -> Result<Option<Chat>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(SQL_SELECT_CHAT)?;
        let mut rows = stmt.query_map([id], row_to_chat)?;
        rows.next().transpose().map_err(Into::into)
    }

    fn save_chat_sync(&self, chat: &Chat) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            SQL_INSERT_CHAT,
            rusqlite::params![
                chat.id.as_str(),
                chat.user_id.as_str(),
                chat.title,
                chat.created_at.timestamp_millis(),
            ],
        )?;
        Ok(())
    }

    fn save_messages_sync(&self, messages: &[ChatMessage]) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        for message in messages {
            tx.execute(
                SQL_INSERT_MESSAGE,
                rusqlite::params![
                    message.id.as_str(),
                    message.chat_id.as_str(),
                    role_to_str(message.role),
                    message.content,
                    message.reasoning,
                    message.created_at.timestamp_millis(),
                ],
            )?;
        }
        tx.commit().map_err(Into::into)
    }

    fn messages_by_chat_sync(&self, chat_id: &str) -> Result<Vec<ChatMessage>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(SQL_SELECT_MESSAGES)?;
        let rows = stmt.query_map([chat_id], row_to_message)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    fn chats_by_user_sync(&self, user_id: &str) -> Result<Vec<Chat>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(SQL_SELECT_CHATS_BY_USER)?;
        let rows = stmt.query_map([user_id], row_to_chat)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    fn delete_chat_sync(&self, id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(SQL_DELETE_CHAT, [id])?;
        Ok(())
    }

    fn document_by_id_sync(&self, id: &str) -> Result<Option<Document>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(SQL_SELECT_DOCUMENT)?;
        let mut rows = stmt.query_map([id], row_to_document)?;
        rows.next().transpose().map_err(Into::into)
    }

    fn save_document_sync(&self, document: &Document) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            SQL_UPSERT_DOCUMENT,
            rusqlite::params![
                document.id.as_str(),
                document.user_id.as_str(),
                document.title,
                document.kind.as_str(),
                document.content,
                document.created_at.timestamp_millis(),
            ],
        )?;
        Ok(())
    }

    fn save_suggestions_sync(&self, suggestions: &[Suggestion]) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        for suggestion in suggestions {
            tx.execute(
                SQL_INSERT_SUGGESTION,
                rusqlite::params![
                    suggestion.id.as_str(),
                    suggestion.document_id.as_str(),
                    suggestion.description,
                    suggestion.created_at.timestamp_millis(),
                ],
            )?;
        }
        tx.commit().map_err(Into::into)
    }
}

impl ChatStore for SqliteStore {
    fn chat_by_id(&self, id: &str) -> impl Future<Output = Result<Option<Chat>>> + Send {
        let result = self.chat_by_id_sync(id);
        async move { result }
    }

    fn save_chat(&self, chat: &Chat) -> impl Future<Output = Result<()>> + Send {
        let result = self.save_chat_sync(chat);
        async move { result }
    }

    fn save_messages(&self, messages: &[ChatMessage]) -> impl Future<Output = Result<()>> + Send {
        let result = self.save_messages_sync(messages);
        async move { result }
    }

    fn messages_by_chat(
        &self,
        chat_id: &str,
    ) -> impl Future<Output = Result<Vec<ChatMessage>>> + Send {
        let result = self.messages_by_chat_sync(chat_id);
        async move { result }
    }

    fn chats_by_user(&self, user_id: &str) -> impl Future<Output = Result<Vec<Chat>>> + Send {
        let result = self.chats_by_user_sync(user_id);
        async move { result }
    }

    fn delete_chat(&self, id: &str) -> impl Future<Output = Result<()>> + Send {
        let result = self.delete_chat_sync(id);
        async move { result }
    }

    fn document_by_id(&self, id: &str) -> impl Future<Output = Result<Option<Document>>> + Send {
        let result = self.document_by_id_sync(id);
        async move { result }
    }

    fn save_document(&self, document: &Document) -> impl Future<Output = Result<()>> + Send {
        let result = self.save_document_sync(document);
        async move { result }
    }

    fn save_suggestions(
        &self,
        suggestions: &[Suggestion],
    ) -> impl Future<Output = Result<()>> + Send {
        let result = self.save_suggestions_sync(suggestions);
        async move { result }
    }
}

fn row_to_chat(row: &rusqlite::Row<'_>) -> rusqlite::Result<Chat> {
    let id: String = row.get(0)?;
    let user_id: String = row.get(1)?;
    let created_at: i64 = row.get(3)?;
    Ok(Chat {
        id: id.into(),
        user_id: user_id.into(),
        title: row.get(2)?,
        created_at: from_millis(created_at),
    })
}

fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<ChatMessage> {
    let id: String = row.get(0)?;
    let chat_id: String = row.get(1)?;
    let role: String = row.get(2)?;
    let created_at: i64 = row.get(5)?;
    Ok(ChatMessage {
        id: id.into(),
        chat_id: chat_id.into(),
        role: role_from_str(&role),
        content: row.get(3)?,
        reasoning: row.get(4)?,
        created_at: from_millis(created_at),
    })
}

fn row_to_document(row: &rusqlite::Row<'_>) -> rusqlite::Result<Document> {
    let id: String = row.get(0)?;
    let user_id: String = row.get(1)?;
    let kind: String = row.get(3)?;
    let created_at: i64 = row.get(5)?;
    Ok(Document {
        id: id.into(),
        user_id: user_id.into(),
        title: row.get(2)?,
        kind: kind.into(),
        content: row.get(4)?,
        created_at: from_millis(created_at),
    })
}

fn from_millis(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

fn role_to_str(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "assistant",
        Role::System => "system",
        Role::Tool => "tool",
    }
}

fn role_from_str(s: &str) -> Role {
    match s {
        "assistant" => Role::Assistant,
        "system" => Role::System,
        "tool" => Role::Tool,
        _ => Role::User,
    }
}

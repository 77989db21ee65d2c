//! In-memory chat store.

use crate::{Chat, ChatMessage, ChatStore, Document, Suggestion};
use anyhow::Result;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Inner {
    chats: Vec<Chat>,
    messages: Vec<ChatMessage>,
    documents: Vec<Document>,
    suggestions: Vec<Suggestion>,
}

/// In-memory [`ChatStore`] with the same semantics as the SQLite
/// backend: idempotent chat creation, append-ordered messages.
///
/// Useful for tests and deployments that do not need persistence.
#[derive(Clone, Default)]
pub struct MemStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChatStore for MemStore {
    fn chat_by_id(&self, id: &str) -> impl Future<Output = Result<Option<Chat>>> + Send {
        let inner = self.inner.lock().unwrap();
        let chat = inner.chats.iter().find(|c| c.id == id).cloned();
        async move { Ok(chat) }
    }

    fn save_chat(&self, chat: &Chat) -> impl Future<Output = Result<()>> + Send {
        let mut inner = self.inner.lock().unwrap();
        if !inner.chats.iter().any(|c| c.id == chat.id) {
            inner.chats.push(chat.clone());
        }
        async { Ok(()) }
    }

    fn save_messages(&self, messages: &[ChatMessage]) -> impl Future<Output = Result<()>> + Send {
        let mut inner = self.inner.lock().unwrap();
        inner.messages.extend_from_slice(messages);
        async { Ok(()) }
    }

    fn messages_by_chat(
        &self,
        chat_id: &str,
    ) -> impl Future<Output = Result<Vec<ChatMessage>>> + Send {
        let inner = self.inner.lock().unwrap();
        let messages: Vec<ChatMessage> = inner
            .messages
            .iter()
            .filter(|m| m.chat_id == chat_id)
            .cloned()
            .collect();
        async move { Ok(messages) }
    }

    fn chats_by_user(&self, user_id: &str) -> impl Future<Output = Result<Vec<Chat>>> + Send {
        let inner = self.inner.lock().unwrap();
        let mut chats: Vec<Chat> = inner
            .chats
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        chats.reverse();
        async move { Ok(chats) }
    }

    fn delete_chat(&self, id: &str) -> impl Future<Output = Result<()>> + Send {
        let mut inner = self.inner.lock().unwrap();
        inner.chats.retain(|c| c.id != id);
        inner.messages.retain(|m| m.chat_id != id);
        async { Ok(()) }
    }

    fn document_by_id(&self, id: &str) -> impl Future<Output = Result<Option<Document>>> + Send {
        let inner = self.inner.lock().unwrap();
        let document = inner.documents.iter().find(|d| d.id == id).cloned();
        async move { Ok(document) }
    }

    fn save_document(&self, document: &Document) -> impl Future<Output = Result<()>> + Send {
        let mut inner = self.inner.lock().unwrap();
        if let Some(existing) = inner.documents.iter_mut().find(|d| d.id == document.id) {
            existing.title = document.title.clone();
            existing.kind = document.kind.clone();
            existing.content = document.content.clone();
        } else {
            inner.documents.push(document.clone());
        }
        async { Ok(()) }
    }

    fn save_suggestions(
        &self,
        suggestions: &[Suggestion],
    ) -> impl Future<Output = Result<()>> + Send {
        let mut inner = self.inner.lock().unwrap();
        inner.suggestions.extend_from_slice(suggestions);
        async { Ok(()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use llm::Role;

    fn chat(id: &str, title: &str) -> Chat {
        Chat {
            id: id.into(),
            user_id: "user-1".into(),
            title: title.into(),
            created_at: Utc::now(),
        }
    }

    fn message(id: &str, chat_id: &str, content: &str) -> ChatMessage {
        ChatMessage {
            id: id.into(),
            chat_id: chat_id.into(),
            role: Role::User,
            content: content.into(),
            reasoning: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn save_chat_is_idempotent_on_id() {
        let store = MemStore::new();
        store.save_chat(&chat("c1", "first")).await.unwrap();
        store.save_chat(&chat("c1", "second")).await.unwrap();

        let saved = store.chat_by_id("c1").await.unwrap().unwrap();
        assert_eq!(saved.title, "first");
        assert_eq!(store.chats_by_user("user-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn messages_keep_append_order() {
        let store = MemStore::new();
        store.save_chat(&chat("c1", "t")).await.unwrap();
        store
            .save_messages(&[message("m1", "c1", "one"), message("m2", "c1", "two")])
            .await
            .unwrap();
        store
            .save_messages(&[message("m3", "c1", "three")])
            .await
            .unwrap();

        let messages = store.messages_by_chat("c1").await.unwrap();
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["one", "two", "three"]);
    }

    #[tokio::test]
    async fn delete_chat_removes_messages() {
        let store = MemStore::new();
        store.save_chat(&chat("c1", "t")).await.unwrap();
        store.save_messages(&[message("m1", "c1", "x")]).await.unwrap();

        store.delete_chat("c1").await.unwrap();
        assert!(store.chat_by_id("c1").await.unwrap().is_none());
        assert!(store.messages_by_chat("c1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_document_replaces_content() {
        let store = MemStore::new();
        let mut doc = Document {
            id: "d1".into(),
            user_id: "user-1".into(),
            title: "notes".into(),
            kind: "text".into(),
            content: "v1".into(),
            created_at: Utc::now(),
        };
        store.save_document(&doc).await.unwrap();

        doc.content = "v2".into();
        store.save_document(&doc).await.unwrap();

        let saved = store.document_by_id("d1").await.unwrap().unwrap();
        assert_eq!(saved.content, "v2");
    }
}

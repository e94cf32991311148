//! Chat session repository.
//!
//! # Invariants
//! - Messages are appended only; there is no edit or remove API.
//! - Appended timestamps never go backwards within a session.

use crate::model::chat::{ChatSession, Message, Role};
use crate::store::{DocumentStore, Saved};
use log::info;

pub struct ChatRepository<'s> {
    store: &'s DocumentStore,
}

impl<'s> ChatRepository<'s> {
    pub fn new(store: &'s DocumentStore) -> Self {
        Self { store }
    }

    pub fn list_sessions(&self) -> Vec<ChatSession> {
        self.store.read(|doc| doc.ai_chats.clone())
    }

    pub fn get_session(&self, session_id: &str) -> Option<ChatSession> {
        self.store.read(|doc| {
            doc.ai_chats
                .iter()
                .find(|session| session.id == session_id)
                .cloned()
        })
    }

    /// The most recently created session (last in stored order).
    pub fn latest_session(&self) -> Option<ChatSession> {
        self.store.read(|doc| doc.ai_chats.last().cloned())
    }

    pub fn create_session(&self) -> Saved<ChatSession> {
        let session = ChatSession::new(self.store.now());
        let saved = self.store.mutate(|doc| {
            doc.ai_chats.push(session.clone());
            session
        });
        info!(
            "event=chat_session_create module=chat status=ok session_id={} persisted={}",
            saved.value.id,
            saved.is_persisted()
        );
        saved
    }

    /// Appends one message. Returns `None` when the session is gone.
    ///
    /// Content is stored as given; callers validate user input.
    pub fn append_message(
        &self,
        session_id: &str,
        role: Role,
        content: &str,
    ) -> Saved<Option<Message>> {
        let now = self.store.now();
        self.store.mutate_found(|doc| {
            let session = doc
                .ai_chats
                .iter_mut()
                .find(|session| session.id == session_id)?;
            Some(session.push_message(role, content, now))
        })
    }

    pub fn delete_session(&self, session_id: &str) -> Saved<bool> {
        self.store
            .mutate_found(|doc| {
                let before = doc.ai_chats.len();
                doc.ai_chats.retain(|session| session.id != session_id);
                (doc.ai_chats.len() != before).then_some(())
            })
            .map(|removed| removed.is_some())
    }
}

//! Chat sessions and their append-only message logs.
//!
//! # Invariants
//! - Messages are only ever appended, never edited or removed.
//! - Message timestamps never decrease within one session.

use crate::model::id::{generate_id, EntityId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => f.write_str("user"),
            Self::Assistant => f.write_str("assistant"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// One conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: EntityId,
    #[serde(default)]
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
}

impl ChatSession {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            id: generate_id(),
            messages: Vec::new(),
            created_at: now,
        }
    }

    /// Appends a message, clamping its timestamp so the log stays ordered.
    pub fn push_message(
        &mut self,
        role: Role,
        content: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Message {
        let timestamp = match self.messages.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        };
        let message = Message {
            role,
            content: content.into(),
            timestamp,
        };
        self.messages.push(message.clone());
        message
    }
}

//! Root document persisted under the storage key.
//!
//! # Invariants
//! - The five top-level keys are always present when serialized.
//! - A document parsed from untrusted JSON must pass `check_required_keys`
//!   and `validate` before it may replace stored state.

use crate::model::chat::ChatSession;
use crate::model::note::NotesStore;
use crate::model::pomodoro::PomodoroSettings;
use crate::model::project::Project;
use crate::model::todo::Todo;
use crate::model::validation::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level keys every stored or imported document must carry.
pub const REQUIRED_KEYS: [&str; 5] = ["notes", "todos", "aiChats", "pomodoro", "projects"];

/// Entire application state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub notes: NotesStore,
    pub todos: Vec<Todo>,
    pub ai_chats: Vec<ChatSession>,
    pub pomodoro: PomodoroSettings,
    pub projects: Vec<Project>,
}

impl Document {
    /// Empty collections plus default pomodoro settings keyed to `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            notes: NotesStore::default(),
            todos: Vec::new(),
            ai_chats: Vec::new(),
            pomodoro: PomodoroSettings::new(today),
            projects: Vec::new(),
        }
    }

    /// Checks semantic invariants not expressed by the JSON shape.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.pomodoro.validate()
    }

    /// Parses an untrusted JSON value into a validated document.
    ///
    /// Key presence is checked first so a missing collection is reported by
    /// name rather than as a generic shape error.
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        check_required_keys(&value)?;
        let document: Self = serde_json::from_value(value)
            .map_err(|err| ValidationError::Malformed(err.to_string()))?;
        document.validate()?;
        Ok(document)
    }
}

/// Verifies that `value` is an object carrying every key in `REQUIRED_KEYS`.
pub fn check_required_keys(value: &Value) -> Result<(), ValidationError> {
    let object = value
        .as_object()
        .ok_or_else(|| ValidationError::Malformed("root must be a JSON object".to_string()))?;
    for key in REQUIRED_KEYS {
        if !object.contains_key(key) {
            return Err(ValidationError::MissingKey(key));
        }
    }
    Ok(())
}

//! Notes collection: folders owning notes.
//!
//! # Invariants
//! - Folder names and note titles are stored trimmed and non-empty.
//! - A note belongs to exactly one folder; removing the folder removes it.

use crate::model::id::{generate_id, EntityId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const NOTE_PREVIEW_CHARS: usize = 50;

/// Root of the `notes` slice of the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesStore {
    #[serde(default)]
    pub folders: Vec<Folder>,
}

impl NotesStore {
    pub fn find_folder(&self, folder_id: &str) -> Option<&Folder> {
        self.folders.iter().find(|folder| folder.id == folder_id)
    }

    pub fn find_folder_mut(&mut self, folder_id: &str) -> Option<&mut Folder> {
        self.folders.iter_mut().find(|folder| folder.id == folder_id)
    }

    /// Total number of notes across all folders.
    pub fn note_count(&self) -> usize {
        self.folders.iter().map(|folder| folder.notes.len()).sum()
    }
}

/// Named group of notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl Folder {
    /// Creates an empty folder. `name` is expected to be normalized already.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            notes: Vec::new(),
        }
    }

    pub fn find_note(&self, note_id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == note_id)
    }

    pub fn find_note_mut(&mut self, note_id: &str) -> Option<&mut Note> {
        self.notes.iter_mut().find(|note| note.id == note_id)
    }
}

/// Plain-text note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Note {
    pub fn new(title: impl Into<String>, content: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: generate_id(),
            title: title.into(),
            content: content.into(),
            created_at: now,
        }
    }

    /// Returns the first 50 characters of the content, with `...` appended
    /// when the content is longer.
    pub fn preview(&self) -> String {
        let mut preview = self
            .content
            .chars()
            .take(NOTE_PREVIEW_CHARS)
            .collect::<String>();
        if self.content.chars().count() > NOTE_PREVIEW_CHARS {
            preview.push_str("...");
        }
        preview
    }
}

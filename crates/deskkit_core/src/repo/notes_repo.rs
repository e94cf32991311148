//! Folder and note repository.
//!
//! # Invariants
//! - Folder names and note titles are trimmed and non-empty.
//! - Deleting a folder drops every note it contains in the same save.

use crate::model::note::{Folder, Note};
use crate::model::validation::normalize_required;
use crate::repo::MutationResult;
use crate::store::{DocumentStore, Saved};
use log::info;

pub struct NotesRepository<'s> {
    store: &'s DocumentStore,
}

impl<'s> NotesRepository<'s> {
    pub fn new(store: &'s DocumentStore) -> Self {
        Self { store }
    }

    pub fn list_folders(&self) -> Vec<Folder> {
        self.store.read(|doc| doc.notes.folders.clone())
    }

    pub fn get_folder(&self, folder_id: &str) -> Option<Folder> {
        self.store
            .read(|doc| doc.notes.find_folder(folder_id).cloned())
    }

    pub fn add_folder(&self, name: &str) -> MutationResult<Folder> {
        let name = normalize_required("folder name", name)?;
        let folder = Folder::new(name);
        let saved = self.store.mutate(|doc| {
            doc.notes.folders.push(folder.clone());
            folder
        });
        info!(
            "event=folder_add module=notes status=ok folder_id={} persisted={}",
            saved.value.id,
            saved.is_persisted()
        );
        Ok(saved)
    }

    /// Renames a folder. Returns `None` inside `Saved` for a stale id.
    pub fn rename_folder(&self, folder_id: &str, name: &str) -> MutationResult<Option<Folder>> {
        let name = normalize_required("folder name", name)?;
        Ok(self.store.mutate_found(|doc| {
            let folder = doc.notes.find_folder_mut(folder_id)?;
            folder.name = name;
            Some(folder.clone())
        }))
    }

    /// Deletes a folder and all of its notes.
    ///
    /// Returns `true` when a folder was removed.
    pub fn delete_folder(&self, folder_id: &str) -> Saved<bool> {
        let saved = self.store.mutate_found(|doc| {
            let position = doc
                .notes
                .folders
                .iter()
                .position(|folder| folder.id == folder_id)?;
            Some(doc.notes.folders.remove(position).notes.len())
        });
        if let Some(removed_notes) = saved.value {
            info!(
                "event=folder_delete module=notes status=ok folder_id={folder_id} cascaded_notes={removed_notes}"
            );
        }
        saved.map(|removed| removed.is_some())
    }

    /// Lists the notes of one folder in stored order; empty for a stale id.
    pub fn list_notes(&self, folder_id: &str) -> Vec<Note> {
        self.get_folder(folder_id)
            .map(|folder| folder.notes)
            .unwrap_or_default()
    }

    pub fn get_note(&self, folder_id: &str, note_id: &str) -> Option<Note> {
        self.store.read(|doc| {
            doc.notes
                .find_folder(folder_id)
                .and_then(|folder| folder.find_note(note_id))
                .cloned()
        })
    }

    /// Adds a note to a folder. Returns `None` when the folder is gone.
    pub fn add_note(
        &self,
        folder_id: &str,
        title: &str,
        content: &str,
    ) -> MutationResult<Option<Note>> {
        let title = normalize_required("note title", title)?;
        let now = self.store.now();
        Ok(self.store.mutate_found(|doc| {
            let folder = doc.notes.find_folder_mut(folder_id)?;
            let note = Note::new(title, content, now);
            folder.notes.push(note.clone());
            Some(note)
        }))
    }

    /// Replaces a note's title and content.
    pub fn update_note(
        &self,
        folder_id: &str,
        note_id: &str,
        title: &str,
        content: &str,
    ) -> MutationResult<Option<Note>> {
        let title = normalize_required("note title", title)?;
        Ok(self.store.mutate_found(|doc| {
            let note = doc
                .notes
                .find_folder_mut(folder_id)?
                .find_note_mut(note_id)?;
            note.title = title;
            note.content = content.to_string();
            Some(note.clone())
        }))
    }

    pub fn delete_note(&self, folder_id: &str, note_id: &str) -> Saved<bool> {
        self.store
            .mutate_found(|doc| {
                let folder = doc.notes.find_folder_mut(folder_id)?;
                let before = folder.notes.len();
                folder.notes.retain(|note| note.id != note_id);
                (folder.notes.len() != before).then_some(())
            })
            .map(|removed| removed.is_some())
    }
}

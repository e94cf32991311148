//! Whole-document export and import.
//!
//! # Responsibility
//! - Serialize the stored document as a dated, pretty-printed backup.
//! - Validate an incoming backup before it replaces stored state.
//!
//! # Invariants
//! - A rejected import leaves the stored document byte-for-byte unchanged.
//! - Exporting then importing the same text yields an equal document.

use crate::model::document::Document;
use crate::model::validation::ValidationError;
use crate::store::{DocumentStore, StoreError};
use chrono::NaiveDate;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const BACKUP_FILE_PREFIX: &str = "personal-tools-backup";

#[derive(Debug)]
pub enum TransferError {
    /// The input is not valid JSON.
    Parse(serde_json::Error),
    /// The input is JSON but not an acceptable document.
    Validation(ValidationError),
    Store(StoreError),
    Io(std::io::Error),
}

impl Display for TransferError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "failed to parse backup: {err}"),
            Self::Validation(err) => write!(f, "invalid backup: {err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "backup file error: {err}"),
        }
    }
}

impl Error for TransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<StoreError> for TransferError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<std::io::Error> for TransferError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// `personal-tools-backup-YYYY-MM-DD.json`
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("{BACKUP_FILE_PREFIX}-{}.json", date.format("%Y-%m-%d"))
}

/// Pretty-prints the stored document (two-space indent).
///
/// Fails when the stored value cannot be read; a missing document exports
/// the default one.
pub fn export_json(store: &DocumentStore) -> Result<String, TransferError> {
    let document = store
        .load()?
        .unwrap_or_else(|| Document::new(store.today()));
    let text = serde_json::to_string_pretty(&document).map_err(StoreError::Encode)?;
    Ok(text)
}

/// Writes a dated backup into `dir` and returns its path.
pub fn export_to_dir(store: &DocumentStore, dir: impl AsRef<Path>) -> Result<PathBuf, TransferError> {
    let text = export_json(store)?;
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    let path = dir.join(backup_file_name(store.today()));
    std::fs::write(&path, text.as_bytes())?;
    info!(
        "event=export module=transfer status=ok bytes={} path={}",
        text.len(),
        path.display()
    );
    Ok(path)
}

/// Parses `text` without touching storage.
pub fn parse_backup(text: &str) -> Result<Document, TransferError> {
    let value = serde_json::from_str::<serde_json::Value>(text).map_err(TransferError::Parse)?;
    Document::from_value(value).map_err(TransferError::Validation)
}

/// Validates `text` and replaces the stored document with it.
pub fn import_json(store: &DocumentStore, text: &str) -> Result<Document, TransferError> {
    let document = match parse_backup(text) {
        Ok(document) => document,
        Err(err) => {
            warn!("event=import module=transfer status=error error={err}");
            return Err(err);
        }
    };
    store.save(&document)?;
    info!(
        "event=import module=transfer status=ok folders={} todos={} chats={} projects={}",
        document.notes.folders.len(),
        document.todos.len(),
        document.ai_chats.len(),
        document.projects.len()
    );
    Ok(document)
}

/// Reads a backup file and imports it.
pub fn import_file(store: &DocumentStore, path: impl AsRef<Path>) -> Result<Document, TransferError> {
    let text = std::fs::read_to_string(path)?;
    import_json(store, &text)
}

#[cfg(test)]
mod tests {
    use super::backup_file_name;
    use chrono::NaiveDate;

    #[test]
    fn backup_name_carries_iso_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(
            backup_file_name(date),
            "personal-tools-backup-2026-03-07.json"
        );
    }
}

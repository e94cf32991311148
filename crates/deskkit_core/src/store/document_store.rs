//! Whole-document load/save over a key-value backend.
//!
//! # Invariants
//! - `initialize` writes the default document only when the key is absent.
//! - `mutate` never saves when the preceding load failed, so unreadable
//!   stored data is left for an explicit import to replace.
//! - Log lines carry sizes, durations and error text only, never content.

use super::{Saved, StorageBackend, StoreError, StoreResult};
use crate::clock::Clock;
use crate::model::document::Document;
use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, error, info, warn};
use std::time::Instant;

/// Storage key used by the browser build of the suite.
pub const DEFAULT_STORAGE_KEY: &str = "personal-tools-data";

/// Explicit owner of the persisted document.
///
/// Repositories and the timer borrow a store instead of reaching for a
/// process-global instance.
pub struct DocumentStore {
    backend: Box<dyn StorageBackend>,
    clock: Box<dyn Clock>,
    key: String,
}

impl DocumentStore {
    /// Creates a store without touching the backend.
    pub fn new(
        backend: Box<dyn StorageBackend>,
        clock: Box<dyn Clock>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            clock,
            key: key.into(),
        }
    }

    /// Creates a store and seeds the default document when none exists.
    ///
    /// Initialization problems are logged, not returned: a store over
    /// unreadable data still serves default reads.
    pub fn open(
        backend: Box<dyn StorageBackend>,
        clock: Box<dyn Clock>,
        key: impl Into<String>,
    ) -> Self {
        let store = Self::new(backend, clock, key);
        if let Err(err) = store.initialize() {
            warn!(
                "event=store_init module=store status=error backend={} error={}",
                store.backend.name(),
                err
            );
        }
        store
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Writes a default document when the key is absent.
    ///
    /// Returns `Ok(true)` when a new document was written.
    pub fn initialize(&self) -> StoreResult<bool> {
        if self.load()?.is_some() {
            return Ok(false);
        }
        self.save(&Document::new(self.today()))?;
        info!(
            "event=store_init module=store status=ok backend={} seeded=true",
            self.backend.name()
        );
        Ok(true)
    }

    /// Loads and parses the stored document.
    ///
    /// Returns `Ok(None)` when nothing is stored under the key.
    pub fn load(&self) -> StoreResult<Option<Document>> {
        let started_at = Instant::now();
        let raw = self.backend.read(&self.key).map_err(|err| {
            error!(
                "event=doc_load module=store status=error backend={} error_code=read_failed error={}",
                self.backend.name(),
                err
            );
            StoreError::Read(err)
        })?;

        let Some(raw) = raw else {
            debug!(
                "event=doc_load module=store status=ok backend={} found=false",
                self.backend.name()
            );
            return Ok(None);
        };

        let document = serde_json::from_str::<serde_json::Value>(&raw)
            .map_err(|err| err.to_string())
            .and_then(|value| Document::from_value(value).map_err(|err| err.to_string()))
            .map_err(|message| {
                error!(
                    "event=doc_load module=store status=error backend={} error_code=corrupt bytes={} error={}",
                    self.backend.name(),
                    raw.len(),
                    message
                );
                StoreError::Corrupt(message)
            })?;

        debug!(
            "event=doc_load module=store status=ok backend={} found=true bytes={} duration_ms={}",
            self.backend.name(),
            raw.len(),
            started_at.elapsed().as_millis()
        );
        Ok(Some(document))
    }

    /// Serializes and writes the whole document.
    pub fn save(&self, document: &Document) -> StoreResult<()> {
        let started_at = Instant::now();
        let raw = serde_json::to_string(document).map_err(StoreError::Encode)?;
        match self.backend.write(&self.key, &raw) {
            Ok(()) => {
                debug!(
                    "event=doc_save module=store status=ok backend={} bytes={} duration_ms={}",
                    self.backend.name(),
                    raw.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=doc_save module=store status=error backend={} bytes={} error_code=write_failed error={}",
                    self.backend.name(),
                    raw.len(),
                    err
                );
                Err(StoreError::Write(err))
            }
        }
    }

    /// Loads the document, falling back to a default one when the key is
    /// absent or unreadable.
    pub fn load_or_default(&self) -> Document {
        self.load_for_update().0
    }

    /// Runs `f` against a freshly loaded document.
    pub fn read<T>(&self, f: impl FnOnce(&Document) -> T) -> T {
        f(&self.load_or_default())
    }

    /// Read-modify-write of the whole document.
    ///
    /// `f` always runs. The result is saved unless the load failed, in which
    /// case the load error is reported through `Saved::persist_error`.
    pub fn mutate<T>(&self, f: impl FnOnce(&mut Document) -> T) -> Saved<T> {
        let (mut document, load_error) = self.load_for_update();
        let value = f(&mut document);
        self.finish(document, load_error, value)
    }

    /// Like `mutate`, but aborts without saving when `f` returns an error.
    pub fn try_mutate<T, E>(
        &self,
        f: impl FnOnce(&mut Document) -> Result<T, E>,
    ) -> Result<Saved<T>, E> {
        let (mut document, load_error) = self.load_for_update();
        let value = f(&mut document)?;
        Ok(self.finish(document, load_error, value))
    }

    /// Like `mutate`, for changes aimed at one entity.
    ///
    /// `None` from `f` means the target was not found and nothing changed,
    /// so the save is skipped.
    pub fn mutate_found<T>(&self, f: impl FnOnce(&mut Document) -> Option<T>) -> Saved<Option<T>> {
        let (mut document, load_error) = self.load_for_update();
        match f(&mut document) {
            Some(value) => self.finish(document, load_error, Some(value)),
            None => match load_error {
                Some(err) => Saved::unpersisted(None, err),
                None => Saved::persisted(None),
            },
        }
    }

    fn load_for_update(&self) -> (Document, Option<StoreError>) {
        match self.load() {
            Ok(Some(document)) => (document, None),
            Ok(None) => (Document::new(self.today()), None),
            Err(err) => (Document::new(self.today()), Some(err)),
        }
    }

    fn finish<T>(&self, document: Document, load_error: Option<StoreError>, value: T) -> Saved<T> {
        if let Some(err) = load_error {
            warn!(
                "event=doc_save module=store status=skip backend={} reason=load_failed",
                self.backend.name()
            );
            return Saved::unpersisted(value, err);
        }
        match self.save(&document) {
            Ok(()) => Saved::persisted(value),
            Err(err) => Saved::unpersisted(value, err),
        }
    }
}

//! Persistence store for the single root document.
//!
//! # Responsibility
//! - Abstract the key-value medium behind `StorageBackend`.
//! - Own whole-document load/save and the read-modify-write primitive.
//! - Report storage failures to callers without aborting their operation.
//!
//! # Invariants
//! - The document is always written whole; there are no partial updates.
//! - A stored value that fails to parse is never overwritten implicitly.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod backend;
mod document_store;
mod sqlite_backend;

pub use backend::{MemoryBackend, StorageBackend};
pub use document_store::{DocumentStore, DEFAULT_STORAGE_KEY};
pub use sqlite_backend::SqliteBackend;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure raised by a concrete backend.
#[derive(Debug)]
pub enum BackendError {
    Db(DbError),
    /// The write would exceed the backend's byte quota.
    QuotaExceeded { limit: usize, requested: usize },
}

impl Display for BackendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::QuotaExceeded { limit, requested } => write!(
                f,
                "storage quota exceeded: {requested} bytes requested, limit is {limit}"
            ),
        }
    }
}

impl Error for BackendError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::QuotaExceeded { .. } => None,
        }
    }
}

impl From<DbError> for BackendError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// Document store error.
#[derive(Debug)]
pub enum StoreError {
    /// The backend could not be read.
    Read(BackendError),
    /// The stored value is not a valid document.
    Corrupt(String),
    /// The document could not be serialized.
    Encode(serde_json::Error),
    /// The backend rejected the write.
    Write(BackendError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read(err) => write!(f, "failed to read stored data: {err}"),
            Self::Corrupt(message) => write!(f, "stored data is corrupt: {message}"),
            Self::Encode(err) => write!(f, "failed to encode document: {err}"),
            Self::Write(err) => write!(f, "failed to save data: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read(err) | Self::Write(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Corrupt(_) => None,
        }
    }
}

/// Result of a mutation that always completes in memory.
///
/// `persist_error` is `Some` when the change may not have reached storage.
#[must_use]
#[derive(Debug)]
pub struct Saved<T> {
    pub value: T,
    pub persist_error: Option<StoreError>,
}

impl<T> Saved<T> {
    pub fn persisted(value: T) -> Self {
        Self {
            value,
            persist_error: None,
        }
    }

    pub fn unpersisted(value: T, err: StoreError) -> Self {
        Self {
            value,
            persist_error: Some(err),
        }
    }

    /// True when the change reached storage.
    pub fn is_persisted(&self) -> bool {
        self.persist_error.is_none()
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Saved<U> {
        Saved {
            value: f(self.value),
            persist_error: self.persist_error,
        }
    }
}

impl<T> Saved<Option<T>> {
    /// Turns a stale-id outcome into `None`, keeping any persist error.
    pub fn transpose(self) -> Option<Saved<T>> {
        let Saved {
            value,
            persist_error,
        } = self;
        value.map(|value| Saved {
            value,
            persist_error,
        })
    }
}

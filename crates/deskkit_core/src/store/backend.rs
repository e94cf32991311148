//! Key-value backend contract and the in-process implementation.

use super::BackendError;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// String key-value medium holding serialized documents.
///
/// Mirrors the browser local-storage surface: whole values are read and
/// replaced by key, with no partial writes.
pub trait StorageBackend {
    /// Short backend label used in log lines.
    fn name(&self) -> &'static str;
    /// Returns the value stored under `key`, or `None` when absent.
    fn read(&self, key: &str) -> Result<Option<String>, BackendError>;
    /// Replaces the value stored under `key`.
    fn write(&self, key: &str, value: &str) -> Result<(), BackendError>;
}

/// Shared handle, so a caller can keep inspecting a backend it handed to a
/// store.
impl<B: StorageBackend + ?Sized> StorageBackend for Rc<B> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn read(&self, key: &str) -> Result<Option<String>, BackendError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), BackendError> {
        (**self).write(key, value)
    }
}

/// In-process backend with an optional total-size quota.
///
/// The quota counts key and value bytes across all entries, the same way
/// browser storage limits are applied.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RefCell<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: RefCell::default(),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Seeds a raw value, bypassing the quota. Useful to simulate data
    /// written by another process.
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.borrow_mut().insert(key.into(), value.into());
    }

    /// Returns a copy of the raw value under `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn used_bytes_excluding(&self, key: &str) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|(existing, _)| existing.as_str() != key)
            .map(|(existing, value)| existing.len() + value.len())
            .sum()
    }
}

impl StorageBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn read(&self, key: &str) -> Result<Option<String>, BackendError> {
        Ok(self.raw(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), BackendError> {
        if let Some(limit) = self.quota_bytes {
            let requested = self.used_bytes_excluding(key) + key.len() + value.len();
            if requested > limit {
                return Err(BackendError::QuotaExceeded { limit, requested });
            }
        }
        self.insert_raw(key, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryBackend, StorageBackend};
    use crate::store::BackendError;

    #[test]
    fn write_then_read_returns_value() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.read("k").unwrap(), None);
        backend.write("k", "v1").unwrap();
        backend.write("k", "v2").unwrap();
        assert_eq!(backend.read("k").unwrap().as_deref(), Some("v2"));
    }

    #[test]
    fn quota_rejects_oversized_write_and_keeps_previous_value() {
        let backend = MemoryBackend::with_quota(8);
        backend.write("k", "12345").unwrap();

        let err = backend.write("k", "123456789").unwrap_err();
        assert!(matches!(
            err,
            BackendError::QuotaExceeded {
                limit: 8,
                requested: 10
            }
        ));
        assert_eq!(backend.raw("k").as_deref(), Some("12345"));
    }
}

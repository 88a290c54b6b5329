//! Append-only registries with an explicit "closed for writes" transition.
//!
//! Lifecycle:
//! 1. Open: `register` appends; a key can be registered once.
//! 2. Sealed: the map is moved into a `OnceCell` snapshot. Writes fail,
//!    reads no longer take the lock.
//!
//! Registration happens at process start, lookups during query compilation.
//! Sealing turns that ordering into something the registry enforces.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard};

use once_cell::sync::OnceCell;
use thiserror::Error;

use crate::config::BindConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("{registry} registry: '{key}' is already registered")]
    Duplicate { registry: &'static str, key: String },

    #[error("{registry} registry is sealed; cannot register '{key}'")]
    Sealed { registry: &'static str, key: String },
}

pub struct Registry<K, V> {
    name: &'static str,
    seal_on_first_read: bool,
    open: Mutex<BTreeMap<K, V>>,
    sealed: OnceCell<BTreeMap<K, V>>,
}

impl<K, V> Registry<K, V>
where
    K: Ord + Clone + fmt::Display,
    V: Clone,
{
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            seal_on_first_read: false,
            open: Mutex::new(BTreeMap::new()),
            sealed: OnceCell::new(),
        }
    }

    pub fn with_config(name: &'static str, cfg: &BindConfig) -> Self {
        Self {
            seal_on_first_read: cfg.seal_on_first_read,
            ..Self::new(name)
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    // Inserts never leave the map half-updated, so a poisoned lock still
    // guards a consistent map.
    fn lock(&self) -> MutexGuard<'_, BTreeMap<K, V>> {
        self.open.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn register(&self, key: K, value: V) -> Result<(), RegistryError> {
        let mut open = self.lock();
        if self.sealed.get().is_some() {
            return Err(RegistryError::Sealed {
                registry: self.name,
                key: key.to_string(),
            });
        }
        if open.contains_key(&key) {
            return Err(RegistryError::Duplicate {
                registry: self.name,
                key: key.to_string(),
            });
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(registry = self.name, %key, "registered");

        open.insert(key, value);
        Ok(())
    }

    /// Close for writes. Idempotent.
    pub fn seal(&self) {
        let mut open = self.lock();
        if self.sealed.get().is_none() {
            let snapshot = std::mem::take(&mut *open);

            #[cfg(feature = "tracing")]
            tracing::debug!(registry = self.name, entries = snapshot.len(), "sealed");

            // Cannot already be set: we hold the lock and checked above.
            let _ = self.sealed.set(snapshot);
        }
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed.get().is_some()
    }

    /// Membership check that never triggers `seal_on_first_read`; used while
    /// registering.
    pub fn contains(&self, key: &K) -> bool {
        if let Some(map) = self.sealed.get() {
            return map.contains_key(key);
        }
        let open = self.lock();
        match self.sealed.get() {
            Some(map) => map.contains_key(key),
            None => open.contains_key(key),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        if self.seal_on_first_read && self.sealed.get().is_none() {
            self.seal();
        }
        if let Some(map) = self.sealed.get() {
            return map.get(key).cloned();
        }
        let open = self.lock();
        match self.sealed.get() {
            Some(map) => map.get(key).cloned(),
            None => open.get(key).cloned(),
        }
    }

    /// Registered keys in sorted order.
    pub fn keys(&self) -> Vec<K> {
        match self.sealed.get() {
            Some(map) => map.keys().cloned().collect(),
            None => {
                let open = self.lock();
                match self.sealed.get() {
                    Some(map) => map.keys().cloned().collect(),
                    None => open.keys().cloned().collect(),
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> fmt::Debug for Registry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = match self.sealed.get() {
            Some(map) => map.len(),
            None => self.open.lock().map(|m| m.len()).unwrap_or_default(),
        };
        f.debug_struct("Registry")
            .field("name", &self.name)
            .field("entries", &entries)
            .field("sealed", &self.sealed.get().is_some())
            .finish()
    }
}

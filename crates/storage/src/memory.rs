//! Reference implementation of [`Store`] backed by an in-process ordered map.
//!
//! This is the stand-in for the LSM/B-tree engine the spec places out of
//! scope (§1). It exists so the transactional core has a real, ordered,
//! atomically-accessed key-value store to drive in tests — not as a
//! production storage engine.

use crate::merge::MergeOperator;
use crate::store::Store;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tictoc_core::Result;

/// An ordered, in-memory [`Store`] guarded by a single `RwLock`.
///
/// Per-key atomicity (spec §5) is trivially satisfied: every operation
/// holds the lock for its own duration and the map gives each key its own
/// slot. There is no cross-key atomicity here — that is the transactional
/// core's responsibility, not the store's.
pub struct BTreeStore<M: MergeOperator> {
    data: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
    merge: Arc<M>,
}

impl<M: MergeOperator> BTreeStore<M> {
    /// Creates an empty store using `merge` for [`Store::update`].
    pub fn new(merge: M) -> Self {
        BTreeStore {
            data: RwLock::new(BTreeMap::new()),
            merge: Arc::new(merge),
        }
    }

    /// Number of live keys. Test/debugging helper, not part of the spec's
    /// required interface.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// True if the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

impl<M: MergeOperator> Store for BTreeStore<M> {
    fn lookup(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.data.read().get(key).cloned())
    }

    fn insert(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.data.write().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn update(&self, key: &[u8], delta: &[u8]) -> Result<()> {
        let mut guard = self.data.write();
        let existing = guard.get(key).map(|v| v.as_slice());
        let merged = self.merge.merge(key, existing, delta);
        guard.insert(key.to_vec(), merged);
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        self.data.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::AppendMerge;

    #[test]
    fn lookup_on_empty_store_is_none() {
        let store = BTreeStore::new(AppendMerge);
        assert_eq!(store.lookup(b"k").unwrap(), None);
    }

    #[test]
    fn insert_then_lookup_round_trips() {
        let store = BTreeStore::new(AppendMerge);
        store.insert(b"k", b"v1").unwrap();
        assert_eq!(store.lookup(b"k").unwrap(), Some(b"v1".to_vec()));
    }

    #[test]
    fn insert_overwrites_blindly() {
        let store = BTreeStore::new(AppendMerge);
        store.insert(b"k", b"v1").unwrap();
        store.insert(b"k", b"v2").unwrap();
        assert_eq!(store.lookup(b"k").unwrap(), Some(b"v2".to_vec()));
    }

    #[test]
    fn update_merges_with_existing() {
        let store = BTreeStore::new(AppendMerge);
        store.insert(b"k", b"base").unwrap();
        store.update(b"k", b"-delta").unwrap();
        assert_eq!(store.lookup(b"k").unwrap(), Some(b"base-delta".to_vec()));
    }

    #[test]
    fn update_on_absent_key_uses_delta_alone() {
        let store = BTreeStore::new(AppendMerge);
        store.update(b"k", b"delta").unwrap();
        assert_eq!(store.lookup(b"k").unwrap(), Some(b"delta".to_vec()));
    }

    #[test]
    fn delete_removes_key() {
        let store = BTreeStore::new(AppendMerge);
        store.insert(b"k", b"v").unwrap();
        store.delete(b"k").unwrap();
        assert_eq!(store.lookup(b"k").unwrap(), None);
    }

    #[test]
    fn delete_of_absent_key_is_a_no_op() {
        let store = BTreeStore::new(AppendMerge);
        store.delete(b"k").unwrap();
        assert_eq!(store.lookup(b"k").unwrap(), None);
    }
}

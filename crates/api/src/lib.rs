//! The transactional interface exposed to users (§6 "Transactional
//! interface (exposed)").
//!
//! [`TransactionalStore`] bundles an underlying [`Store`] with a
//! [`TransactionManager`], giving callers the `open`/`close`,
//! `register_thread`/`deregister_thread`, `begin`/`commit`/`abort`, and
//! buffered `insert`/`update`/`delete`/`lookup` operations the spec lists.

#![warn(missing_docs)]
#![warn(clippy::all)]

use tictoc_concurrency::{TransactionContext, TransactionManager, TransactionalConfig};
use tictoc_core::{IsolationLevel, Result};
use tictoc_storage::Store;

/// Outcome of [`TransactionalStore::commit`].
///
/// The spec's C-flavored interface returns "0 | nonzero"; this is the
/// idiomatic Rust equivalent — `Ok(())` is the 0 case, `Err` carries the
/// abort/failure reason in place of an opaque nonzero code.
pub type CommitOutcome = Result<()>;

/// A handle bundling an underlying key-value [`Store`] with the TicToc
/// transaction manager that makes it transactional.
///
/// `open`/`close` wrap the underlying store's own lifecycle (§6): here,
/// `open` takes an already-constructed store (construction and teardown of
/// the store itself — files, caches, background threads — is the store's
/// own concern, out of this crate's scope per spec §1).
pub struct TransactionalStore<S: Store> {
    store: S,
    manager: TransactionManager,
}

impl<S: Store> TransactionalStore<S> {
    /// Opens a transactional handle over `store`, using `config` for the
    /// isolation level, lock back-off, and the store's key comparator /
    /// merge operator (§6 "open(config) -> handle").
    pub fn open(store: S, config: TransactionalConfig) -> Self {
        TransactionalStore {
            store,
            manager: TransactionManager::new(config),
        }
    }

    /// Tears down the handle. Delegates to the underlying store's own
    /// `Drop`, if any; there is no transactional-layer state to flush,
    /// since every committed write is already durable to the extent the
    /// underlying store provides (§1 Non-goals).
    pub fn close(self) {}

    /// Registers the calling thread with the underlying store (§6).
    pub fn register_thread(&self) {
        self.store.register_thread();
    }

    /// Deregisters the calling thread from the underlying store (§6).
    pub fn deregister_thread(&self) {
        self.store.deregister_thread();
    }

    /// Opens a transaction at the handle's configured isolation level.
    pub fn begin(&self) -> TransactionContext {
        self.manager.begin()
    }

    /// Buffered blind put; never touches the store (§4.4.2).
    pub fn insert(&self, txn: &mut TransactionContext, key: &[u8], value: &[u8]) -> Result<()> {
        self.manager.insert(txn, key, value)
    }

    /// Buffered merge-delta put; never touches the store (§4.4.2).
    pub fn update(&self, txn: &mut TransactionContext, key: &[u8], delta: &[u8]) -> Result<()> {
        self.manager.update(txn, key, delta)
    }

    /// Buffered delete; never touches the store (§4.4.2).
    pub fn delete(&self, txn: &mut TransactionContext, key: &[u8]) -> Result<()> {
        self.manager.delete(txn, key)
    }

    /// Synchronous read (§4.4.1). Returns the payload with its commit
    /// timestamp header already stripped, or `None` if the key is absent.
    pub fn lookup(&self, txn: &mut TransactionContext, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.manager.lookup(txn, &self.store, key)
    }

    /// Runs the TicToc commit protocol (§4.4.3). `Ok(())` means committed;
    /// `Err` means the transaction aborted (or, rarely, that the store
    /// failed fatally during the write phase after validation succeeded).
    pub fn commit(&self, txn: &mut TransactionContext) -> CommitOutcome {
        self.manager.commit(txn, &self.store)
    }

    /// Explicit abort (§4.4.4). Never mutates the store.
    pub fn abort(&self, txn: &mut TransactionContext) {
        self.manager.abort(txn)
    }

    /// Sets the isolation level future transactions will `begin()` at
    /// (§6). Only [`IsolationLevel::Serializable`] is meaningful today.
    pub fn set_isolation_level(&mut self, level: IsolationLevel) {
        self.manager.set_isolation_level(level);
    }

    /// Borrows the underlying store, for callers that need direct
    /// non-transactional access (e.g. bulk loading before any transactions
    /// begin).
    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tictoc_storage::comparator::ByteComparator;
    use tictoc_storage::memory::BTreeStore;
    use tictoc_storage::merge::AppendMerge;

    fn open_handle() -> TransactionalStore<BTreeStore<AppendMerge>> {
        let config = TransactionalConfig::new(Arc::new(ByteComparator), Arc::new(AppendMerge));
        TransactionalStore::open(BTreeStore::new(AppendMerge), config)
    }

    #[test]
    fn insert_commit_lookup_round_trip() {
        let db = open_handle();
        let mut txn = db.begin();
        db.insert(&mut txn, b"k", b"v").unwrap();
        db.commit(&mut txn).unwrap();

        let mut reader = db.begin();
        assert_eq!(db.lookup(&mut reader, b"k").unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn insert_then_delete_then_commit_not_found() {
        let db = open_handle();
        let mut txn = db.begin();
        db.insert(&mut txn, b"k", b"v").unwrap();
        db.delete(&mut txn, b"k").unwrap();
        db.commit(&mut txn).unwrap();

        let mut reader = db.begin();
        assert_eq!(db.lookup(&mut reader, b"k").unwrap(), None);
    }

    #[test]
    fn abort_leaves_store_untouched() {
        let db = open_handle();
        let mut txn = db.begin();
        db.insert(&mut txn, b"k", b"v").unwrap();
        db.abort(&mut txn);

        let mut reader = db.begin();
        assert_eq!(db.lookup(&mut reader, b"k").unwrap(), None);
    }

    #[test]
    fn set_isolation_level_is_serializable_by_default() {
        let db = open_handle();
        assert_eq!(
            db.begin().isolation_level,
            tictoc_core::IsolationLevel::Serializable
        );
    }

    #[test]
    fn register_and_deregister_thread_are_harmless_no_ops() {
        let db = open_handle();
        db.register_thread();
        db.deregister_thread();
    }
}

//! Transaction manager / commit protocol (§4.4).
//!
//! Orchestrates `begin`, per-operation buffering, and the three-phase
//! read/validate/write commit protocol. This mirrors the original
//! `transactional_splinterdb_commit` in `transaction.c`: sort the write
//! set, spin-acquire locks with a fixed back-off, validate the read set,
//! finalize the commit timestamp, write, then release.

use crate::codec::TupleCodec;
use crate::config::TransactionalConfig;
use crate::lock_table::{AcquireResult, LockTable};
use crate::transaction::{Op, TransactionContext, TransactionStatus};
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use tictoc_core::{Error, IsolationLevel, Result, Ts};
use tictoc_storage::Store;

/// Coordinates lock acquisition and the read/validate/write commit
/// sequence across all transactions sharing a [`LockTable`].
///
/// The manager does not own the underlying store — like the teacher's
/// `TransactionManager::commit<S: Storage>`, the store is passed in per
/// call, since a manager may drive commits against more than one store
/// instance sharing the same lock table (or, more commonly, is bundled
/// with exactly one store by the `api` crate's handle).
pub struct TransactionManager {
    config: TransactionalConfig,
    lock_table: LockTable,
    next_txn_id: AtomicU64,
}

impl TransactionManager {
    /// Creates a manager with an empty lock table.
    pub fn new(config: TransactionalConfig) -> Self {
        TransactionManager {
            config,
            lock_table: LockTable::new(),
            next_txn_id: AtomicU64::new(1),
        }
    }

    /// Current isolation level new transactions will begin at.
    pub fn isolation_level(&self) -> IsolationLevel {
        self.config.isolation_level
    }

    /// Changes the isolation level future `begin()` calls use (§6
    /// `set_isolation_level`). Only `Serializable` is meaningful today.
    pub fn set_isolation_level(&mut self, level: IsolationLevel) {
        self.config.isolation_level = level;
    }

    /// Opens a new transaction at the manager's configured isolation level
    /// (§4.3 `begin`).
    pub fn begin(&self) -> TransactionContext {
        let id = self.next_txn_id.fetch_add(1, Ordering::SeqCst);
        TransactionContext::begin(id, self.config.isolation_level)
    }

    /// Read path (§4.4.1): point-lookup `key`, record a read-set entry if
    /// found, and return the payload with its header stripped.
    ///
    /// Absent keys are *not* added to the read set (§4.4.1 step 3, §9 Open
    /// Question 2) — absence carries no timestamp to validate against.
    pub fn lookup<S: Store + ?Sized>(
        &self,
        txn: &mut TransactionContext,
        store: &S,
        key: &[u8],
    ) -> Result<Option<Vec<u8>>> {
        match TupleCodec::lookup_payload(store, key)? {
            Some((ts, payload)) => {
                txn.record_read(key.to_vec(), payload.clone(), ts);
                Ok(Some(payload))
            }
            None => Ok(None),
        }
    }

    /// Buffers a blind put (§4.4.2). Never touches the store.
    pub fn insert(&self, txn: &mut TransactionContext, key: &[u8], value: &[u8]) -> Result<()> {
        txn.local_write(key, Op::Insert, value, &*self.config.merge)
    }

    /// Buffers a merge-delta put (§4.4.2). Never touches the store.
    pub fn update(&self, txn: &mut TransactionContext, key: &[u8], delta: &[u8]) -> Result<()> {
        txn.local_write(key, Op::Update, delta, &*self.config.merge)
    }

    /// Buffers a delete (§4.4.2). Never touches the store.
    pub fn delete(&self, txn: &mut TransactionContext, key: &[u8]) -> Result<()> {
        txn.local_write(key, Op::Delete, &[], &*self.config.merge)
    }

    /// Explicit abort (§4.4.4): releases any held locks, discards both
    /// sets, never mutates the store. Valid while `Active`; a transaction
    /// that is mid-`commit` on the same thread cannot also be mid-`abort`,
    /// since a context is owned by exactly one thread (§5).
    pub fn abort(&self, txn: &mut TransactionContext) {
        for entry in &txn.write_set {
            self.lock_table.release(&entry.key, txn.id);
        }
        txn.reset();
        txn.status = TransactionStatus::Aborted {
            reason: "explicit abort".to_string(),
        };
    }

    /// Runs the three-phase TicToc commit protocol (§4.4.3).
    ///
    /// Returns `Ok(())` on commit, `Err(Error::Aborted(_))` if validation
    /// failed, or `Err(Error::StoreFatal(_))` if the store failed during
    /// the write phase (unrecoverable — the transaction was already
    /// validated and cannot be un-stamped).
    pub fn commit<S: Store + ?Sized>(
        &self,
        txn: &mut TransactionContext,
        store: &S,
    ) -> Result<()> {
        txn.status = TransactionStatus::Committing;

        // Step 1: sort and lock the write set.
        txn.sort_write_set(&*self.config.comparator);
        self.lock_write_set(txn)?;

        // Step 2: validate the read set, then fold write-set timestamps in.
        if let Err(reason) = self.validate(txn, store) {
            self.release_write_set(txn);
            txn.status = TransactionStatus::Aborted {
                reason: reason.clone(),
            };
            return Err(Error::Aborted(reason));
        }

        if self.config.strict_monotonic_commit_ts {
            txn.commit_ts = Ts(txn.commit_ts.0 + 1);
        }

        // Step 3: write.
        if let Err(e) = self.write_phase(txn, store) {
            self.release_write_set(txn);
            let reason = e.to_string();
            txn.status = TransactionStatus::Failed {
                reason: reason.clone(),
            };
            tracing::error!(txn_id = txn.id, error = %reason, "store write failed after commit validation");
            return Err(Error::StoreFatal(reason));
        }

        // Step 4: cleanup.
        self.release_write_set(txn);
        txn.status = TransactionStatus::Committed;
        Ok(())
    }

    /// Step 1: spin-acquire every write-set key in sorted order, releasing
    /// in reverse and backing off on contention (§4.4.3 step 1).
    fn lock_write_set(&self, txn: &TransactionContext) -> Result<()> {
        let mut retries: u32 = 0;
        loop {
            let mut acquired: Vec<&[u8]> = Vec::with_capacity(txn.write_set.len());
            let mut busy = false;
            for entry in &txn.write_set {
                match self.lock_table.try_acquire(&entry.key, txn.id) {
                    AcquireResult::Acquired => acquired.push(&entry.key),
                    AcquireResult::Busy => {
                        busy = true;
                        break;
                    }
                }
            }

            if !busy {
                return Ok(());
            }

            for key in acquired.iter().rev() {
                self.lock_table.release(key, txn.id);
            }

            if let Some(max) = self.config.max_commit_retries {
                retries += 1;
                if retries > max {
                    return Err(Error::Aborted(
                        "lock acquisition retries exhausted".to_string(),
                    ));
                }
            }

            tracing::debug!(txn_id = txn.id, retries, "write-set lock busy, backing off");
            thread::sleep(self.config.lock_backoff);
        }
    }

    /// Step 2: validate the read set, then fold write-set timestamps into
    /// `commit_ts`. Returns `Err(reason)` on conflict.
    fn validate<S: Store + ?Sized>(
        &self,
        txn: &mut TransactionContext,
        store: &S,
    ) -> std::result::Result<(), String> {
        for i in 0..txn.read_set.len() {
            let (key, snapshot_ts) = {
                let r = &txn.read_set[i];
                (r.key.clone(), r.snapshot_ts)
            };

            let cur_ts = TupleCodec::ts_of(store, &key)
                .map_err(|e| format!("store error validating read of {:?}: {e}", key))?;

            let written_by_other = cur_ts != snapshot_ts;
            let locked_by_other =
                self.lock_table.is_locked(&key) && !txn.write_set_contains(&key);

            if written_by_other || locked_by_other {
                return Err(format!(
                    "read-set conflict on key {:?} (snapshot_ts={}, cur_ts={}, locked_by_other={})",
                    key, snapshot_ts, cur_ts, locked_by_other
                ));
            }

            txn.commit_ts = txn.commit_ts.max(cur_ts);
        }

        for i in 0..txn.write_set.len() {
            let key = txn.write_set[i].key.clone();
            let cur_ts = TupleCodec::ts_of(store, &key)
                .map_err(|e| format!("store error validating write of {:?}: {e}", key))?;
            txn.commit_ts = txn.commit_ts.max(cur_ts);
        }

        Ok(())
    }

    /// Step 3: stamp every write-set entry with the finalized `commit_ts`
    /// and emit it to the store per its op.
    fn write_phase<S: Store + ?Sized>(&self, txn: &mut TransactionContext, store: &S) -> Result<()> {
        for entry in txn.write_set.iter_mut() {
            entry.pending_ts = txn.commit_ts;
            match entry.op {
                Op::Insert => {
                    let stamped = TupleCodec::encode(txn.commit_ts, &entry.pending_payload);
                    store.insert(&entry.key, &stamped)?;
                }
                Op::Update => {
                    let stamped = TupleCodec::encode(txn.commit_ts, &entry.pending_payload);
                    store.update(&entry.key, &stamped)?;
                }
                Op::Delete => {
                    store.delete(&entry.key)?;
                }
            }
        }
        Ok(())
    }

    fn release_write_set(&self, txn: &TransactionContext) {
        for entry in &txn.write_set {
            self.lock_table.release(&entry.key, txn.id);
        }
    }
}

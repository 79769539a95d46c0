//! Lock table (§4.2): short-held exclusive locks over a dynamic keyspace,
//! used only during a transaction's write phase.
//!
//! Fairness is not required and acquisition order is unspecified by this
//! module — deadlock avoidance is the commit protocol's job
//! ([`crate::manager`]), which always acquires in sorted key order.

use dashmap::DashMap;

/// Identity of a lock holder. In practice this is a transaction id.
pub type HolderId = u64;

/// Outcome of a non-blocking lock acquisition attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireResult {
    /// The caller now holds the lock.
    Acquired,
    /// Another holder currently owns the lock; try again later.
    Busy,
}

impl AcquireResult {
    /// True if the lock was acquired.
    pub fn is_acquired(self) -> bool {
        matches!(self, AcquireResult::Acquired)
    }
}

/// A concurrent mapping from key bytes to the holder currently locking it.
///
/// No blocking wait is provided here — callers that get [`AcquireResult::Busy`]
/// are expected to back off and retry themselves (§4.4.3 step 1).
#[derive(Default)]
pub struct LockTable {
    locks: DashMap<Vec<u8>, HolderId>,
}

impl LockTable {
    /// Creates an empty lock table.
    pub fn new() -> Self {
        LockTable {
            locks: DashMap::new(),
        }
    }

    /// Non-blocking attempt to acquire an exclusive lock on `key`.
    ///
    /// Re-acquiring a key already held by `holder` succeeds (idempotent
    /// self-acquisition), matching the "self-write visibility" scenario in
    /// spec §8 (S3): validation must recognize its own holds.
    pub fn try_acquire(&self, key: &[u8], holder: HolderId) -> AcquireResult {
        match self.locks.entry(key.to_vec()) {
            dashmap::mapref::entry::Entry::Occupied(entry) => {
                if *entry.get() == holder {
                    AcquireResult::Acquired
                } else {
                    AcquireResult::Busy
                }
            }
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(holder);
                AcquireResult::Acquired
            }
        }
    }

    /// Releases `key` if held by `holder`. Idempotent against holders that
    /// never acquired the key, and against keys that are already free.
    pub fn release(&self, key: &[u8], holder: HolderId) {
        self.locks.remove_if(key, |_, v| *v == holder);
    }

    /// True if any transaction currently holds `key`, regardless of holder.
    pub fn is_locked(&self, key: &[u8]) -> bool {
        self.locks.contains_key(key)
    }

    /// True if `key` is currently held specifically by `holder`.
    pub fn is_locked_by(&self, key: &[u8], holder: HolderId) -> bool {
        self.locks.get(key).map(|v| *v == holder).unwrap_or(false)
    }

    /// Number of keys currently locked. Test/debugging helper.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// True if no keys are currently locked (spec §8 invariant 4: "No lock
    /// entry is present in the lock table when no transaction is
    /// mid-commit").
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_on_free_key_succeeds() {
        let table = LockTable::new();
        assert_eq!(table.try_acquire(b"k", 1), AcquireResult::Acquired);
        assert!(table.is_locked(b"k"));
        assert!(table.is_locked_by(b"k", 1));
    }

    #[test]
    fn acquire_by_other_holder_is_busy() {
        let table = LockTable::new();
        table.try_acquire(b"k", 1);
        assert_eq!(table.try_acquire(b"k", 2), AcquireResult::Busy);
    }

    #[test]
    fn reacquiring_own_lock_succeeds() {
        let table = LockTable::new();
        table.try_acquire(b"k", 1);
        assert_eq!(table.try_acquire(b"k", 1), AcquireResult::Acquired);
    }

    #[test]
    fn release_is_idempotent_against_non_holders() {
        let table = LockTable::new();
        // Never acquired - must not panic and must have no effect.
        table.release(b"k", 1);
        assert!(!table.is_locked(b"k"));
    }

    #[test]
    fn release_only_affects_the_actual_holder() {
        let table = LockTable::new();
        table.try_acquire(b"k", 1);
        // Holder 2 releasing key 1 owns should be a no-op.
        table.release(b"k", 2);
        assert!(table.is_locked_by(b"k", 1));

        table.release(b"k", 1);
        assert!(!table.is_locked(b"k"));
    }

    #[test]
    fn empty_table_has_no_locks() {
        let table = LockTable::new();
        assert!(table.is_empty());
        table.try_acquire(b"k", 1);
        assert!(!table.is_empty());
        table.release(b"k", 1);
        assert!(table.is_empty());
    }

    #[test]
    fn dynamic_keyspace_tolerates_arbitrary_keys() {
        let table = LockTable::new();
        for i in 0..1000u64 {
            let key = i.to_le_bytes();
            assert!(table.try_acquire(&key, i).is_acquired());
        }
        assert_eq!(table.len(), 1000);
    }
}

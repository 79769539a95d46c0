//! The narrow store interface the transactional core consumes (§6).

use tictoc_core::Result;

/// Point-lookup / blind-write key-value store.
///
/// Implementations must provide an atomic snapshot of a single key on
/// [`Store::lookup`] and atomic per-key put/delete (spec §5 "Ordering
/// guarantees": "the underlying store provides per-key atomic put/delete").
/// Cross-key atomicity is the transactional core's job, not the store's.
pub trait Store: Send + Sync {
    /// Point lookup. Returns `None` if the key is absent.
    fn lookup(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Blind put — unconditionally replaces whatever is stored at `key`.
    fn insert(&self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Merge-style put: combines `delta` with any existing value at `key`
    /// using the store's configured [`crate::MergeOperator`], per spec §6
    /// ("merge function supplied as part of store configuration").
    fn update(&self, key: &[u8], delta: &[u8]) -> Result<()>;

    /// Removes `key` entirely. A deleted key reads back as absent
    /// thereafter (spec §4.4.3 step 3: "no tombstone with timestamp").
    fn delete(&self, key: &[u8]) -> Result<()>;

    /// Per-thread registration hook (spec §6). The reference store has no
    /// thread-local state, so the default implementation is a no-op.
    fn register_thread(&self) {}

    /// Per-thread deregistration hook (spec §6). No-op by default.
    fn deregister_thread(&self) {}
}

//! Transaction context (§4.3): per-transaction read/write-set buffering.

use tictoc_core::{Error, IsolationLevel, Result, Ts};
use tictoc_storage::{KeyComparator, MergeOperator};

/// The kind of a buffered write (§3 "Operation kind").
///
/// `Insert` and `Delete` are *definitive* — they fully replace whatever
/// came before in the write set. `Update` is a merge-delta that must be
/// combined with any already-buffered value for the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Blind put.
    Insert,
    /// Merge-style put.
    Update,
    /// Remove the key.
    Delete,
}

impl Op {
    /// `Insert` and `Delete` replace prior state outright; `Update` does not.
    pub fn is_definitive(self) -> bool {
        matches!(self, Op::Insert | Op::Delete)
    }
}

/// A captured read (§3 "Read-set entry").
#[derive(Debug, Clone)]
pub struct ReadEntry {
    /// The key that was read.
    pub key: Vec<u8>,
    /// The payload observed at read time (header already stripped).
    pub value: Vec<u8>,
    /// The store's timestamp for `key` at the moment of the read.
    pub snapshot_ts: Ts,
}

/// A buffered write (§3 "Write-set entry").
#[derive(Debug, Clone)]
pub struct WriteEntry {
    /// The key being written.
    pub key: Vec<u8>,
    /// The kind of write.
    pub op: Op,
    /// The pending payload (header-free; the header is stamped on at
    /// write-phase, see [`crate::manager`]).
    pub pending_payload: Vec<u8>,
    /// Placeholder until write-phase fills in the real commit timestamp.
    pub pending_ts: Ts,
}

/// Lifecycle state of a transaction (§4.4.3 "State machine").
///
/// `Idle` is not represented as a variant: a [`TransactionContext`] only
/// exists once a transaction has begun, so the `Idle -> Active` transition
/// happens at construction time rather than as a stored state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Reads and writes may be buffered.
    Active,
    /// Commit is in progress (locks held, validation/write underway).
    Committing,
    /// Commit succeeded.
    Committed,
    /// The transaction aborted; `reason` explains why.
    Aborted {
        /// Human-readable abort reason (e.g. "read-set mismatch on key").
        reason: String,
    },
    /// The underlying store failed during the commit write phase, after
    /// validation already succeeded (§7 `StoreFatal`). Distinct from
    /// `Aborted`: the transaction was *not* rolled back, some writes may
    /// already be durable, and this condition is documented as
    /// unrecoverable rather than a normal abort.
    Failed {
        /// Human-readable failure reason.
        reason: String,
    },
}

/// Per-transaction buffer of read and write intent (§4.3).
///
/// Owned exclusively by the single thread that begins it; never shared
/// across threads (§5 "A transaction context is *not* shared across
/// threads").
pub struct TransactionContext {
    /// Unique identity of this transaction, also used as its lock-table
    /// holder id.
    pub id: u64,
    /// Isolation level this transaction began at.
    pub isolation_level: IsolationLevel,
    /// Captured reads, in read order. Duplicate keys are retained
    /// (§3: "only the first is needed for validation, but implementers may
    /// keep all").
    pub read_set: Vec<ReadEntry>,
    /// Buffered writes, unique by key.
    pub write_set: Vec<WriteEntry>,
    /// The transaction's serialization point. Starts at `Ts::ABSENT` and is
    /// non-decreasing during validation.
    pub commit_ts: Ts,
    /// Current lifecycle state.
    pub status: TransactionStatus,
}

impl TransactionContext {
    /// Begins a new transaction with empty read/write sets (§4.3 `begin`).
    pub fn begin(id: u64, isolation_level: IsolationLevel) -> Self {
        TransactionContext {
            id,
            isolation_level,
            read_set: Vec::new(),
            write_set: Vec::new(),
            commit_ts: Ts::ABSENT,
            status: TransactionStatus::Active,
        }
    }

    /// Appends a read-set entry (§4.3 `record_read`).
    pub fn record_read(&mut self, key: Vec<u8>, value: Vec<u8>, ts: Ts) {
        self.read_set.push(ReadEntry {
            key,
            value,
            snapshot_ts: ts,
        });
    }

    /// Merges a write into the write set (§4.3 `local_write`).
    ///
    /// Lookup policy is linear search by key, as the spec allows. On a
    /// second write to an already-buffered key:
    /// - a definitive incoming op (`Insert`/`Delete`) replaces the entry
    ///   outright (a `Delete` clears the payload);
    /// - an `Update` is merged into the existing payload via `merge`, and
    ///   the existing op is preserved unless a later definitive write
    ///   promotes it. `Update` after a buffered `Delete` is forbidden and
    ///   returns [`Error::InvalidUsage`] rather than asserting/aborting the
    ///   process, per this crate's Rust-idiomatic error propagation.
    pub fn local_write(
        &mut self,
        key: &[u8],
        op: Op,
        payload: &[u8],
        merge: &dyn MergeOperator,
    ) -> Result<()> {
        if let Some(entry) = self.write_set.iter_mut().find(|e| e.key == key) {
            if op.is_definitive() {
                entry.op = op;
                entry.pending_payload = if op == Op::Delete {
                    Vec::new()
                } else {
                    payload.to_vec()
                };
            } else {
                if entry.op == Op::Delete {
                    return Err(Error::InvalidUsage(
                        "update follows delete on the same key within one transaction".into(),
                    ));
                }
                entry.pending_payload = merge.merge(key, Some(&entry.pending_payload), payload);
            }
            return Ok(());
        }

        self.write_set.push(WriteEntry {
            key: key.to_vec(),
            op,
            pending_payload: payload.to_vec(),
            pending_ts: Ts::ABSENT,
        });
        Ok(())
    }

    /// Orders the write set by `cmp`, required before commit Step 1
    /// (§4.3 `sort_write_set`, §4.4.3 step 1: sorted acquisition order
    /// across all committers prevents deadlock).
    pub fn sort_write_set(&mut self, cmp: &dyn KeyComparator) {
        self.write_set
            .sort_by(|a, b| cmp.compare(&a.key, &b.key));
    }

    /// Drops both sets for reuse after commit or abort (§4.3 `reset`).
    pub fn reset(&mut self) {
        self.read_set.clear();
        self.write_set.clear();
        self.commit_ts = Ts::ABSENT;
    }

    /// True if this key has a buffered write, used by validation's
    /// "locked by other" check (§4.4.3 step 2).
    pub fn write_set_contains(&self, key: &[u8]) -> bool {
        self.write_set.iter().any(|e| e.key == key)
    }
}

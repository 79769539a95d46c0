//! Transactional configuration (§6 "store configuration", §9 "Global
//! configuration struct for the underlying store").
//!
//! The transactional layer stores its own augmented configuration holding
//! the key comparator and merge-function pointer the store was configured
//! with, plus protocol-level knobs the spec leaves as open questions.

use std::sync::Arc;
use std::time::Duration;
use tictoc_core::IsolationLevel;
use tictoc_storage::{KeyComparator, MergeOperator};

/// Configuration shared by every transaction opened against a store.
///
/// Cloning is cheap: the comparator and merge operator are held behind
/// `Arc`, matching the "pass by value / borrowed reference" guidance in
/// spec §9.
#[derive(Clone)]
pub struct TransactionalConfig {
    /// Isolation level new transactions begin at. Only
    /// [`IsolationLevel::Serializable`] is meaningful today (§6).
    pub isolation_level: IsolationLevel,

    /// How long to sleep between lock-acquisition retries in commit Step 1
    /// (§4.4.3). The paper's value, and the original C implementation's
    /// `platform_sleep_ns(1000)`, is 1 microsecond.
    pub lock_backoff: Duration,

    /// Optional cap on lock-acquisition retries before giving up and
    /// aborting. The base design (§5 "Cancellation / timeouts") retries
    /// forever; this is the "implementers may add a bounded-retry policy"
    /// extension point, off by default.
    pub max_commit_retries: Option<u32>,

    /// When `true`, commit-timestamp finalization uses `max(commit_ts,
    /// cur_ts) + 1` for strict monotonicity, per the canonical TicToc paper.
    /// When `false` (the default, matching `transaction.c`'s
    /// `tictoc_validation`), plain `max` is used and two successive
    /// transactions on the same key may share a timestamp (§9 Open
    /// Question 1).
    pub strict_monotonic_commit_ts: bool,

    /// Key comparator used to sort the write set before locking (§4.3
    /// `sort_write_set`, §4.4.3 step 1).
    pub comparator: Arc<dyn KeyComparator>,

    /// Merge function used to collapse buffered `Update`s against an
    /// existing buffered value for the same key (§4.3 `local_write`).
    pub merge: Arc<dyn MergeOperator>,
}

impl TransactionalConfig {
    /// Builds a config from a comparator and merge operator, with every
    /// other field at its spec-matching default.
    pub fn new(comparator: Arc<dyn KeyComparator>, merge: Arc<dyn MergeOperator>) -> Self {
        TransactionalConfig {
            isolation_level: IsolationLevel::Serializable,
            lock_backoff: Duration::from_micros(1),
            max_commit_retries: None,
            strict_monotonic_commit_ts: false,
            comparator,
            merge,
        }
    }
}

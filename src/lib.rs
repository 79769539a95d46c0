//! A serializable transactional layer implementing the TicToc optimistic
//! concurrency-control protocol over an embedded ordered key-value store.
//!
//! This crate is a thin re-export of the workspace's four members:
//! - [`tictoc_core`] — shared types: the timestamp, the error model, the
//!   isolation level.
//! - [`tictoc_storage`] — the narrow `Store` trait the transactional core
//!   is built on, plus an in-memory reference implementation.
//! - [`tictoc_concurrency`] — the TicToc protocol itself: tuple codec,
//!   lock table, transaction context, and commit manager.
//! - [`tictoc_api`] — the handle applications actually construct and call.
//!
//! Typical usage:
//!
//! ```
//! use std::sync::Arc;
//! use tictoc_kv::{
//!     BTreeStore, ByteComparator, AppendMerge, TransactionalConfig, TransactionalStore,
//! };
//!
//! let config = TransactionalConfig::new(Arc::new(ByteComparator), Arc::new(AppendMerge));
//! let db = TransactionalStore::open(BTreeStore::new(AppendMerge), config);
//!
//! let mut txn = db.begin();
//! db.insert(&mut txn, b"key", b"value").unwrap();
//! db.commit(&mut txn).unwrap();
//!
//! let mut reader = db.begin();
//! assert_eq!(db.lookup(&mut reader, b"key").unwrap(), Some(b"value".to_vec()));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub use tictoc_api::{CommitOutcome, TransactionalStore};
pub use tictoc_concurrency::{
    LockTable, Op, TransactionContext, TransactionManager, TransactionStatus, TransactionalConfig,
    TupleCodec,
};
pub use tictoc_core::{Error, IsolationLevel, Result, Ts};
pub use tictoc_storage::{AppendMerge, BTreeStore, ByteComparator, KeyComparator, MergeOperator, Store};

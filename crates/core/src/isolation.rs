//! Isolation levels (§6 `set_isolation_level`).

/// Isolation level requested for a transaction.
///
/// Only [`IsolationLevel::Serializable`] is meaningful in the base design —
/// the TicToc protocol implemented here always validates for full
/// serializability. The variant exists so `set_isolation_level` has
/// something to accept and so a future snapshot-isolation mode (explicitly
/// a non-goal today, see spec §1) has somewhere to land without breaking
/// the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IsolationLevel {
    /// Full serializability via TicToc read/validate/write (the only level
    /// this crate actually implements).
    Serializable,
}

impl Default for IsolationLevel {
    fn default() -> Self {
        IsolationLevel::Serializable
    }
}

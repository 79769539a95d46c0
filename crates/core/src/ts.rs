//! The per-tuple commit timestamp (§3 "Timestamp (`TS`)").

use std::fmt;

/// A monotonic commit timestamp.
///
/// `0` is the sentinel meaning "absent / never written". Under the default
/// `max`-only commit-timestamp finalization (no `+1` bump, matching
/// `transaction.c`'s `tictoc_validation`), a tuple whose every read/write-set
/// timestamp was itself `0` commits with header `ts=0` too — so a
/// *committed* row can legitimately carry `ts=0`, this is not just the
/// pre-write sentinel. Only with `TransactionalConfig::strict_monotonic_commit_ts`
/// set does the manager guarantee a nonzero bump on every commit (see
/// `tictoc_concurrency::manager`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Ts(pub u64);

impl Ts {
    /// The sentinel value for "never written".
    pub const ABSENT: Ts = Ts(0);

    /// True if this timestamp is the absent sentinel.
    pub fn is_absent(self) -> bool {
        self.0 == 0
    }

    /// Returns the larger of `self` and `other`, per TicToc's
    /// `commit_ts <- max(commit_ts, cur_ts)` validation step (§4.4.3).
    pub fn max(self, other: Ts) -> Ts {
        Ts(self.0.max(other.0))
    }

    /// Little-endian byte encoding used in the on-disk tuple header.
    pub fn to_le_bytes(self) -> [u8; 8] {
        self.0.to_le_bytes()
    }

    /// Decode from the 8-byte little-endian tuple header prefix.
    pub fn from_le_bytes(bytes: [u8; 8]) -> Ts {
        Ts(u64::from_le_bytes(bytes))
    }
}

impl fmt::Display for Ts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Ts {
    fn from(v: u64) -> Self {
        Ts(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_is_zero() {
        assert!(Ts::ABSENT.is_absent());
        assert!(Ts(0).is_absent());
        assert!(!Ts(1).is_absent());
    }

    #[test]
    fn max_picks_larger() {
        assert_eq!(Ts(5).max(Ts(3)), Ts(5));
        assert_eq!(Ts(3).max(Ts(5)), Ts(5));
        assert_eq!(Ts(5).max(Ts(5)), Ts(5));
    }

    #[test]
    fn round_trips_through_bytes() {
        let ts = Ts(0xDEAD_BEEF_0000_1234);
        let bytes = ts.to_le_bytes();
        assert_eq!(Ts::from_le_bytes(bytes), ts);
    }

    #[test]
    fn ordering_is_numeric() {
        assert!(Ts(1) < Ts(2));
        assert!(Ts(100) > Ts(99));
    }
}

//! Timestamped tuple codec (§4.1).
//!
//! Every value stored under a key is `header || payload`, where `header` is
//! an 8-byte little-endian commit timestamp. §9's redesign note asks for an
//! explicit header type with accessors rather than casts over a packed
//! struct — [`TupleCodec`] is exactly that: the on-disk contract is purely
//! the 8-byte little-endian prefix, everything else is an accessor.

use tictoc_core::{Error, Result, Ts};
use tictoc_storage::Store;

/// Width in bytes of the timestamp header prefixed to every stored value.
pub const HEADER_LEN: usize = 8;

/// Encodes and decodes the `[ts:8 LE][payload]` on-disk tuple layout.
pub struct TupleCodec;

impl TupleCodec {
    /// Produces the bytes to hand to the store: `ts` little-endian followed
    /// by `payload` verbatim.
    pub fn encode(ts: Ts, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
        out.extend_from_slice(&ts.to_le_bytes());
        out.extend_from_slice(payload);
        out
    }

    /// Splits a stored value into its header timestamp and payload slice.
    ///
    /// Returns [`Error::Encoding`] if `stored` is shorter than the header —
    /// every value this codec itself produced satisfies the length
    /// invariant, so this only fires against data from outside the codec.
    pub fn decode(stored: &[u8]) -> Result<(Ts, &[u8])> {
        if stored.len() < HEADER_LEN {
            return Err(Error::Encoding(format!(
                "stored value too short for tuple header: {} bytes",
                stored.len()
            )));
        }
        let mut header = [0u8; HEADER_LEN];
        header.copy_from_slice(&stored[..HEADER_LEN]);
        Ok((Ts::from_le_bytes(header), &stored[HEADER_LEN..]))
    }

    /// Timestamp-only extraction (§4.1): a single consistent point lookup
    /// that returns just the header's timestamp, or [`Ts::ABSENT`] if the
    /// key does not exist. This is the sole means by which validation
    /// observes the store's current timestamps.
    pub fn ts_of<S: Store + ?Sized>(store: &S, key: &[u8]) -> Result<Ts> {
        match store.lookup(key)? {
            Some(stored) => Ok(TupleCodec::decode(&stored)?.0),
            None => Ok(Ts::ABSENT),
        }
    }

    /// Point lookup that strips the header, returning payload only — what
    /// `lookup` hands back to the application (§4.1 "strips the header
    /// when delivering values to the user").
    pub fn lookup_payload<S: Store + ?Sized>(store: &S, key: &[u8]) -> Result<Option<(Ts, Vec<u8>)>> {
        match store.lookup(key)? {
            Some(stored) => {
                let (ts, payload) = TupleCodec::decode(&stored)?;
                Ok(Some((ts, payload.to_vec())))
            }
            None => Ok(None),
        }
    }
}

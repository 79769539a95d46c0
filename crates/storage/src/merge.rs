//! The merge function supplied as part of store configuration (§6).

/// Combines an update delta with any existing value to produce a new value.
///
/// Used both by the store (for [`crate::Store::update`]) and by the
/// transaction layer's write-set collapsing logic (§4.3 `local_write`,
/// when a buffered `Update` is merged with a prior buffered value for the
/// same key).
pub trait MergeOperator: Send + Sync {
    /// `existing` is `None` when the key has never been written (or has
    /// been deleted). Returns the new value to store/buffer.
    fn merge(&self, key: &[u8], existing: Option<&[u8]>, delta: &[u8]) -> Vec<u8>;
}

/// A merge operator that appends the delta to whatever value exists,
/// useful for tests and as a default for applications with no merge
/// semantics of their own.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppendMerge;

impl MergeOperator for AppendMerge {
    fn merge(&self, _key: &[u8], existing: Option<&[u8]>, delta: &[u8]) -> Vec<u8> {
        match existing {
            Some(prev) => {
                let mut combined = Vec::with_capacity(prev.len() + delta.len());
                combined.extend_from_slice(prev);
                combined.extend_from_slice(delta);
                combined
            }
            None => delta.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_merge_with_no_prior_value() {
        let m = AppendMerge;
        assert_eq!(m.merge(b"k", None, b"delta"), b"delta".to_vec());
    }

    #[test]
    fn append_merge_appends_to_existing() {
        let m = AppendMerge;
        assert_eq!(m.merge(b"k", Some(b"base"), b"-suffix"), b"base-suffix".to_vec());
    }
}

//! Hash primitive and RFC 6962 domain separation.
//!
//! Leaf hash inputs are prefixed with `0x00` and inner hash inputs with
//! `0x01`. The distinct tags make it impossible for a crafted leaf to
//! collide with an internal node (second-preimage resistance across
//! levels).

use sha2::{Digest, Sha256};

/// Width in bytes of every hash in a tree.
pub const HASH_SIZE: usize = 32;

/// A 32-byte digest. Equality is bytewise.
pub type Hash = [u8; HASH_SIZE];

/// All-zero sentinel used as the trail root of an empty leaf set.
pub const NULL_HASH: Hash = [0u8; HASH_SIZE];

/// Domain tag prepended to leaf hash inputs.
const LEAF_TAG: u8 = 0x00;
/// Domain tag prepended to inner hash inputs.
const INNER_TAG: u8 = 0x01;

/// The pluggable hash primitive.
///
/// Implementations supply [`digest`](Self::digest); the domain-separated
/// leaf and inner helpers are derived from it. The digest must be
/// deterministic and collision resistant.
pub trait MerkleHasher {
    /// Hash an arbitrary byte string.
    fn digest(data: &[u8]) -> Hash;

    /// Hash of a leaf: `digest(0x00 || value)`.
    ///
    /// An absent leaf hashes the empty string with no tag byte, while
    /// `Some(b"")` hashes the bare tag. The asymmetry is kept for
    /// compatibility with existing trees.
    fn leaf_hash(value: Option<&[u8]>) -> Hash {
        match value {
            Some(value) => {
                let mut input = Vec::with_capacity(1 + value.len());
                input.push(LEAF_TAG);
                input.extend_from_slice(value);
                Self::digest(&input)
            }
            None => Self::digest(&[]),
        }
    }

    /// Hash of an inner node: `digest(0x01 || left || right)`.
    ///
    /// The children are plain byte slices rather than [`Hash`]es so that
    /// interior hashing stays agnostic of the digest width. A missing
    /// child is skipped, and the tag with it when the left child is the
    /// missing one; neither single-child form arises in a well-formed
    /// tree.
    fn inner_hash(left: Option<&[u8]>, right: Option<&[u8]>) -> Hash {
        let mut input = Vec::with_capacity(1 + 2 * HASH_SIZE);
        if let Some(left) = left {
            input.push(INNER_TAG);
            input.extend_from_slice(left);
        }
        if let Some(right) = right {
            input.extend_from_slice(right);
        }
        Self::digest(&input)
    }
}

/// SHA-256 implementation of [`MerkleHasher`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl MerkleHasher for Sha256Hasher {
    fn digest(data: &[u8]) -> Hash {
        Sha256::digest(data).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(s: &str) -> Hash {
        hex::decode(s)
            .expect("valid hex")
            .try_into()
            .expect("32 bytes")
    }

    #[test]
    fn test_rfc6962_empty_leaf() {
        // sha256(0x00)
        assert_eq!(
            Sha256Hasher::leaf_hash(Some(b"")),
            h("6e340b9cffb37a989ca544e6bb780a2c78901d3fb33738768511a30617afa01d")
        );
    }

    #[test]
    fn test_rfc6962_leaf() {
        // sha256(0x00 || "L123456")
        assert_eq!(
            Sha256Hasher::leaf_hash(Some(b"L123456")),
            h("395aa064aa4c29f7010acfe3f25db9485bbd4b91897b6ad7ad547639252b4d56")
        );
    }

    #[test]
    fn test_rfc6962_inner_node() {
        // sha256(0x01 || "N123" || "N456") — the children are raw 4-byte
        // values, exercising the width-agnostic interior hashing.
        assert_eq!(
            Sha256Hasher::inner_hash(Some(b"N123"), Some(b"N456")),
            h("aa217fe888e47007fa15edab33c2b492a722cb106c64667fc2b044444de66bbb")
        );
    }

    #[test]
    fn test_absent_leaf_differs_from_empty_leaf() {
        // None hashes the empty string without the tag byte.
        assert_eq!(Sha256Hasher::leaf_hash(None), Sha256Hasher::digest(&[]));
        assert_ne!(
            Sha256Hasher::leaf_hash(None),
            Sha256Hasher::leaf_hash(Some(b""))
        );
    }

    #[test]
    fn test_leaf_hashes_differ() {
        assert_ne!(
            Sha256Hasher::leaf_hash(Some(b"Hello")),
            Sha256Hasher::leaf_hash(Some(b"World"))
        );
    }

    #[test]
    fn test_second_preimage_resistance() {
        let leaf1 = Sha256Hasher::leaf_hash(Some(b"Hello"));
        let leaf2 = Sha256Hasher::leaf_hash(Some(b"World"));
        let inner = Sha256Hasher::inner_hash(Some(leaf1.as_slice()), Some(leaf2.as_slice()));
        // A leaf over the concatenation must not forge the inner node.
        let forged = Sha256Hasher::leaf_hash(Some(b"HelloWorld"));
        assert_ne!(inner, forged);
    }

    #[test]
    fn test_inner_hash_is_order_sensitive() {
        let left = Sha256Hasher::leaf_hash(Some(b"Hello"));
        let right = Sha256Hasher::leaf_hash(Some(b"World"));
        assert_ne!(
            Sha256Hasher::inner_hash(Some(left.as_slice()), Some(right.as_slice())),
            Sha256Hasher::inner_hash(Some(right.as_slice()), Some(left.as_slice()))
        );
    }
}

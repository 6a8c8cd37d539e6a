use thiserror::Error;

use crate::hash::Hash;

/// Alias for `core::result::Result<T, Error>`.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for tree, proof, and chained-proof operations.
///
/// Every failure is final: this is a verification library, so an error is
/// a negative answer, never a retryable condition.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A tree or proof over fewer than one leaf.
    #[error("invalid tree size {0}, must be at least 1")]
    InvalidSize(usize),

    /// The proven leaf index does not fall within the tree.
    #[error("index {index} out of range for total {total}")]
    IndexOutOfRange {
        /// Leaf index being proven.
        index: usize,
        /// Number of leaves in the committed tree.
        total: usize,
    },

    /// More aunt hashes than the anti-DoS ceiling allows.
    #[error("too many aunts: {0} exceeds the maximum of 100")]
    TooManyAunts(usize),

    /// The aunt count cannot produce a root for the claimed tree shape.
    #[error("aunt count {aunts} inconsistent with a tree of {total} leaves")]
    AuntsArityMismatch {
        /// Number of leaves in the (sub)tree being folded.
        total: usize,
        /// Number of aunt hashes remaining at this level.
        aunts: usize,
    },

    /// The recomputed leaf hash differs from the one stored in the proof.
    #[error("leaf hash mismatch: want {}, got {}", hex::encode(.want), hex::encode(.got))]
    LeafHashMismatch {
        /// Hash recomputed from the presented leaf bytes.
        want: Hash,
        /// Hash the proof carries.
        got: Hash,
    },

    /// The computed root differs from the expected root.
    #[error("root hash mismatch: want {}, got {}", hex::encode(.want), hex::encode(.got))]
    RootMismatch {
        /// Root the verifier was given.
        want: Hash,
        /// Root computed from the proof.
        got: Hash,
    },

    /// The operator chain and the key path have different lengths.
    #[error("key path has {keys} segments but the chain has {ops} operators")]
    KeyLengthMismatch {
        /// Number of operators in the chain.
        ops: usize,
        /// Number of key path segments.
        keys: usize,
    },

    /// An operator's key does not match its key path segment.
    #[error("key mismatch on operator {op_index}: want {want:?}, got {got:?}")]
    KeyMismatch {
        /// Position of the operator in the chain.
        op_index: usize,
        /// Key expected from the path segment.
        want: String,
        /// Key the operator carries.
        got: String,
    },

    /// An operator failed while running.
    #[error("operator {op_index} failed: {source}")]
    OperatorFailed {
        /// Position of the operator in the chain.
        op_index: usize,
        /// The operator's own failure.
        source: Box<Error>,
    },

    /// An operator received arguments it cannot process.
    #[error("invalid operator arguments: {0}")]
    InvalidArguments(String),
}

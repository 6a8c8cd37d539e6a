//! RFC 6962-style binary Merkle trees, inclusion proofs, and chained
//! (generalized) Merkle proofs.
//!
//! Leaves are ordered byte slices hashed with `0x00`/`0x01` domain
//! separation, and every split keeps the left subtree a full power of two
//! (the RFC 6962 shape). On top of the plain tree sit:
//!
//! - [`SimpleMap`] — a sorted key/value map whose entries are framed with
//!   a length-prefix codec and committed as tree leaves.
//! - [`SimpleProof`] — `(total, index, leaf_hash, aunts)` inclusion
//!   proofs, generated per leaf ([`proofs_from_leaves`],
//!   [`proofs_from_map`]) and verified against a known root.
//! - [`ops`] — typed proof operators chained under a [`KeyPath`], for
//!   proofs that hop across several trees (an app tree committing to
//!   store trees, and so on).
//!
//! The hash primitive and the length-prefix codec are pluggable through
//! [`MerkleHasher`] and [`LengthCodec`]; [`Sha256Hasher`] and
//! [`SimpleCodec`] are the stock implementations.

#![warn(missing_docs)]

mod codec;
mod error;
mod hash;
mod map;
pub mod ops;
mod proof;
mod tree;

pub use codec::{LengthCodec, SimpleCodec, zigzag_decode, zigzag_encode};
pub use error::{Error, Result};
pub use hash::{HASH_SIZE, Hash, MerkleHasher, NULL_HASH, Sha256Hasher};
pub use map::{SimpleMap, root_from_map};
pub use ops::{PROOF_OP_SIMPLE_VALUE, ProofOperator, SimpleValueOp};
pub use proof::{MAX_AUNTS, SimpleProof, proofs_from_leaves, proofs_from_map};
pub use simplemerk_path::{KeyPath, PathError, SubKey};
pub use tree::{
    root_from_leaves, root_from_leaves_iterative, root_from_leaves_recursive, split_point,
};

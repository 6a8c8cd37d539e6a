//! Chained (generalized) Merkle proofs.
//!
//! A chained proof is an ordered list of operators, each consuming the
//! previous layer's output and producing the Merkle root of its own tree,
//! so a value can be proven through an app tree that commits to store
//! trees. Verification threads a byte vector through the operators while
//! matching each operator's key against the key path in reverse: the
//! first operator consumes the leaf-most segment.

use std::marker::PhantomData;

use simplemerk_path::KeyPath;

use crate::{
    Error, Result,
    codec::{LengthCodec, SimpleCodec},
    hash::{Hash, MerkleHasher, Sha256Hasher},
    proof::SimpleProof,
};

/// Type tag of [`SimpleValueOp`].
pub const PROOF_OP_SIMPLE_VALUE: &str = "SimpleValueOp";

/// One layer of a chained proof.
///
/// `run` takes leaf values for this layer's tree and returns the Merkle
/// root of the corresponding tree. Inputs and outputs are lists of byte
/// vectors so a single layer can cover multiple leaves (range proofs).
/// Operators are opaque to the chain.
pub trait ProofOperator {
    /// Tag identifying the operator kind.
    fn op_type(&self) -> &str;

    /// The key this operator proves under, matched against the key path.
    fn key(&self) -> &[u8];

    /// Transform this layer's input into the next layer's input.
    fn run(&self, args: Vec<Vec<u8>>) -> Result<Vec<Vec<u8>>>;
}

/// Verify a chain of operators against a known root and key path.
///
/// Operators apply in order to `args`; operator `i` must carry the key of
/// path segment `len - 1 - i`. The final output, hashed once, must equal
/// `root`.
pub fn verify<H: MerkleHasher>(
    ops: &[&dyn ProofOperator],
    root: &Hash,
    key_path: &KeyPath,
    mut args: Vec<Vec<u8>>,
) -> Result<()> {
    if ops.len() != key_path.len() {
        return Err(Error::KeyLengthMismatch {
            ops: ops.len(),
            keys: key_path.len(),
        });
    }

    for (op_index, op) in ops.iter().enumerate() {
        // The first operator proves the deepest layer, so keys are
        // consumed from the end of the path.
        let expected = key_path[key_path.len() - 1 - op_index].to_bytes();
        if op.key() != expected.as_slice() {
            return Err(Error::KeyMismatch {
                op_index,
                want: String::from_utf8_lossy(&expected).into_owned(),
                got: String::from_utf8_lossy(op.key()).into_owned(),
            });
        }
        args = op.run(args).map_err(|source| Error::OperatorFailed {
            op_index,
            source: Box::new(source),
        })?;
    }

    let Some(output) = args.first() else {
        return Err(Error::InvalidArguments(
            "operator chain produced no output".into(),
        ));
    };
    let computed = H::digest(output);
    if computed != *root {
        return Err(Error::RootMismatch {
            want: *root,
            got: computed,
        });
    }
    Ok(())
}

/// Verify that a single `value` is committed under `key_path` to `root`.
pub fn verify_value<H: MerkleHasher>(
    ops: &[&dyn ProofOperator],
    root: &Hash,
    key_path: &KeyPath,
    value: &[u8],
) -> Result<()> {
    verify::<H>(ops, root, key_path, vec![value.to_vec()])
}

/// Proof operator for a single value of a [`SimpleMap`]-shaped tree.
///
/// Recomputes the map leaf `codec(key) || codec(digest(value))`, checks it
/// against the embedded proof's leaf hash, and emits the tree root the
/// proof commits to.
///
/// [`SimpleMap`]: crate::SimpleMap
#[derive(Debug, Clone)]
pub struct SimpleValueOp<H = Sha256Hasher, C = SimpleCodec> {
    key: Vec<u8>,
    proof: SimpleProof,
    _hashing: PhantomData<(H, C)>,
}

impl<H, C> SimpleValueOp<H, C> {
    /// Build the operator from the map key and the inclusion proof of its
    /// encoded entry.
    pub fn new(key: impl Into<Vec<u8>>, proof: SimpleProof) -> Self {
        SimpleValueOp {
            key: key.into(),
            proof,
            _hashing: PhantomData,
        }
    }
}

impl<H: MerkleHasher, C: LengthCodec> ProofOperator for SimpleValueOp<H, C> {
    fn op_type(&self) -> &str {
        PROOF_OP_SIMPLE_VALUE
    }

    fn key(&self) -> &[u8] {
        &self.key
    }

    fn run(&self, args: Vec<Vec<u8>>) -> Result<Vec<Vec<u8>>> {
        let [value] = args.as_slice() else {
            return Err(Error::InvalidArguments(format!(
                "expected 1 arg, got {}",
                args.len()
            )));
        };

        let value_hash = H::digest(value);
        let mut encoded = C::encode(&self.key);
        encoded.extend_from_slice(&C::encode(&value_hash));

        let kv_hash = H::leaf_hash(Some(&encoded));
        if kv_hash != *self.proof.leaf_hash() {
            return Err(Error::LeafHashMismatch {
                want: kv_hash,
                got: *self.proof.leaf_hash(),
            });
        }

        Ok(vec![self.proof.compute_root_hash::<H>()?.to_vec()])
    }
}

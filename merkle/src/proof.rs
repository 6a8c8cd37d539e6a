//! Inclusion proofs for byte-slice trees.
//!
//! A [`SimpleProof`] carries the leaf hash and the chain of aunt hashes
//! from the leaf's sibling up to (but excluding) the root. The convention
//! includes the leaf hash and excludes the root hash; the generalized
//! proof chain relies on it staying that way.

use std::{collections::HashMap, fmt};

use crate::{
    Error, Result,
    codec::LengthCodec,
    hash::{Hash, MerkleHasher, NULL_HASH},
    map::SimpleMap,
    tree::{split_point, split_point_unchecked},
};

/// Maximum number of aunts in a proof.
///
/// Corresponds to a tree of 2^100 leaves: a ceiling against oversized
/// proofs, not a practical limit.
pub const MAX_AUNTS: usize = 100;

/// An inclusion proof for one leaf of a byte-slice tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleProof {
    total: usize,
    index: usize,
    leaf_hash: Hash,
    aunts: Vec<Hash>,
}

impl SimpleProof {
    /// Build a proof from its parts, validating basic consistency.
    pub fn new(total: usize, index: usize, leaf_hash: Hash, aunts: Vec<Hash>) -> Result<Self> {
        if total < 1 {
            return Err(Error::InvalidSize(total));
        }
        if index >= total {
            return Err(Error::IndexOutOfRange { index, total });
        }
        if aunts.len() > MAX_AUNTS {
            return Err(Error::TooManyAunts(aunts.len()));
        }
        Ok(SimpleProof {
            total,
            index,
            leaf_hash,
            aunts,
        })
    }

    /// Number of leaves in the committed tree.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Index of the proven leaf.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Domain-separated hash of the proven leaf.
    pub fn leaf_hash(&self) -> &Hash {
        &self.leaf_hash
    }

    /// Sibling hashes from the leaf's sibling up to the root's child.
    pub fn aunts(&self) -> &[Hash] {
        &self.aunts
    }

    /// Check that this proof commits `leaf` to `root`.
    pub fn verify<H: MerkleHasher>(&self, root: &Hash, leaf: &[u8]) -> Result<()> {
        let leaf_hash = H::leaf_hash(Some(leaf));
        if leaf_hash != self.leaf_hash {
            return Err(Error::LeafHashMismatch {
                want: leaf_hash,
                got: self.leaf_hash,
            });
        }
        let computed = self.compute_root_hash::<H>()?;
        if computed != *root {
            return Err(Error::RootMismatch {
                want: *root,
                got: computed,
            });
        }
        Ok(())
    }

    /// Recompute the root this proof commits to. Does not verify the
    /// result against anything.
    pub fn compute_root_hash<H: MerkleHasher>(&self) -> Result<Hash> {
        compute_root_from_aunts::<H>(self.total, self.index, &self.leaf_hash, &self.aunts)
    }
}

impl fmt::Display for SimpleProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SimpleProof {{")?;
        writeln!(f, "  total:     {}", self.total)?;
        writeln!(f, "  index:     {}", self.index)?;
        writeln!(f, "  leaf_hash: {}", hex::encode_upper(self.leaf_hash))?;
        for aunt in &self.aunts {
            writeln!(f, "  aunt:      {}", hex::encode_upper(aunt))?;
        }
        write!(f, "}}")
    }
}

/// Fold a leaf hash with its aunt chain up to the root of a tree with
/// `total` leaves.
///
/// The aunt count must match the depth of `index` under the RFC 6962
/// split exactly; any deviation fails.
fn compute_root_from_aunts<H: MerkleHasher>(
    total: usize,
    index: usize,
    leaf_hash: &Hash,
    inner: &[Hash],
) -> Result<Hash> {
    if total < 1 {
        return Err(Error::InvalidSize(total));
    }
    if index >= total {
        return Err(Error::IndexOutOfRange { index, total });
    }
    if total == 1 {
        if !inner.is_empty() {
            return Err(Error::AuntsArityMismatch {
                total,
                aunts: inner.len(),
            });
        }
        return Ok(*leaf_hash);
    }
    let Some((last, rest)) = inner.split_last() else {
        return Err(Error::AuntsArityMismatch {
            total,
            aunts: inner.len(),
        });
    };
    let split = split_point(total)?;
    if index < split {
        let left = compute_root_from_aunts::<H>(split, index, leaf_hash, rest)?;
        Ok(H::inner_hash(Some(left.as_slice()), Some(last.as_slice())))
    } else {
        let right = compute_root_from_aunts::<H>(total - split, index - split, leaf_hash, rest)?;
        Ok(H::inner_hash(Some(last.as_slice()), Some(right.as_slice())))
    }
}

/// Which side a trail node's sibling subtree hangs on, and where it lives
/// in the arena.
#[derive(Debug, Clone, Copy)]
enum Sibling {
    None,
    Left(usize),
    Right(usize),
}

/// One node of the build-time proof trail.
#[derive(Debug, Clone, Copy)]
struct TrailNode {
    hash: Hash,
    parent: Option<usize>,
    sibling: Sibling,
}

/// Arena of trail nodes. Upward links are indices, so the leaf-to-root
/// walk needs no back-references and ownership stays top-down.
#[derive(Debug, Default)]
struct Trail {
    nodes: Vec<TrailNode>,
}

impl Trail {
    fn push(&mut self, hash: Hash) -> usize {
        self.nodes.push(TrailNode {
            hash,
            parent: None,
            sibling: Sibling::None,
        });
        self.nodes.len() - 1
    }

    /// Recursive trail construction mirroring the tree recursion. Returns
    /// the leaf node indices in leaf order and the subtree root index.
    fn build<H, T>(&mut self, items: &[T]) -> (Vec<usize>, usize)
    where
        H: MerkleHasher,
        T: AsRef<[u8]>,
    {
        match items {
            [] => {
                let root = self.push(NULL_HASH);
                (Vec::new(), root)
            }
            [item] => {
                let leaf = self.push(H::leaf_hash(Some(item.as_ref())));
                (vec![leaf], leaf)
            }
            _ => {
                let split = split_point_unchecked(items.len());
                let (mut leaves, left_root) = self.build::<H, T>(&items[..split]);
                let (right_leaves, right_root) = self.build::<H, T>(&items[split..]);

                let left_hash = self.nodes[left_root].hash;
                let right_hash = self.nodes[right_root].hash;
                let root = self.push(H::inner_hash(
                    Some(left_hash.as_slice()),
                    Some(right_hash.as_slice()),
                ));

                self.nodes[left_root].parent = Some(root);
                self.nodes[left_root].sibling = Sibling::Right(right_root);
                self.nodes[right_root].parent = Some(root);
                self.nodes[right_root].sibling = Sibling::Left(left_root);

                leaves.extend(right_leaves);
                (leaves, root)
            }
        }
    }

    /// Aunts for a leaf in leaf-to-root order: at each level, the hash on
    /// the other side of the path.
    fn flatten_aunts(&self, leaf: usize) -> Vec<Hash> {
        let mut aunts = Vec::new();
        let mut current = Some(leaf);
        while let Some(node_ix) = current {
            let node = self.nodes[node_ix];
            match node.sibling {
                Sibling::Left(other) | Sibling::Right(other) => {
                    aunts.push(self.nodes[other].hash)
                }
                Sibling::None => {}
            }
            current = node.parent;
        }
        aunts
    }
}

/// Compute the root and one inclusion proof per leaf; `proofs[i]` proves
/// `items[i]`.
///
/// An empty input yields the all-zero sentinel root and no proofs.
pub fn proofs_from_leaves<H, T>(items: &[T]) -> Result<(Hash, Vec<SimpleProof>)>
where
    H: MerkleHasher,
    T: AsRef<[u8]>,
{
    let mut trail = Trail::default();
    let (leaves, root) = trail.build::<H, T>(items);
    let root_hash = trail.nodes[root].hash;

    let mut proofs = Vec::with_capacity(leaves.len());
    for (index, leaf) in leaves.into_iter().enumerate() {
        proofs.push(SimpleProof::new(
            items.len(),
            index,
            trail.nodes[leaf].hash,
            trail.flatten_aunts(leaf),
        )?);
    }
    Ok((root_hash, proofs))
}

/// Root and per-key inclusion proofs for a key/value mapping.
///
/// Each proof covers the encoded entry `codec(key) || codec(digest(value))`
/// at its position in the sorted map. Returns the root, a proof per key,
/// and the keys in their sorted (leaf) order.
pub fn proofs_from_map<H, C, K, V, I>(
    entries: I,
) -> Result<(Hash, HashMap<String, SimpleProof>, Vec<String>)>
where
    H: MerkleHasher,
    C: LengthCodec,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<[u8]>,
{
    let mut map = SimpleMap::<H, C>::from_entries(entries);
    let pairs = map.sorted_pairs();
    let encoded: Vec<Vec<u8>> = pairs.iter().map(|pair| pair.encoded::<C>()).collect();
    // Keys entered the map as `&str`, so the bytes are valid UTF-8.
    let keys: Vec<String> = pairs
        .iter()
        .map(|pair| String::from_utf8_lossy(&pair.key).into_owned())
        .collect();

    let (root, proof_list) = proofs_from_leaves::<H, _>(&encoded)?;
    let proofs = keys.iter().cloned().zip(proof_list).collect();
    Ok((root, proofs, keys))
}

//! Root-hash computation over an ordered list of byte-slice leaves.
//!
//! Trees have the RFC 6962 shape: at every split the left subtree holds
//! the largest power of two strictly smaller than the leaf count, so the
//! left side is always full.
//!
//! Two equivalent algorithms are provided. The recursive form follows the
//! split rule directly; the iterative form repeatedly pairs adjacent
//! hashes in place, carrying an unpaired tail element up unchanged, which
//! produces the same shape without deep call stacks on large inputs.
//! [`root_from_leaves`] delegates to the iterative form.

use crate::{
    Error, Result,
    hash::{Hash, MerkleHasher},
};

/// The largest power of two strictly less than `length`, or `0` for a
/// single leaf.
///
/// This is the RFC 6962 split rule: `length / 2 <= split < length`, and
/// the left subtree stays a full power of two.
pub fn split_point(length: usize) -> Result<usize> {
    if length < 1 {
        return Err(Error::InvalidSize(length));
    }
    if length == 1 {
        return Ok(0);
    }
    Ok(split_point_unchecked(length))
}

/// Split point without the size checks. `length` must be at least 2.
pub(crate) fn split_point_unchecked(length: usize) -> usize {
    debug_assert!(length >= 2);
    1 << (usize::BITS - 1 - (length - 1).leading_zeros())
}

/// Merkle root of `items` in the given order, or `None` for empty input.
pub fn root_from_leaves<H, T>(items: &[T]) -> Option<Hash>
where
    H: MerkleHasher,
    T: AsRef<[u8]>,
{
    root_from_leaves_iterative::<H, T>(items)
}

/// Recursive root computation, following the split rule directly.
pub fn root_from_leaves_recursive<H, T>(items: &[T]) -> Option<Hash>
where
    H: MerkleHasher,
    T: AsRef<[u8]>,
{
    match items {
        [] => None,
        [item] => Some(H::leaf_hash(Some(item.as_ref()))),
        _ => {
            let split = split_point_unchecked(items.len());
            let left = root_from_leaves_recursive::<H, T>(&items[..split])?;
            let right = root_from_leaves_recursive::<H, T>(&items[split..])?;
            Some(H::inner_hash(Some(left.as_slice()), Some(right.as_slice())))
        }
    }
}

/// Iterative root computation; bit-identical to the recursive form.
pub fn root_from_leaves_iterative<H, T>(items: &[T]) -> Option<Hash>
where
    H: MerkleHasher,
    T: AsRef<[u8]>,
{
    let mut hashes: Vec<Hash> = items
        .iter()
        .map(|item| H::leaf_hash(Some(item.as_ref())))
        .collect();

    let mut size = hashes.len();
    loop {
        match size {
            0 => return None,
            1 => return Some(hashes[0]),
            _ => {
                let mut read = 0;
                let mut write = 0;
                while read < size {
                    if read + 1 < size {
                        let left = hashes[read];
                        let right = hashes[read + 1];
                        hashes[write] =
                            H::inner_hash(Some(left.as_slice()), Some(right.as_slice()));
                        read += 2;
                    } else {
                        // The unpaired tail element moves up a level
                        // unchanged; re-wrapping it would diverge from the
                        // power-of-two split.
                        hashes[write] = hashes[read];
                        read += 1;
                    }
                    write += 1;
                }
                size = write;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::hash::Sha256Hasher;

    #[test]
    fn test_split_point_table() {
        assert!(matches!(split_point(0), Err(Error::InvalidSize(0))));
        let table = [
            (1, 0),
            (2, 1),
            (3, 2),
            (4, 2),
            (5, 4),
            (10, 8),
            (20, 16),
            (100, 64),
            (255, 128),
            (256, 128),
            (257, 256),
        ];
        for (length, expected) in table {
            assert_eq!(split_point(length).expect("valid length"), expected);
        }
    }

    #[test]
    fn test_empty_input_has_no_root() {
        let items: Vec<Vec<u8>> = Vec::new();
        assert_eq!(root_from_leaves_recursive::<Sha256Hasher, _>(&items), None);
        assert_eq!(root_from_leaves_iterative::<Sha256Hasher, _>(&items), None);
    }

    #[test]
    fn test_single_leaf_root_is_the_leaf_hash() {
        let items = [b"only".to_vec()];
        assert_eq!(
            root_from_leaves::<Sha256Hasher, _>(&items),
            Some(Sha256Hasher::leaf_hash(Some(b"only")))
        );
    }

    #[test]
    fn test_two_leaf_root_is_the_inner_hash() {
        let items = [b"left".to_vec(), b"right".to_vec()];
        let left = Sha256Hasher::leaf_hash(Some(b"left"));
        let right = Sha256Hasher::leaf_hash(Some(b"right"));
        assert_eq!(
            root_from_leaves::<Sha256Hasher, _>(&items),
            Some(Sha256Hasher::inner_hash(
                Some(left.as_slice()),
                Some(right.as_slice())
            ))
        );
    }

    proptest! {
        #[test]
        fn test_recursive_matches_iterative(items in prop::collection::vec(
            prop::collection::vec(any::<u8>(), 0..64),
            1..200,
        )) {
            prop_assert_eq!(
                root_from_leaves_recursive::<Sha256Hasher, _>(&items),
                root_from_leaves_iterative::<Sha256Hasher, _>(&items)
            );
        }
    }
}

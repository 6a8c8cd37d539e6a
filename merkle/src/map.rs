//! Merkle root of a key/value map.
//!
//! Each entry becomes `codec(key) || codec(digest(value))` and the entries
//! are sorted before hashing, so the root is independent of insertion
//! order.

use std::marker::PhantomData;

use crate::{
    codec::LengthCodec,
    hash::{Hash, MerkleHasher},
    tree::root_from_leaves,
};

/// One map entry: the UTF-8 key bytes and the hash of the value.
///
/// The value is stored hashed, so an entry can be compared against a
/// cached one to decide whether the value itself needs fetching.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct KvPair {
    // Field order drives the derived ordering: key bytes first, value hash
    // as the tiebreak for duplicate keys. Byte-lexicographic order equals
    // the uppercase-hex string order used by other implementations, since
    // the byte-to-hex mapping preserves order.
    pub key: Vec<u8>,
    pub value_hash: Hash,
}

impl KvPair {
    fn new<H: MerkleHasher>(key: &str, value: &[u8]) -> Self {
        KvPair {
            key: key.as_bytes().to_vec(),
            value_hash: H::digest(value),
        }
    }

    /// The tree leaf for this entry: `codec(key) || codec(value_hash)`.
    pub fn encoded<C: LengthCodec>(&self) -> Vec<u8> {
        let mut out = C::encode(&self.key);
        out.extend_from_slice(&C::encode(&self.value_hash));
        out
    }
}

/// Merkle tree over a key/value map.
///
/// [`hash`](Self::hash) sorts the entries and computes the root; it is
/// idempotent until the next [`set`](Self::set) reverts the map to its
/// unsorted state. Not safe for concurrent mutation; share it only after
/// hashing.
#[derive(Debug, Clone)]
pub struct SimpleMap<H, C> {
    kvs: Vec<KvPair>,
    sorted: bool,
    _hashing: PhantomData<(H, C)>,
}

impl<H, C> SimpleMap<H, C> {
    /// An empty map.
    pub fn new() -> Self {
        SimpleMap {
            kvs: Vec::new(),
            sorted: true,
            _hashing: PhantomData,
        }
    }

    /// Number of entries, duplicates included.
    pub fn len(&self) -> usize {
        self.kvs.len()
    }

    /// Returns `true` if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.kvs.is_empty()
    }
}

impl<H, C> Default for SimpleMap<H, C> {
    fn default() -> Self {
        SimpleMap::new()
    }
}

impl<H: MerkleHasher, C: LengthCodec> SimpleMap<H, C> {
    /// Build a map from `(key, value)` entries.
    pub fn from_entries<K, V, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<[u8]>,
    {
        let mut map = SimpleMap::new();
        for (key, value) in entries {
            map.set(key.as_ref(), value.as_ref());
        }
        map
    }

    /// Record `key` with the hash of `value`. Keys are not deduplicated.
    pub fn set(&mut self, key: &str, value: &[u8]) {
        self.sorted = false;
        self.kvs.push(KvPair::new::<H>(key, value));
    }

    fn sort(&mut self) {
        if !self.sorted {
            self.kvs.sort();
            self.sorted = true;
        }
    }

    /// Merkle root of the entries sorted by key (and by value hash for
    /// duplicate keys), or `None` for an empty map.
    pub fn hash(&mut self) -> Option<Hash> {
        self.sort();
        let encoded: Vec<Vec<u8>> = self.kvs.iter().map(KvPair::encoded::<C>).collect();
        root_from_leaves::<H, _>(&encoded)
    }

    /// The entries in sorted order.
    pub(crate) fn sorted_pairs(&mut self) -> &[KvPair] {
        self.sort();
        &self.kvs
    }
}

/// Merkle root of a key/value mapping, independent of iteration order.
pub fn root_from_map<H, C, K, V, I>(entries: I) -> Option<Hash>
where
    H: MerkleHasher,
    C: LengthCodec,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<[u8]>,
{
    SimpleMap::<H, C>::from_entries(entries).hash()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{codec::SimpleCodec, hash::Sha256Hasher};

    type TestMap = SimpleMap<Sha256Hasher, SimpleCodec>;

    fn root(entries: &[(&str, &str)]) -> Option<Hash> {
        root_from_map::<Sha256Hasher, SimpleCodec, _, _, _>(
            entries.iter().map(|(k, v)| (*k, v.as_bytes())),
        )
    }

    fn h(s: &str) -> Hash {
        hex::decode(s)
            .expect("valid hex")
            .try_into()
            .expect("32 bytes")
    }

    #[test]
    fn test_known_roots() {
        assert_eq!(
            root(&[("key1", "value1")]),
            Some(h(
                "a44d3cc7daba1a4600b00a2434b30f8b970652169810d6dfa9fb1793a2189324"
            ))
        );
        assert_eq!(
            root(&[("key1", "value2")]),
            Some(h(
                "0638e99b3445caec9d95c05e1a3fc1487b4ddec6a952ff337080360b0dcc078c"
            ))
        );
        assert_eq!(
            root(&[("key1", "value1"), ("key2", "value2")]),
            Some(h(
                "8fd19b19e7bb3f2b3ee0574027d8a5a4cec370464ea2db2fbfa5c7d35bb0cff3"
            ))
        );
        assert_eq!(
            root(&[("key1", "value1"), ("key2", "value2"), ("key3", "value3")]),
            Some(h(
                "1dd674ec6782a0d586a903c9c63326a41cbe56b3bba33ed6ff5b527af6efb3dc"
            ))
        );
    }

    #[test]
    fn test_root_ignores_insertion_order() {
        assert_eq!(
            root(&[("key1", "value1"), ("key2", "value2")]),
            root(&[("key2", "value2"), ("key1", "value1")])
        );
        assert_eq!(
            root(&[("key1", "value1"), ("key2", "value2"), ("key3", "value3")]),
            root(&[("key3", "value3"), ("key1", "value1"), ("key2", "value2")])
        );
    }

    #[test]
    fn test_empty_map_has_no_root() {
        assert_eq!(TestMap::new().hash(), None);
    }

    #[test]
    fn test_hash_is_idempotent_until_set() {
        let mut map = TestMap::new();
        map.set("key1", b"value1");
        let first = map.hash();
        assert_eq!(map.hash(), first);

        map.set("key2", b"value2");
        assert_ne!(map.hash(), first);
    }
}

use std::{fmt, ops::Index, slice, str::FromStr};

use itertools::Itertools;

use crate::{PathError, SubKey};

/// A hierarchical key: an ordered sequence of [`SubKey`] segments.
///
/// Textual form is `/seg1/seg2/…` with a mandatory leading `/` and no
/// empty segments. A path with no segments has no textual form; rendering
/// one produces the bare prefix `/`, which does not parse back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPath {
    segments: Vec<SubKey>,
}

impl KeyPath {
    /// An empty key path.
    pub fn new() -> Self {
        KeyPath::default()
    }

    /// Append a segment to the end of the path.
    pub fn append(&mut self, key: SubKey) {
        self.segments.push(key);
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` if the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The segment at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&SubKey> {
        self.segments.get(index)
    }

    /// Iterate over the segments in order.
    pub fn iter(&self) -> slice::Iter<'_, SubKey> {
        self.segments.iter()
    }
}

impl FromStr for KeyPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, PathError> {
        let rest = s.strip_prefix('/').ok_or(PathError::InvalidPrefix)?;
        let segments = rest
            .split('/')
            .map(SubKey::parse_segment)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(KeyPath { segments })
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments.iter().map(SubKey::segment).join("/"))
    }
}

impl Index<usize> for KeyPath {
    type Output = SubKey;

    fn index(&self, index: usize) -> &SubKey {
        &self.segments[index]
    }
}

impl FromIterator<SubKey> for KeyPath {
    fn from_iter<I: IntoIterator<Item = SubKey>>(iter: I) -> Self {
        KeyPath {
            segments: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for KeyPath {
    type Item = SubKey;
    type IntoIter = std::vec::IntoIter<SubKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.into_iter()
    }
}

impl<'a> IntoIterator for &'a KeyPath {
    type Item = &'a SubKey;
    type IntoIter = slice::Iter<'a, SubKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

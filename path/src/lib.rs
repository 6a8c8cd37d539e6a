//! Hierarchical key paths for chained Merkle proofs.
//!
//! A generalized Merkle proof traverses several chained trees, and each
//! layer is addressed by a key. [`KeyPath`] is the ordered list of those
//! keys with a reversible textual form: `/`-separated segments, each
//! spelled either as a percent-encoded string or as `x:` followed by hex
//! digits.
//!
//! The two spellings decode to the same bytes and are interchangeable;
//! URL encoding reads better for ASCII keys while hex is denser for raw
//! binary ones.
//!
//! ```
//! use simplemerk_path::{KeyPath, SubKey};
//!
//! let mut path = KeyPath::new();
//! path.append(SubKey::url("App").unwrap());
//! path.append(SubKey::url("IBC").unwrap());
//! path.append(SubKey::hex(vec![0x01, 0x02, 0x03]).unwrap());
//!
//! assert_eq!(path.to_string(), "/App/IBC/x:010203");
//! assert_eq!(path.to_string().parse::<KeyPath>().unwrap(), path);
//! ```

#![warn(missing_docs)]

mod error;
mod key_path;
mod subkey;

pub use error::PathError;
pub use key_path::KeyPath;
pub use subkey::SubKey;

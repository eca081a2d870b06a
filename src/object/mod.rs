//! Represents the git concept of an "object" which is a tuple of
//! object type and binary data identified by the hash of the binary data.
//!
//! Only the object kinds needed to get from a reference to a tree are
//! modeled: [`Commit`] and [`Tree`]. Both are loaded through an
//! [`ObjectDatabase`](crate::ObjectDatabase).

mod attribution;
pub use attribution::Attribution;

mod commit;
pub use commit::Commit;

pub(crate) mod id;
pub use id::{Id, ParseIdError};

mod kind;
pub use kind::Kind;

pub(crate) mod parse_utils;

mod tree;
pub use tree::{Tree, TreeEntry};

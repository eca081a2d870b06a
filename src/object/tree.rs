use std::slice;

use super::id::ID_LEN;
use super::{parse_utils, Id};

use crate::{Error, FileMode, ObjectDatabase, Result};

/// A single record in a tree object: file mode, name, and the ID of the
/// blob, tree, or commit (submodule) it refers to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TreeEntry {
    mode: FileMode,
    name: Vec<u8>,
    id: Id,
}

impl TreeEntry {
    /// Return the entry's file mode.
    pub fn mode(&self) -> FileMode {
        self.mode
    }

    /// Return the entry's name. Git doesn't require names to be UTF-8.
    pub fn name(&self) -> &[u8] {
        &self.name
    }

    /// Return the entry's name, replacing any invalid UTF-8.
    pub fn name_lossy(&self) -> String {
        String::from_utf8_lossy(&self.name).into_owned()
    }

    /// Return the ID of the object this entry refers to.
    pub fn id(&self) -> Id {
        self.id
    }

    /// Returns true if this entry is a subdirectory.
    pub fn is_tree(&self) -> bool {
        self.mode == FileMode::Tree
    }
}

/// A tree object loaded from an object database.
///
/// Like `Commit`, a `Tree` borrows the `ObjectDatabase` it came from.
#[derive(Clone, Debug)]
pub struct Tree<'r> {
    odb: &'r ObjectDatabase,
    id: Id,
    entries: Vec<TreeEntry>,
}

impl<'r> Tree<'r> {
    /// Parse the body of a tree object: a sequence of
    /// `<octal mode> <name>\0<20-byte id>` records.
    pub(crate) fn parse(odb: &'r ObjectDatabase, id: Id, body: &[u8]) -> Result<Tree<'r>> {
        let mut entries = Vec::new();
        let mut rest = body;

        while !rest.is_empty() {
            let nul = match rest.iter().position(|b| *b == 0) {
                Some(n) => n,
                None => return Err(Error::corrupt(id, "truncated tree entry")),
            };

            let (mode, name) = parse_utils::split_once(&rest[..nul], &b' ');
            let mode = match FileMode::from_octal_slice(mode) {
                Some(mode) => mode,
                None => return Err(Error::corrupt(id, "invalid file mode in tree entry")),
            };

            if name.is_empty() {
                return Err(Error::corrupt(id, "empty name in tree entry"));
            }

            let id_bytes = &rest[nul + 1..];
            if id_bytes.len() < ID_LEN {
                return Err(Error::corrupt(id, "truncated object ID in tree entry"));
            }

            entries.push(TreeEntry {
                mode,
                name: name.to_vec(),
                id: Id::new(&id_bytes[..ID_LEN])?,
            });

            rest = &id_bytes[ID_LEN..];
        }

        Ok(Tree { odb, id, entries })
    }

    /// Return the ID of the tree.
    pub fn id(&self) -> Id {
        self.id
    }

    /// Return the entries in the order they are stored.
    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    /// Iterate over the entries in the order they are stored.
    pub fn iter(&self) -> slice::Iter<'_, TreeEntry> {
        self.entries.iter()
    }

    /// Return the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the entry with the given name.
    pub fn get<N: AsRef<[u8]>>(&self, name: N) -> Option<&TreeEntry> {
        let name = name.as_ref();
        self.entries.iter().find(|e| e.name == name)
    }

    /// Load the subtree referred to by `entry`.
    ///
    /// Fails with `ObjectTypeMismatch` if the entry is not a tree.
    pub fn subtree(&self, entry: &TreeEntry) -> Result<Tree<'r>> {
        self.odb.lookup_tree(entry.id)
    }
}

impl<'a, 'r> IntoIterator for &'a Tree<'r> {
    type Item = &'a TreeEntry;
    type IntoIter = slice::Iter<'a, TreeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

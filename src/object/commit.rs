use super::{parse_utils, Attribution, Id, Tree};

use crate::{Error, ObjectDatabase, Result};

/// A commit object loaded from an object database.
///
/// A `Commit` borrows the `ObjectDatabase` (and therefore the `Repository`)
/// it came from, so it can't outlive it.
#[derive(Clone, Debug)]
pub struct Commit<'r> {
    odb: &'r ObjectDatabase,
    id: Id,
    tree_id: Id,
    parent_ids: Vec<Id>,
    author: Option<Attribution>,
    committer: Option<Attribution>,
    message: String,
}

impl<'r> Commit<'r> {
    /// Parse the body of a commit object (everything after the header).
    pub(crate) fn parse(odb: &'r ObjectDatabase, id: Id, body: &[u8]) -> Result<Commit<'r>> {
        let mut rest = body;

        let tree_id = match parse_utils::next_line(&mut rest)
            .and_then(|line| parse_utils::header(line, b"tree"))
        {
            Some(hex) => Id::from_hex(hex)
                .map_err(|_| Error::corrupt(id, "malformed tree ID in commit"))?,
            None => return Err(Error::corrupt(id, "commit does not start with a tree line")),
        };

        let mut parent_ids = Vec::new();
        let mut author = None;
        let mut committer = None;

        while let Some(line) = parse_utils::next_line(&mut rest) {
            if line.is_empty() {
                break;
            }

            if let Some(hex) = parse_utils::header(line, b"parent") {
                let parent = Id::from_hex(hex)
                    .map_err(|_| Error::corrupt(id, "malformed parent ID in commit"))?;
                parent_ids.push(parent);
            } else if let Some(value) = parse_utils::header(line, b"author") {
                author = Attribution::parse(value);
            } else if let Some(value) = parse_utils::header(line, b"committer") {
                committer = Attribution::parse(value);
            }
            // Anything else (encoding, mergetag, gpgsig and its continuation
            // lines) is not modeled.
        }

        Ok(Commit {
            odb,
            id,
            tree_id,
            parent_ids,
            author,
            committer,
            message: String::from_utf8_lossy(rest).into_owned(),
        })
    }

    /// Return the ID of the commit.
    pub fn id(&self) -> Id {
        self.id
    }

    /// Return the ID of the tree this commit points to.
    pub fn tree_id(&self) -> Id {
        self.tree_id
    }

    /// Load the tree this commit points to.
    pub fn tree(&self) -> Result<Tree<'r>> {
        self.odb.lookup_tree(self.tree_id)
    }

    /// Return the IDs of this commit's parents, in header order.
    pub fn parent_ids(&self) -> &[Id] {
        &self.parent_ids
    }

    /// Load the `n`th parent of this commit, or `None` if there are not
    /// that many parents.
    pub fn parent(&self, n: usize) -> Result<Option<Commit<'r>>> {
        match self.parent_ids.get(n) {
            Some(parent_id) => self.odb.lookup_commit(*parent_id).map(Some),
            None => Ok(None),
        }
    }

    /// Return the author, if the commit has a readable `author` line.
    pub fn author(&self) -> Option<&Attribution> {
        self.author.as_ref()
    }

    /// Return the committer, if the commit has a readable `committer` line.
    pub fn committer(&self) -> Option<&Attribution> {
        self.committer.as_ref()
    }

    /// Return the full commit message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Return the first line of the commit message.
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

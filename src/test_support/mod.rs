// Items in this module (and submodules) are only used in test code,
// so we disable the unused_imports warning.

mod temp_git_repo;

#[allow(unused_imports)]
pub(crate) use temp_git_repo::TempGitRepo;

use crate::object::{Id, Kind};
use crate::ObjectDatabase;

/// ID of the empty blob.
pub(crate) const EMPTY_BLOB_ID: &str = "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391";

/// ID of a tree holding a single empty `README`.
pub(crate) const README_TREE_ID: &str = "543b9bebdc6bd5c4b22136034a95dd097a57d3dd";

/// ID command-line git assigns to the commit written by `write_readme_commit`:
///
/// ```text
/// $ touch README && git add . && \
///   GIT_AUTHOR_DATE="1234567890 -0700" GIT_COMMITTER_DATE="1234567890 -0700" \
///   git -c user.name="A U Thor" -c user.email="author@example.com" \
///   commit -m "initial commit"
/// ```
pub(crate) const README_COMMIT_ID: &str = "59810d286eb1220b3be791f55e393f747885ea51";

pub(crate) const README_COMMIT_BODY: &str = "tree 543b9bebdc6bd5c4b22136034a95dd097a57d3dd\n\
     author A U Thor <author@example.com> 1234567890 -0700\n\
     committer A U Thor <author@example.com> 1234567890 -0700\n\
     \n\
     initial commit\n";

/// Encode one tree record.
pub(crate) fn tree_entry(mode: &str, name: &str, id: Id) -> Vec<u8> {
    let mut r = format!("{} {}\0", mode, name).into_bytes();
    r.extend_from_slice(id.as_bytes());
    r
}

/// Write the empty `README` blob, its tree, and the commit pointing at it.
/// Returns the commit ID.
#[allow(dead_code)]
pub(crate) fn write_readme_commit(odb: &ObjectDatabase) -> Id {
    let blob = odb.write(Kind::Blob, b"").unwrap();
    let tree = odb
        .write(Kind::Tree, &tree_entry("100644", "README", blob))
        .unwrap();
    assert_eq!(tree.to_string(), README_TREE_ID);

    odb.write(Kind::Commit, README_COMMIT_BODY.as_bytes())
        .unwrap()
}

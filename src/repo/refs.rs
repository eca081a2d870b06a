//! Reference resolution: `HEAD`, loose refs under `refs/`, and the
//! `packed-refs` file.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::object::Id;
use crate::{Error, Result};

/// How many symbolic refs may be followed before giving up.
pub(crate) const MAX_SYMREF_DEPTH: usize = 5;

#[derive(Debug, Eq, PartialEq)]
enum Ref {
    Direct(Id),
    Symbolic(String),
}

/// Resolve `name` (e.g. `HEAD` or `refs/heads/master`) to an object ID,
/// following symbolic refs.
///
/// A ref that does not exist, or a symbolic ref pointing at one, fails with
/// `NoCommitsYet` naming the missing ref.
pub(crate) fn resolve(git_dir: &Path, name: &str) -> Result<Id> {
    let mut name = name.to_string();

    for _ in 0..=MAX_SYMREF_DEPTH {
        match read_ref(git_dir, &name)? {
            Some(Ref::Direct(id)) => {
                debug!(%name, %id, "resolved ref");
                return Ok(id);
            }
            Some(Ref::Symbolic(target)) => {
                debug!(%name, %target, "following symbolic ref");
                name = target;
            }
            None => return Err(Error::NoCommitsYet(name)),
        }
    }

    Err(Error::CorruptRef(name))
}

fn read_ref(git_dir: &Path, name: &str) -> Result<Option<Ref>> {
    if !is_safe_name(name) {
        return Err(Error::CorruptRef(name.to_string()));
    }

    let path = git_dir.join(name);
    if !path.is_file() {
        return Ok(packed_ref(git_dir, name)?.map(Ref::Direct));
    }

    match fs::read_to_string(&path) {
        Ok(text) => parse_ref(name, &text).map(Some),
        Err(err) if err.kind() == ErrorKind::PermissionDenied => {
            Err(Error::PermissionDenied(path))
        }
        Err(err) if err.kind() == ErrorKind::InvalidData => {
            Err(Error::CorruptRef(name.to_string()))
        }
        Err(err) => Err(err.into()),
    }
}

fn parse_ref(name: &str, text: &str) -> Result<Ref> {
    let text = text.trim_end();

    if let Some(target) = text.strip_prefix("ref:") {
        let target = target.trim_start();
        if target.is_empty() {
            return Err(Error::CorruptRef(name.to_string()));
        }
        return Ok(Ref::Symbolic(target.to_string()));
    }

    Id::from_hex(text)
        .map(Ref::Direct)
        .map_err(|_| Error::CorruptRef(name.to_string()))
}

// Look `name` up in `packed-refs`. Lines are `<hex> <refname>`, optionally
// preceded by a `# pack-refs with:` header; lines starting with `^` hold the
// peeled target of the preceding tag and are skipped.
fn packed_ref(git_dir: &Path, name: &str) -> Result<Option<Id>> {
    let path = git_dir.join("packed-refs");

    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) if err.kind() == ErrorKind::PermissionDenied => {
            return Err(Error::PermissionDenied(path));
        }
        Err(err) => return Err(err.into()),
    };

    for line in text.lines() {
        if line.is_empty() || line.starts_with('#') || line.starts_with('^') {
            continue;
        }

        let mut parts = line.splitn(2, ' ');
        let hex = parts.next().unwrap_or_default();
        if parts.next() == Some(name) {
            return Id::from_hex(hex)
                .map(Some)
                .map_err(|_| Error::CorruptRef(name.to_string()));
        }
    }

    Ok(None)
}

// Ref names are paths relative to the git dir; they must not escape it.
fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('/')
        && !name.contains('\0')
        && !name.contains('\\')
        && name.split('/').all(|c| !c.is_empty() && c != "." && c != "..")
}

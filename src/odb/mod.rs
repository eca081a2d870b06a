//! The object database: content-addressed storage of git objects.
//!
//! Only loose objects are supported. Each object lives in its own file at
//! `objects/xx/yyyy...` (see [`Id::loose_path`]), compressed with zlib. The
//! decompressed content is a header `<kind> <size>\0` followed by `size`
//! bytes of object body.
//!
//! Packfiles (`objects/pack/*.pack`) are not read.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use sha1::{Digest, Sha1};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::object::id::ID_LEN;
use crate::object::{Commit, Id, Kind, Tree};
use crate::{Error, Result};

/// Reads and writes loose objects below a repository's `objects` directory.
#[derive(Debug)]
pub struct ObjectDatabase {
    objects_dir: PathBuf,
}

impl ObjectDatabase {
    /// Create an object database rooted at `objects_dir` (typically
    /// `.git/objects`). The directory is not touched until an object is
    /// read or written.
    pub fn new(objects_dir: &Path) -> ObjectDatabase {
        ObjectDatabase {
            objects_dir: objects_dir.to_path_buf(),
        }
    }

    /// Return the `objects` directory.
    pub fn objects_dir(&self) -> &Path {
        self.objects_dir.as_path()
    }

    /// Returns true if a loose object with this ID exists.
    pub fn contains(&self, id: Id) -> bool {
        self.objects_dir.join(id.loose_path()).is_file()
    }

    /// Read an object, returning its kind and its body (the bytes after the
    /// header).
    ///
    /// Fails with `ObjectNotFound` if there is no such object and with
    /// `CorruptObject` if it can't be decompressed or its header is invalid.
    pub fn read(&self, id: Id) -> Result<(Kind, Vec<u8>)> {
        let path = self.objects_dir.join(id.loose_path());
        debug!(%id, path = %path.display(), "reading loose object");

        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(Error::ObjectNotFound(id));
            }
            Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
                return Err(Error::PermissionDenied(path));
            }
            Err(err) => return Err(err.into()),
        };

        let mut raw = Vec::new();
        ZlibDecoder::new(file)
            .read_to_end(&mut raw)
            .map_err(|err| Error::corrupt(id, format!("unable to decompress: {}", err)))?;

        let (kind, body_start) = parse_header(id, &raw)?;
        raw.drain(..body_start);
        Ok((kind, raw))
    }

    /// Look up a commit.
    ///
    /// Fails with `ObjectTypeMismatch` if the object exists but isn't a commit.
    pub fn lookup_commit(&self, id: Id) -> Result<Commit<'_>> {
        let body = self.read_kind(id, Kind::Commit)?;
        Commit::parse(self, id, &body)
    }

    /// Look up a tree.
    ///
    /// Fails with `ObjectTypeMismatch` if the object exists but isn't a tree.
    pub fn lookup_tree(&self, id: Id) -> Result<Tree<'_>> {
        let body = self.read_kind(id, Kind::Tree)?;
        Tree::parse(self, id, &body)
    }

    fn read_kind(&self, id: Id, expected: Kind) -> Result<Vec<u8>> {
        let (actual, body) = self.read(id)?;
        if actual != expected {
            return Err(Error::ObjectTypeMismatch {
                id,
                expected,
                actual,
            });
        }
        Ok(body)
    }

    /// Write an object as a loose object and return its ID.
    ///
    /// If an object with that ID already exists it is left untouched.
    /// The object file is written to a temporary file and renamed into
    /// place so readers never observe a partial object.
    pub fn write(&self, kind: Kind, body: &[u8]) -> Result<Id> {
        let id = hash_object(kind, body);
        let path = self.objects_dir.join(id.loose_path());

        if path.is_file() {
            debug!(%id, "object already exists");
            return Ok(id);
        }

        let dir = match path.parent() {
            Some(dir) => dir,
            None => return Err(Error::PathNotFound(path)),
        };
        fs::create_dir_all(dir)?;

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(header(kind, body).as_bytes())?;
        encoder.write_all(body)?;
        let compressed = encoder.finish()?;

        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(&compressed)?;
        temp.persist(&path).map_err(|err| err.error)?;

        debug!(%id, %kind, len = body.len(), "wrote loose object");
        Ok(id)
    }
}

/// Computes the ID an object with this kind and body would have.
///
/// This is functionally equivalent to the
/// [`git hash-object`](https://git-scm.com/docs/git-hash-object) command
/// without the `-w` option that would write the object to the repo.
pub fn hash_object(kind: Kind, body: &[u8]) -> Id {
    let mut hasher = Sha1::new();
    hasher.update(header(kind, body));
    hasher.update(body);

    let mut bytes = [0u8; ID_LEN];
    bytes.copy_from_slice(&hasher.finalize()[..]);
    Id::from_bytes(bytes)
}

fn header(kind: Kind, body: &[u8]) -> String {
    format!("{} {}\0", kind, body.len())
}

// Returns the kind and the offset at which the body starts.
fn parse_header(id: Id, raw: &[u8]) -> Result<(Kind, usize)> {
    let nul = match raw.iter().take(32).position(|b| *b == 0) {
        Some(n) => n,
        None => return Err(Error::corrupt(id, "missing object header")),
    };

    let header = &raw[..nul];
    let space = match header.iter().position(|b| *b == b' ') {
        Some(n) => n,
        None => return Err(Error::corrupt(id, "malformed object header")),
    };

    let kind = match Kind::from_bytes(&header[..space]) {
        Some(kind) => kind,
        None => return Err(Error::corrupt(id, "unknown object type")),
    };

    let size: usize = std::str::from_utf8(&header[space + 1..])
        .ok()
        .filter(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| Error::corrupt(id, "malformed object size"))?;

    let body_len = raw.len() - nul - 1;
    if body_len != size {
        return Err(Error::corrupt(
            id,
            format!("object size is {} but header says {}", body_len, size),
        ));
    }

    Ok((kind, nul + 1))
}

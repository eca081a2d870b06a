//! A git repository on the local file system.
//!
//! A [`Repository`] uses the same `.git` directory format as command-line
//! git, so repositories created by either can be read by the other. Both
//! regular repositories (metadata in `<work_dir>/.git`) and bare
//! repositories (metadata at the top level) are supported.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{Config, ConfigState};
use crate::object::{Commit, Id, Tree};
use crate::{Error, ObjectDatabase, Result};

mod init;
mod refs;

/// An open git repository.
///
/// Commits and trees looked up through a `Repository` borrow it, so they
/// cannot outlive it. [`Repository::close`] consumes the repository.
#[derive(Debug)]
pub struct Repository {
    work_dir: Option<PathBuf>,
    git_dir: PathBuf,
    odb: ObjectDatabase,
    config: Option<Config>,
}

impl Repository {
    /// Open an existing repository.
    ///
    /// `path` may be a working directory containing a `.git` directory, a
    /// `.git` directory itself, or a bare repository. In every case the
    /// metadata directory must contain `HEAD`, `objects`, and `refs`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Repository> {
        let path = path.as_ref();

        let metadata = fs::metadata(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => Error::PathNotFound(path.to_path_buf()),
            _ => access_error(err, path),
        })?;

        if !metadata.is_dir() {
            return Err(Error::NotARepository(path.to_path_buf()));
        }

        let dot_git = path.join(".git");
        let git_dir = if dot_git.is_dir() {
            dot_git
        } else {
            path.to_path_buf()
        };

        if let Err(err) = fs::read_dir(&git_dir) {
            return Err(access_error(err, &git_dir));
        }

        if !is_repo_layout(&git_dir) {
            return Err(Error::NotARepository(path.to_path_buf()));
        }

        let work_dir = if git_dir != path {
            Some(path.to_path_buf())
        } else {
            enclosing_work_dir(path)
        };

        let repo = Repository::new(work_dir, git_dir);
        debug!(git_dir = %repo.git_dir.display(), bare = repo.is_bare(), "opened repository");
        Ok(repo)
    }

    /// Create a new, empty repository at `path`, creating `path` if needed.
    ///
    /// Metadata goes in `path/.git`, or directly in `path` if `bare` is true.
    /// Running `init` on an existing repository only adds whatever pieces of
    /// the layout are missing; existing files are left untouched.
    ///
    /// Analogous to [`git init`](https://git-scm.com/docs/git-init).
    pub fn init<P: AsRef<Path>>(path: P, bare: bool) -> Result<Repository> {
        let path = path.as_ref();

        let (work_dir, git_dir) = if bare {
            (None, path.to_path_buf())
        } else {
            (Some(path.to_path_buf()), path.join(".git"))
        };

        init::init(&git_dir, bare).map_err(|err| match err {
            Error::IoError(err) => access_error(err, path),
            err => err,
        })?;

        debug!(git_dir = %git_dir.display(), bare, "initialized repository");
        Ok(Repository::new(work_dir, git_dir))
    }

    fn new(work_dir: Option<PathBuf>, git_dir: PathBuf) -> Repository {
        let odb = ObjectDatabase::new(&git_dir.join("objects"));

        Repository {
            work_dir,
            git_dir,
            odb,
            config: None,
        }
    }

    /// Return the working directory, or `None` for a bare repository.
    pub fn work_dir(&self) -> Option<&Path> {
        self.work_dir.as_deref()
    }

    /// Return the path to the metadata directory (`.git` for a regular
    /// repository).
    pub fn git_dir(&self) -> &Path {
        self.git_dir.as_path()
    }

    pub fn is_bare(&self) -> bool {
        self.work_dir.is_none()
    }

    pub fn odb(&self) -> &ObjectDatabase {
        &self.odb
    }

    /// Return the repository's config store, reading it on first use.
    ///
    /// The store is cached; if it has been closed, it is read again.
    pub fn config(&mut self) -> Result<&mut Config> {
        let config = match self.config.take() {
            Some(config) if config.state() != ConfigState::Closed => config,
            _ => Config::open(self.git_dir.join("config"))?,
        };

        Ok(self.config.get_or_insert(config))
    }

    /// Return the commit that `HEAD` points to.
    ///
    /// Fails with `NoCommitsYet` if `HEAD` names a branch that does not
    /// exist yet, as in a freshly initialized repository.
    pub fn head(&self) -> Result<Commit<'_>> {
        self.odb.lookup_commit(self.head_id()?)
    }

    /// Return the ID `HEAD` resolves to, without reading the commit.
    pub fn head_id(&self) -> Result<Id> {
        self.resolve_ref("HEAD")
    }

    /// Resolve a ref such as `HEAD` or `refs/heads/master` to an object ID,
    /// following symbolic refs and consulting `packed-refs`.
    pub fn resolve_ref(&self, name: &str) -> Result<Id> {
        refs::resolve(&self.git_dir, name)
    }

    pub fn lookup_commit(&self, id: Id) -> Result<Commit<'_>> {
        self.odb.lookup_commit(id)
    }

    pub fn lookup_tree(&self, id: Id) -> Result<Tree<'_>> {
        self.odb.lookup_tree(id)
    }

    /// Close the repository, flushing any unsaved config changes.
    pub fn close(mut self) -> Result<()> {
        if let Some(mut config) = self.config.take() {
            config.close()?;
        }

        debug!(git_dir = %self.git_dir.display(), "closed repository");
        Ok(())
    }
}

fn is_repo_layout(git_dir: &Path) -> bool {
    git_dir.join("HEAD").is_file()
        && git_dir.join("objects").is_dir()
        && git_dir.join("refs").is_dir()
}

// A metadata directory opened directly belongs to the directory above it
// when it is named `.git` or its config says it is not bare.
fn enclosing_work_dir(git_dir: &Path) -> Option<PathBuf> {
    let non_bare = git_dir.file_name() == Some(OsStr::new(".git"))
        || matches!(
            Config::open(git_dir.join("config")).and_then(|c| c.get_bool("core.bare")),
            Ok(false)
        );

    if !non_bare {
        return None;
    }

    match git_dir.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Some(PathBuf::from(".")),
        parent => parent.map(Path::to_path_buf),
    }
}

fn access_error(err: io::Error, path: &Path) -> Error {
    if err.kind() == io::ErrorKind::PermissionDenied {
        Error::PermissionDenied(path.to_path_buf())
    } else {
        err.into()
    }
}

//! A minimal, git-compatible repository library.
//!
//! Gitkit reads and writes the same `.git` directory format as command-line
//! git. It covers three things:
//!
//! * the repository configuration file (`.git/config`), with typed accessors
//!   (see [`Config`]);
//! * the loose-object store, which maps content identifiers to compressed
//!   commit and tree objects (see [`ObjectDatabase`]);
//! * the repository itself, which ties those together and resolves `HEAD`
//!   to a commit (see [`Repository`]).
//!
//! ```no_run
//! use gitkit::Repository;
//!
//! # fn main() -> gitkit::Result<()> {
//! let mut repo = Repository::open("/path/to/repo")?;
//!
//! let ignore_case = repo.config()?.get_bool("core.ignorecase")?;
//! println!("ignorecase = {}", ignore_case);
//!
//! let head = repo.head()?;
//! println!("HEAD is {} (tree {})", head.id(), head.tree()?.id());
//! # Ok(())
//! # }
//! ```

#![deny(warnings)]

pub mod config;
pub use config::{Config, ConfigState};

mod error;
pub use error::{Error, Result};

mod file_mode;
pub use file_mode::FileMode;

pub mod object;

pub mod odb;
pub use odb::ObjectDatabase;

pub mod repo;
pub use repo::Repository;

#[cfg(test)]
mod test_support;

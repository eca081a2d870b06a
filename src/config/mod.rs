//! Reads and writes git configuration files.
//!
//! A [`Config`] holds the parsed contents of one config file (typically
//! `.git/config`). Variables are addressed by dotted names: `core.bare` names
//! the `bare` key in the `[core]` section, and `remote.origin.url` names the
//! `url` key in the `[remote "origin"]` section. Section names and keys are
//! case-insensitive; subsection names are case-sensitive.
//!
//! Changes are held in memory until [`Config::flush`] or [`Config::close`]
//! writes the whole store back to disk. A store that is dropped while it
//! has unsaved changes flushes itself on a best-effort basis.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::{Error, Result};

mod format;
mod parse;
mod value;

/// Lifecycle of a [`Config`] store.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigState {
    /// Freshly read; no changes since.
    Loaded,

    /// Changed in memory but not yet written.
    Dirty,

    /// All changes have been written to disk.
    Saved,

    /// Closed; no further reads or writes are allowed.
    Closed,
}

#[derive(Clone, Debug)]
pub(crate) struct Section {
    pub(crate) name: String,
    pub(crate) subsection: Option<String>,
    pub(crate) entries: Vec<Entry>,
}

impl Section {
    pub(crate) fn new(name: &str, subsection: Option<String>) -> Section {
        Section {
            name: name.to_string(),
            subsection,
            entries: Vec::new(),
        }
    }

    fn matches(&self, name: &Name) -> bool {
        self.name.eq_ignore_ascii_case(name.section)
            && self.subsection.as_deref() == name.subsection
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Entry {
    pub(crate) key: String,

    // `None` for a key written without `=`.
    pub(crate) value: Option<String>,
}

// A variable name split into its parts.
struct Name<'a> {
    section: &'a str,
    subsection: Option<&'a str>,
    key: &'a str,
}

impl<'a> Name<'a> {
    fn parse(name: &'a str) -> Result<Name<'a>> {
        let invalid = || Error::InvalidConfigName(name.to_string());

        let first = name.find('.').ok_or_else(invalid)?;
        let last = name.rfind('.').ok_or_else(invalid)?;

        let section = &name[..first];
        let key = &name[last + 1..];
        let subsection = if first == last {
            None
        } else {
            Some(&name[first + 1..last])
        };

        if !parse::is_valid_section(section) || section.contains('.') {
            return Err(invalid());
        }
        if !parse::is_valid_key(key) {
            return Err(invalid());
        }
        if let Some(sub) = subsection {
            if sub.contains('\n') {
                return Err(invalid());
            }
        }

        Ok(Name {
            section,
            subsection,
            key,
        })
    }
}

/// An in-memory git config store, optionally backed by a file.
#[derive(Debug)]
pub struct Config {
    path: Option<PathBuf>,
    sections: Vec<Section>,
    state: ConfigState,
}

impl Config {
    /// Read the config file at `path`.
    ///
    /// A missing file is not an error: it yields an empty store which will
    /// create the file on the first flush.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => String::new(),
            Err(err) if err.kind() == ErrorKind::PermissionDenied => {
                return Err(Error::PermissionDenied(path.to_path_buf()));
            }
            Err(err) => return Err(err.into()),
        };

        let sections = parse::parse(&text)?;
        debug!(path = %path.display(), sections = sections.len(), "loaded config");

        Ok(Config {
            path: Some(path.to_path_buf()),
            sections,
            state: ConfigState::Loaded,
        })
    }

    /// Parse config text into a store with no backing file.
    /// Flushing such a store only updates its state.
    pub fn parse(text: &str) -> Result<Config> {
        Ok(Config {
            path: None,
            sections: parse::parse(text)?,
            state: ConfigState::Loaded,
        })
    }

    /// Path of the backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn state(&self) -> ConfigState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.state == ConfigState::Dirty
    }

    /// Return the value of a boolean variable.
    ///
    /// `true`, `yes`, `on` and `1` are true; `false`, `no`, `off` and `0`
    /// are false (all case-insensitive). A key written without `=` is true.
    pub fn get_bool(&self, name: &str) -> Result<bool> {
        let value = self.get_value(name)?;
        value::parse_bool(value).ok_or_else(|| invalid_value(name, value))
    }

    pub fn set_bool(&mut self, name: &str, value: bool) -> Result<()> {
        self.set_value(name, value::format_bool(value).to_string())
    }

    /// Return the raw value of a variable. A key written without `=`
    /// has the empty string as its value.
    pub fn get_string(&self, name: &str) -> Result<String> {
        Ok(self.get_value(name)?.unwrap_or_default().to_string())
    }

    pub fn set_string(&mut self, name: &str, value: &str) -> Result<()> {
        self.set_value(name, value.to_string())
    }

    /// Return the value of a base-10 integer variable.
    pub fn get_i64(&self, name: &str) -> Result<i64> {
        let value = self.get_value(name)?;
        value::parse_i64(value).ok_or_else(|| invalid_value(name, value))
    }

    pub fn set_i64(&mut self, name: &str, value: i64) -> Result<()> {
        self.set_value(name, value.to_string())
    }

    /// Return true if the variable is set.
    pub fn contains(&self, name: &str) -> Result<bool> {
        match self.get_value(name) {
            Ok(_) => Ok(true),
            Err(Error::KeyNotFound(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Return every value of a multi-valued variable, in file order.
    /// The result is empty if the variable is not set.
    pub fn get_all(&self, name: &str) -> Result<Vec<String>> {
        self.ensure_open()?;
        let name = Name::parse(name)?;

        Ok(self
            .sections
            .iter()
            .filter(|s| s.matches(&name))
            .flat_map(|s| s.entries.iter())
            .filter(|e| e.key.eq_ignore_ascii_case(name.key))
            .map(|e| e.value.clone().unwrap_or_default())
            .collect())
    }

    /// Remove every occurrence of a variable.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        self.ensure_open()?;
        let parsed = Name::parse(name)?;

        let mut removed = false;
        for section in self.sections.iter_mut().filter(|s| s.matches(&parsed)) {
            let before = section.entries.len();
            section
                .entries
                .retain(|e| !e.key.eq_ignore_ascii_case(parsed.key));
            removed |= section.entries.len() != before;
        }

        if !removed {
            return Err(Error::KeyNotFound(name.to_string()));
        }

        self.state = ConfigState::Dirty;
        Ok(())
    }

    /// List every variable in file order as `(name, value)` pairs.
    /// Section names and keys are lowercased; `value` is `None` for a key
    /// written without `=`.
    pub fn entries(&self) -> Result<Vec<(String, Option<String>)>> {
        self.ensure_open()?;

        let mut r = Vec::new();
        for section in &self.sections {
            let prefix = match &section.subsection {
                Some(sub) => format!("{}.{}", section.name.to_ascii_lowercase(), sub),
                None => section.name.to_ascii_lowercase(),
            };

            for entry in &section.entries {
                r.push((
                    format!("{}.{}", prefix, entry.key.to_ascii_lowercase()),
                    entry.value.clone(),
                ));
            }
        }
        Ok(r)
    }

    /// Write any unsaved changes to the backing file.
    ///
    /// The file is replaced atomically: the new contents are written to a
    /// temporary file in the same directory, which is then renamed over the
    /// existing file. Comments and formatting from the file as read are lost.
    pub fn flush(&mut self) -> Result<()> {
        if self.state != ConfigState::Dirty {
            return Ok(());
        }

        if let Some(path) = &self.path {
            let dir = match path.parent() {
                Some(dir) if !dir.as_os_str().is_empty() => dir,
                _ => Path::new("."),
            };

            let mut temp = NamedTempFile::new_in(dir).map_err(|err| denied(err, path))?;
            temp.write_all(format::serialize(&self.sections).as_bytes())?;

            if let Ok(metadata) = fs::metadata(path) {
                temp.as_file().set_permissions(metadata.permissions())?;
            }

            temp.persist(path).map_err(|err| denied(err.error, path))?;
            debug!(path = %path.display(), "flushed config");
        }

        self.state = ConfigState::Saved;
        Ok(())
    }

    /// Flush any unsaved changes and close the store.
    ///
    /// All later reads and writes fail with [`Error::AlreadyClosed`].
    /// Closing a closed store does nothing.
    pub fn close(&mut self) -> Result<()> {
        if self.state == ConfigState::Closed {
            return Ok(());
        }

        self.flush()?;
        self.state = ConfigState::Closed;
        Ok(())
    }

    fn ensure_open(&self) -> Result<()> {
        if self.state == ConfigState::Closed {
            Err(Error::AlreadyClosed)
        } else {
            Ok(())
        }
    }

    // Look up the last value of a variable. The inner `None` is a key
    // written without `=`.
    fn get_value(&self, name: &str) -> Result<Option<&str>> {
        self.ensure_open()?;
        let parsed = Name::parse(name)?;

        self.sections
            .iter()
            .filter(|s| s.matches(&parsed))
            .flat_map(|s| s.entries.iter())
            .filter(|e| e.key.eq_ignore_ascii_case(parsed.key))
            .last()
            .map(|e| e.value.as_deref())
            .ok_or_else(|| Error::KeyNotFound(name.to_string()))
    }

    fn set_value(&mut self, name: &str, value: String) -> Result<()> {
        self.ensure_open()?;
        let name = Name::parse(name)?;

        let existing = self
            .sections
            .iter_mut()
            .filter(|s| s.matches(&name))
            .flat_map(|s| s.entries.iter_mut())
            .filter(|e| e.key.eq_ignore_ascii_case(name.key))
            .last();

        if let Some(entry) = existing {
            entry.value = Some(value);
        } else {
            let entry = Entry {
                key: name.key.to_string(),
                value: Some(value),
            };

            match self.sections.iter_mut().rev().find(|s| s.matches(&name)) {
                Some(section) => section.entries.push(entry),
                None => {
                    let mut section = Section::new(
                        &name.section.to_ascii_lowercase(),
                        name.subsection.map(str::to_string),
                    );
                    section.entries.push(entry);
                    self.sections.push(section);
                }
            }
        }

        self.state = ConfigState::Dirty;
        Ok(())
    }
}

impl Drop for Config {
    fn drop(&mut self) {
        if let Err(err) = self.flush() {
            warn!(
                path = ?self.path,
                error = %err,
                "unable to flush config on drop"
            );
        }
    }
}

fn invalid_value(name: &str, value: Option<&str>) -> Error {
    Error::InvalidValueType {
        name: name.to_string(),
        value: value.unwrap_or_default().to_string(),
    }
}

fn denied(err: std::io::Error, path: &Path) -> Error {
    if err.kind() == ErrorKind::PermissionDenied {
        Error::PermissionDenied(path.to_path_buf())
    } else {
        err.into()
    }
}

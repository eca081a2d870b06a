use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

use crate::Result;

/// Lay out an empty repository in `git_dir`, creating only what is missing.
///
/// Analogous to [`git init`](https://git-scm.com/docs/git-init). Existing
/// files are never overwritten, so running this over an existing repository
/// is safe.
pub(crate) fn init(git_dir: &Path, bare: bool) -> Result<()> {
    fs::create_dir_all(git_dir)?;

    create_config(git_dir, bare)?;
    create_description(git_dir)?;
    create_head(git_dir)?;
    create_hooks_dir(git_dir)?;
    create_info_dir(git_dir)?;
    create_objects_dir(git_dir)?;
    create_refs_dir(git_dir)?;

    Ok(())
}

fn create_config(git_dir: &Path, bare: bool) -> Result<()> {
    let config_path = git_dir.join("config");
    let config_txt = if bare {
        "[core]\n\trepositoryformatversion = 0\n\tfilemode = true\n\tbare = true\n"
    } else {
        "[core]\n\trepositoryformatversion = 0\n\tfilemode = true\n\tbare = false\n\tlogallrefupdates = true\n"
    };

    write_new(&config_path, config_txt)
}

fn create_description(git_dir: &Path) -> Result<()> {
    let desc_path = git_dir.join("description");
    let desc_txt = "Unnamed repository; edit this file 'description' to name the repository.\n";

    write_new(&desc_path, desc_txt)
}

fn create_head(git_dir: &Path) -> Result<()> {
    let head_path = git_dir.join("HEAD");
    let head_txt = "ref: refs/heads/master\n";

    write_new(&head_path, head_txt)
}

fn create_hooks_dir(git_dir: &Path) -> Result<()> {
    let hooks_dir = git_dir.join("hooks");
    fs::create_dir_all(&hooks_dir)?;

    // NOTE: Intentionally not including the sample files.
    Ok(())
}

fn create_info_dir(git_dir: &Path) -> Result<()> {
    let info_dir = git_dir.join("info");
    fs::create_dir_all(&info_dir)?;

    let exclude_path = info_dir.join("exclude");
    let exclude_txt = "# git ls-files --others --exclude-from=.git/info/exclude\n# Lines that start with '#' are comments.\n# For a project mostly in C, the following would be a good set of\n# exclude patterns (uncomment them if you want to use them):\n# *.[oa]\n# *~\n.DS_Store\n";

    write_new(&exclude_path, exclude_txt)
}

fn create_objects_dir(git_dir: &Path) -> Result<()> {
    fs::create_dir_all(git_dir.join("objects/info"))?;
    fs::create_dir_all(git_dir.join("objects/pack"))?;
    Ok(())
}

fn create_refs_dir(git_dir: &Path) -> Result<()> {
    fs::create_dir_all(git_dir.join("refs/heads"))?;
    fs::create_dir_all(git_dir.join("refs/tags"))?;
    Ok(())
}

// Write `contents` to a new file at `path`. An existing file is left alone.
fn write_new(path: &Path, contents: &str) -> Result<()> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(mut file) => Ok(file.write_all(contents.as_bytes())?),
        Err(err) if err.kind() == ErrorKind::AlreadyExists => Ok(()),
        Err(err) => Err(err.into()),
    }
}

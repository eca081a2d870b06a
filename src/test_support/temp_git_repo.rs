use std::{
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
    process::Command,
};

/// A `TempGitRepo` creates a temporary, empty repo using
/// the command-line git from the host system. This is
/// used in unit tests to compare output with comparable
/// gitkit operations.
///
/// Because this struct is intended for testing, its functions
/// panic instead of returning Result structs.
pub struct TempGitRepo {
    #[allow(dead_code)] // tempdir is only used for RAII
    tempdir: tempfile::TempDir,
    path: PathBuf,
}

impl TempGitRepo {
    // Create a new, sanitized repo in a temporary directory.
    // This directory will be deleted when the struct is dropped.
    pub fn new() -> TempGitRepo {
        TempGitRepo::create(false)
    }

    // Create a new, sanitized bare repo in a temporary directory.
    pub fn new_bare() -> TempGitRepo {
        TempGitRepo::create(true)
    }

    fn create(bare: bool) -> TempGitRepo {
        let tempdir = tempfile::tempdir().unwrap();
        let path: PathBuf = tempdir.path().to_path_buf();

        let mut r = TempGitRepo { tempdir, path };
        r.init(bare);
        r
    }

    fn init(&mut self, bare: bool) {
        let git_dir = if bare {
            self.git_command(&["init", "-q", "--bare"]);
            self.path.clone()
        } else {
            self.git_command(&["init", "-q"]);
            self.path.join(".git")
        };

        // Some older versions of git create a branches directory, but it's
        // considered deprecated. We'll remove it so folder comparisons are canonical.
        // Don't worry if it doesn't exist.

        let branches_dir = git_dir.join("branches");
        fs::remove_dir_all(&branches_dir).unwrap_or(());

        // Some things change too much from one version to another of git.
        // Rewrite to a canonical version so we can test against gitkit's output.

        // Clean out the hooks directory. The samples aren't essential.

        let hooks_dir = git_dir.join("hooks");
        fs::remove_dir_all(&hooks_dir).unwrap_or(());
        fs::create_dir_all(&hooks_dir).unwrap();

        let git_config_txt = if bare {
            "[core]\n\trepositoryformatversion = 0\n\tfilemode = true\n\tbare = true\n"
        } else {
            "[core]\n\trepositoryformatversion = 0\n\tfilemode = true\n\tbare = false\n\tlogallrefupdates = true\n"
        };

        fs::write(git_dir.join("config"), git_config_txt).unwrap();

        let git_info_exclude_txt = "# git ls-files --others --exclude-from=.git/info/exclude\n# Lines that start with '#' are comments.\n# For a project mostly in C, the following would be a good set of\n# exclude patterns (uncomment them if you want to use them):\n# *.[oa]\n# *~\n.DS_Store\n";

        let git_info_path = git_dir.join("info");
        fs::create_dir_all(&git_info_path).unwrap();
        fs::write(git_info_path.join("exclude"), git_info_exclude_txt).unwrap();

        // The default branch name depends on the host's git config.
        fs::write(git_dir.join("HEAD"), "ref: refs/heads/master\n").unwrap();
    }

    // Return the path for this repo's root (working directory).
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    // Create a command struct pointing to the root of the repo.
    pub fn command<S: AsRef<OsStr>>(&self, program: S) -> Command {
        let mut c = Command::new(program);
        c.current_dir(&self.path);
        c
    }

    // Run a git command and return its trimmed stdout.
    // Since this is used primarily for testing purposes, panics if command fails.
    pub fn git_output<I, S>(&self, args: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = self
            .command("git")
            .args(&[
                "-c",
                "user.name=A U Thor",
                "-c",
                "user.email=author@example.com",
            ])
            .args(args)
            .env("GIT_AUTHOR_DATE", "1234567890 -0700")
            .env("GIT_COMMITTER_DATE", "1234567890 -0700")
            .output()
            .unwrap();

        if !output.status.success() {
            panic!(
                "git command failed with status {:?}\n\nstdout:\n\n{}\n\nstderr:\n\n{}\n\n",
                output.status.code(),
                std::str::from_utf8(&output.stdout).unwrap(),
                std::str::from_utf8(&output.stderr).unwrap()
            );
        }

        String::from_utf8(output.stdout).unwrap().trim().to_string()
    }

    // Run a git command and return the git repo struct for method chaining.
    pub fn git_command<I, S>(&mut self, args: I) -> &mut TempGitRepo
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.git_output(args);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::TempGitRepo;

    #[test]
    fn temp_path() {
        let path = {
            let mut r = TempGitRepo::new();
            r.git_command(&["status"]);

            let path = r.path().to_path_buf();
            assert!(path.join(".git").is_dir());

            path
        };

        assert!(!path.as_path().is_dir());
    }

    #[test]
    fn commits_are_reproducible() {
        let mut r = TempGitRepo::new();
        std::fs::write(r.path().join("README"), "").unwrap();
        r.git_command(&["add", "."])
            .git_command(&["commit", "-q", "-m", "initial commit"]);

        assert_eq!(
            r.git_output(&["rev-parse", "HEAD"]),
            crate::test_support::README_COMMIT_ID
        );
    }

    #[test]
    #[should_panic(expected = "git command failed with status")]
    fn git_command_error() {
        let mut r = TempGitRepo::new();
        r.git_command(&["bogus"]);
    }
}

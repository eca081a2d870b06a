use std::{ffi::OsStr, fs, path::Path, process::Command};

use tempfile::TempDir;

type RepoOp = fn(&Path);

/// Run `git_op` (which should drive command-line git) and `gitkit_op` in two
/// fresh temporary directories and assert that the resulting directory trees
/// are identical once sanitized.
#[allow(dead_code)]
pub fn compare_git_and_gitkit(git_op: RepoOp, gitkit_op: RepoOp) {
    let c_temp = tempfile::tempdir().unwrap();
    let c_dir = c_temp.path();
    git_op(c_dir);
    sanitize_repo(c_dir);

    let r_temp = tempfile::tempdir().unwrap();
    let r_dir = r_temp.path();
    gitkit_op(r_dir);

    if dir_diff::is_different(c_dir, r_dir).unwrap() {
        panic!(
            "Directories differ:\n\n   c git: {}\n  gitkit: {}\n\n",
            c_dir.display(),
            r_dir.display()
        );
    }
}

/// Run command-line git in `path` with a fixed identity and clock, so that
/// commits get reproducible IDs. Panics if git fails. Returns trimmed stdout.
pub fn git<I, S>(path: &Path, args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = Command::new("git")
        .current_dir(path)
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
            "git command failed with status {:?}\n\nstderr:\n\n{}\n\n",
            output.status.code(),
            String::from_utf8_lossy(&output.stderr)
        );
    }

    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

/// Create a repository with command-line git, install `testdata/config`
/// as its config, and commit an empty `README`.
#[allow(dead_code)]
pub fn create_repository() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path();

    git(path, &["init", "-q"]);
    sanitize_repo(path);

    fs::copy(
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/testdata/config"),
        path.join(".git/config"),
    )
    .unwrap();

    fs::write(path.join("README"), "").unwrap();
    git(path, &["add", "."]);
    git(path, &["commit", "-q", "-m", "initial commit"]);

    dir
}

pub fn sanitize_repo(path: &Path) {
    // Some older versions of git create a branches directory, but it's
    // considered deprecated. We'll remove it so folder comparisons are canonical.
    // Don't worry if it doesn't exist.

    let branches_dir = path.join(".git/branches");
    fs::remove_dir_all(&branches_dir).unwrap_or(());

    // Some things change too much from one version to another of git.
    // Rewrite to a canonical version so we can test against gitkit's output.

    // Clean out the hooks directory. The samples aren't essential.

    let hooks_dir = path.join(".git/hooks");
    fs::remove_dir_all(&hooks_dir).unwrap_or(());
    fs::create_dir_all(&hooks_dir).unwrap();

    let git_config_txt = "[core]\n\trepositoryformatversion = 0\n\tfilemode = true\n\tbare = false\n\tlogallrefupdates = true\n";

    let git_config_path = path.join(".git/config");
    fs::write(git_config_path, git_config_txt).unwrap();

    let git_info_exclude_txt = "# git ls-files --others --exclude-from=.git/info/exclude\n# Lines that start with '#' are comments.\n# For a project mostly in C, the following would be a good set of\n# exclude patterns (uncomment them if you want to use them):\n# *.[oa]\n# *~\n.DS_Store\n";

    let git_info_path = path.join(".git/info");
    fs::create_dir_all(&git_info_path).unwrap();
    fs::write(git_info_path.join("exclude"), git_info_exclude_txt).unwrap();

    // The default branch name depends on the host's git config.
    fs::write(path.join(".git/HEAD"), "ref: refs/heads/master\n").unwrap();
}

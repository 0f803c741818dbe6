use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A throwaway repository driven through the real `git` binary.
///
/// Every git invocation runs with an isolated configuration so tests behave
/// the same on any machine, and commit dates are pinned for deterministic
/// long-format output.
pub struct TestRepo {
    temp_dir: TempDir,
    root: PathBuf,
}

const ENV: &[(&str, &str)] = &[
    ("GIT_CONFIG_GLOBAL", "/dev/null"),
    ("GIT_CONFIG_SYSTEM", "/dev/null"),
    ("GIT_AUTHOR_DATE", "2025-01-01T00:00:00Z"),
    ("GIT_COMMITTER_DATE", "2025-01-01T00:00:00Z"),
    ("LC_ALL", "C"),
];

impl TestRepo {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp directory");
        let root = temp_dir.path().join("repo");
        std::fs::create_dir(&root).expect("failed to create repo directory");
        // Canonicalize to resolve symlinks (important on macOS where /var is
        // a symlink to /private/var)
        let root = root
            .canonicalize()
            .expect("failed to canonicalize temp path");

        let repo = Self { temp_dir, root };
        repo.git(&["init", "-b", "main"]);
        repo.git(&["config", "user.name", "Test User"]);
        repo.git(&["config", "user.email", "test@example.com"]);
        repo
    }

    /// Get the root path of the repository
    pub fn root_path(&self) -> &Path {
        &self.root
    }

    /// Apply the isolated-git environment to the binary under test, so the
    /// git children it spawns see the same configuration as the fixture.
    pub fn clean_cli_env(&self, cmd: &mut assert_cmd::Command) {
        for (key, value) in ENV {
            cmd.env(key, value);
        }
    }

    /// Run git in the repository root, panicking on failure.
    pub fn git(&self, args: &[&str]) {
        self.git_in(&self.root, args);
    }

    fn git_in(&self, dir: &Path, args: &[&str]) {
        let mut cmd = Command::new("git");
        for (key, value) in ENV {
            cmd.env(key, value);
        }
        let output = cmd
            .args(args)
            .current_dir(dir)
            .output()
            .expect("failed to run git");
        if !output.status.success() {
            panic!(
                "git {:?} failed:\nstdout: {}\nstderr: {}",
                args,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
    }

    /// Write (or overwrite) a file relative to the repository root.
    pub fn write_file(&self, name: &str, contents: &str) {
        std::fs::write(self.root.join(name), contents).expect("failed to write file");
    }

    /// Commit a change to `file.txt` with the given message.
    pub fn commit(&self, message: &str) {
        self.write_file("file.txt", message);
        self.git(&["add", "."]);
        self.git(&["commit", "-m", message]);
    }

    /// Configure a bare sibling repository as `origin` and push the current
    /// branch to it with tracking.
    pub fn add_upstream(&self) {
        self.git_in(self.temp_dir.path(), &["init", "--bare", "origin.git"]);
        let remote = self.temp_dir.path().join("origin.git");
        self.git(&["remote", "add", "origin", remote.to_str().unwrap()]);
        self.git(&["push", "-u", "origin", "main"]);
    }

    /// A directory inside the sandbox that is not under version control.
    pub fn plain_dir(&self) -> PathBuf {
        let dir = self.temp_dir.path().join("plain");
        if !dir.exists() {
            std::fs::create_dir(&dir).expect("failed to create plain directory");
        }
        dir.canonicalize().expect("failed to canonicalize plain dir")
    }
}

//! Repository probes and metadata extraction over the installed `git`
//! binary.
//!
//! Every probe degrades the same way: a failed spawn, a non-zero exit, or
//! malformed output yields the documented default instead of an error. A
//! repository that cannot be scanned is indistinguishable from a clean one.

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use crate::exec::{Capture, GitCmd};

/// Derived working-tree state for one candidate path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepoStatus {
    pub dirty: bool,
    pub ahead: bool,
}

impl RepoStatus {
    /// A repository earns a report line if it is dirty or ahead.
    pub fn qualifies(&self) -> bool {
        self.dirty || self.ahead
    }
}

/// Most recent commit, split per the one-line log format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub hash: String,
    pub date: String,
    pub subject: String,
    pub author: String,
}

/// Working-tree change counts bucketed from porcelain status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    pub modified: usize,
    pub added: usize,
    pub untracked: usize,
}

impl ChangeSummary {
    pub fn is_empty(&self) -> bool {
        self.modified == 0 && self.added == 0 && self.untracked == 0
    }
}

/// Repository context for git probes.
///
/// # Examples
///
/// ```no_run
/// use drift::git::Repository;
///
/// let repo = Repository::at("/home/me/src/project");
/// if repo.is_git_repo() && repo.status().qualifies() {
///     println!("has work to commit or push");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Repository {
    path: PathBuf,
    timeout: Option<Duration>,
}

impl Repository {
    /// Create a repository context at the specified path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            timeout: None,
        }
    }

    /// Bound every git invocation for this repository; `None` waits forever.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn silent(&self, args: &[&str]) -> Option<ExitStatus> {
        GitCmd::new(&self.path, args)
            .timeout(self.timeout)
            .status()
            .ok()
    }

    fn capture(&self, args: &[&str]) -> Option<Capture> {
        GitCmd::new(&self.path, args)
            .timeout(self.timeout)
            .capture()
            .ok()
    }

    /// `git rev-parse --is-inside-work-tree`; exit 0 means the path is
    /// inside a working tree.
    pub fn is_git_repo(&self) -> bool {
        self.silent(&["rev-parse", "--is-inside-work-tree"])
            .is_some_and(|status| status.success())
    }

    /// `git diff --quiet` exits 1 exactly when tracked files have unstaged
    /// modifications. Anything else (0, 128, signals, spawn failure) counts
    /// as clean; this runs only after `is_git_repo` has gated entry.
    pub fn has_unstaged_changes(&self) -> bool {
        self.silent(&["diff", "--quiet"])
            .and_then(|status| status.code())
            == Some(1)
    }

    /// Whether the current branch has commits its upstream does not.
    ///
    /// No upstream is a common, legitimate state and yields false, as does
    /// any other probe failure.
    pub fn ahead_of_upstream(&self) -> bool {
        let Some(capture) = self.capture(&["rev-list", "--left-right", "--count", "@{u}...HEAD"])
        else {
            return false;
        };
        if !capture.success() {
            return false;
        }
        parse_behind_ahead(&capture.text()).is_some_and(|(_behind, ahead)| ahead > 0)
    }

    pub fn status(&self) -> RepoStatus {
        RepoStatus {
            dirty: self.has_unstaged_changes(),
            ahead: self.ahead_of_upstream(),
        }
    }

    /// Most recent commit, or `None` for a repository with no commits yet.
    pub fn last_commit(&self) -> Option<CommitInfo> {
        let capture =
            self.capture(&["log", "-1", "--date=short", "--pretty=format:%h %cd %s|%an"])?;
        parse_commit_line(&capture.text())
    }

    /// Names pointing at the current commit: `HEAD` first, then branches,
    /// then tags, each in git's own listing order.
    pub fn refs_at_head(&self) -> Vec<String> {
        let mut refs = vec!["HEAD".to_string()];
        let listings: [&[&str]; 2] = [
            &[
                "branch",
                "--all",
                "--points-at",
                "HEAD",
                "--format=%(refname:short)",
            ],
            &["tag", "--points-at", "HEAD"],
        ];
        for args in listings {
            if let Some(capture) = self.capture(args) {
                refs.extend(
                    capture
                        .text()
                        .lines()
                        .map(str::trim)
                        .filter(|line| !line.is_empty())
                        .map(String::from),
                );
            }
        }
        refs
    }

    /// Bucketed change counts from `git status --porcelain`.
    pub fn change_summary(&self) -> ChangeSummary {
        match self.capture(&["status", "--porcelain"]) {
            Some(capture) => parse_porcelain(&capture.text()),
            None => ChangeSummary::default(),
        }
    }
}

/// Parses the `<behind> <ahead>` pair emitted by
/// `rev-list --left-right --count`. Exactly two integers; anything else is a
/// parse failure.
fn parse_behind_ahead(output: &str) -> Option<(u64, u64)> {
    let mut fields = output.split_whitespace();
    let behind = fields.next()?.parse().ok()?;
    let ahead = fields.next()?.parse().ok()?;
    if fields.next().is_some() {
        return None;
    }
    Some((behind, ahead))
}

/// Splits `%h %cd %s|%an`: hash and date are the first two tokens, the
/// subject runs to the last `|` (subjects may themselves contain `|`), and
/// the author is whatever follows it.
fn parse_commit_line(output: &str) -> Option<CommitInfo> {
    let line = output.lines().next()?;
    let mut fields = line.splitn(3, ' ');
    let hash = fields.next().filter(|hash| !hash.is_empty())?;
    let date = fields.next()?;
    let rest = fields.next()?;
    let (subject, author) = rest.rsplit_once('|')?;
    Some(CommitInfo {
        hash: hash.to_string(),
        date: date.to_string(),
        subject: subject.to_string(),
        author: author.to_string(),
    })
}

/// Classifies porcelain lines into the three buckets the report tracks.
/// Renames, deletions, conflicts and the rest are ignored.
fn parse_porcelain(output: &str) -> ChangeSummary {
    let mut summary = ChangeSummary::default();
    for line in output.lines() {
        if line.starts_with("??") {
            summary.untracked += 1;
            continue;
        }
        match line.chars().nth(1) {
            Some('M') => summary.modified += 1,
            Some('A') => summary.added += 1,
            _ => {}
        }
    }
    summary
}

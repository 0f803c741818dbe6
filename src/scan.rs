//! The per-path scan loop.
//!
//! Sequential by contract: one path at a time, one git child at a time, and
//! output lines in exactly input order.

use std::io::{BufRead, Write};
use std::time::Duration;

use crate::git::Repository;
use crate::report::{self, DEFAULT_PATH_COLUMNS, LongDetails};

/// Process-wide scan configuration, fixed before the loop starts.
#[derive(Debug, Clone)]
pub struct Options {
    pub long: bool,
    pub columns: usize,
    pub timeout: Option<Duration>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            long: false,
            columns: DEFAULT_PATH_COLUMNS,
            timeout: None,
        }
    }
}

/// Reads one candidate directory per line and writes a report line for every
/// repository that is dirty or ahead of its upstream.
///
/// Probe failures never abort the scan; an unscannable path is treated like a
/// clean one and skipped. An unreadable input stream simply ends the loop.
pub fn scan(input: impl BufRead, out: &mut impl Write, options: &Options) -> std::io::Result<()> {
    for line in input.lines() {
        let Ok(line) = line else { break };
        let path = line.strip_suffix('\r').unwrap_or(&line);
        if path.is_empty() {
            continue;
        }
        if let Some(rendered) = scan_path(path, options) {
            writeln!(out, "{rendered}")?;
        }
    }
    Ok(())
}

/// One pass of the per-path state machine; `None` means the path is skipped.
fn scan_path(path: &str, options: &Options) -> Option<String> {
    let repo = Repository::at(path).timeout(options.timeout);
    if !repo.is_git_repo() {
        return None;
    }
    let status = repo.status();
    if !status.qualifies() {
        return None;
    }
    if !options.long {
        return Some(report::render_short(path));
    }
    let details = LongDetails {
        commit: repo.last_commit(),
        refs: repo.refs_at_head(),
        summary: status.dirty.then(|| repo.change_summary()),
    };
    Some(report::render_long(path, &details, options.columns))
}

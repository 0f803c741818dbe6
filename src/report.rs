//! Report line rendering.
//!
//! Two modes: short (the bare path) and long (an aligned path column plus
//! commit metadata). The formatter is pure: styling comes in as data from
//! [`crate::styling`] and it never consults the terminal.

use unicode_width::UnicodeWidthStr;

use crate::git::{ChangeSummary, CommitInfo};
use crate::styling::{AUTHOR, CHANGES, DATE, EMPTY, HASH, REFS, SUBJECT, StyledLine};

/// Path column width for long format when `-c` is absent or unusable.
pub const DEFAULT_PATH_COLUMNS: usize = 50;

/// Everything the long format shows beyond the path. `summary` is only
/// populated for dirty trees.
#[derive(Debug)]
pub struct LongDetails {
    pub commit: Option<CommitInfo>,
    pub refs: Vec<String>,
    pub summary: Option<ChangeSummary>,
}

/// Short mode: the path and nothing else.
pub fn render_short(path: &str) -> String {
    path.to_string()
}

/// Long mode: the path right-aligned in a fixed-width column, then hash,
/// date, subject, author, the parenthesized ref list, and for dirty trees a
/// change-summary clause.
pub fn render_long(path: &str, details: &LongDetails, columns: usize) -> String {
    let mut line = StyledLine::new();
    let pad = columns.saturating_sub(path.width());
    line.push_raw(" ".repeat(pad));
    line.push_raw(path);
    line.push_raw(" ");

    match &details.commit {
        Some(commit) => {
            line.push_styled(commit.hash.as_str(), HASH);
            line.push_raw(" ");
            line.push_styled(commit.date.as_str(), DATE);
            line.push_raw(" ");
            line.push_styled(commit.subject.as_str(), SUBJECT);
            line.push_raw(" ");
            line.push_styled(commit.author.as_str(), AUTHOR);
        }
        None => line.push_styled("no commits", EMPTY),
    }

    line.push_raw(" ");
    line.push_styled(format!("({})", details.refs.join(", ")), REFS);

    if let Some(summary) = &details.summary {
        let clause = summary_clause(summary);
        if !clause.is_empty() {
            line.push_raw("  ");
            line.push_styled(clause, CHANGES);
        }
    }

    line.render()
}

/// `M 2 files, ?? 1 file`: non-zero buckets only, comma separated, in the
/// fixed order modified, added, untracked.
fn summary_clause(summary: &ChangeSummary) -> String {
    let buckets = [
        ("M", summary.modified),
        ("A", summary.added),
        ("??", summary.untracked),
    ];
    let mut parts = Vec::new();
    for (label, count) in buckets {
        if count > 0 {
            let noun = if count == 1 { "file" } else { "files" };
            parts.push(format!("{label} {count} {noun}"));
        }
    }
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn commit() -> CommitInfo {
        CommitInfo {
            hash: "a1b2c3d".to_string(),
            date: "2025-01-01".to_string(),
            subject: "Fix the frobnicator".to_string(),
            author: "Alice".to_string(),
        }
    }

    fn details(commit: Option<CommitInfo>, summary: Option<ChangeSummary>) -> LongDetails {
        LongDetails {
            commit,
            refs: vec!["HEAD".to_string(), "main".to_string()],
            summary,
        }
    }

    /// Strips ANSI escape sequences so tests can assert on layout alone.
    fn plain(rendered: &str) -> String {
        let mut out = String::new();
        let mut chars = rendered.chars();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                for e in chars.by_ref() {
                    if e == 'm' {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[rstest]
    #[case(2, 0, 1, "M 2 files, ?? 1 file")]
    #[case(1, 0, 0, "M 1 file")]
    #[case(0, 1, 0, "A 1 file")]
    #[case(0, 0, 3, "?? 3 files")]
    #[case(1, 1, 1, "M 1 file, A 1 file, ?? 1 file")]
    #[case(0, 2, 5, "A 2 files, ?? 5 files")]
    #[case(0, 0, 0, "")]
    fn summary_clause_buckets(
        #[case] modified: usize,
        #[case] added: usize,
        #[case] untracked: usize,
        #[case] expected: &str,
    ) {
        let summary = ChangeSummary {
            modified,
            added,
            untracked,
        };
        assert_eq!(summary_clause(&summary), expected);
    }

    #[test]
    fn short_mode_is_just_the_path() {
        assert_eq!(render_short("/tmp/repo"), "/tmp/repo");
    }

    #[test]
    fn long_mode_right_aligns_the_path() {
        let rendered = render_long("/a", &details(Some(commit()), None), 10);
        assert_eq!(
            plain(&rendered),
            "        /a a1b2c3d 2025-01-01 Fix the frobnicator Alice (HEAD, main)"
        );
    }

    #[test]
    fn long_mode_never_truncates_a_wide_path() {
        let path = "/quite/a/long/path/that/exceeds/the/column";
        let rendered = render_long(path, &details(Some(commit()), None), 10);
        assert!(plain(&rendered).starts_with(path));
    }

    #[test]
    fn long_mode_reports_empty_repositories() {
        let rendered = render_long(
            "/a",
            &LongDetails {
                commit: None,
                refs: vec!["HEAD".to_string()],
                summary: None,
            },
            4,
        );
        assert_eq!(plain(&rendered), "  /a no commits (HEAD)");
    }

    #[test]
    fn long_mode_appends_change_clause_for_dirty_trees() {
        let summary = ChangeSummary {
            modified: 2,
            added: 0,
            untracked: 1,
        };
        let rendered = render_long("/a", &details(Some(commit()), Some(summary)), 2);
        assert!(plain(&rendered).ends_with("(HEAD, main)  M 2 files, ?? 1 file"));
    }

    #[test]
    fn long_mode_omits_clause_when_all_buckets_are_zero() {
        let rendered = render_long(
            "/a",
            &details(Some(commit()), Some(ChangeSummary::default())),
            2,
        );
        assert!(plain(&rendered).ends_with("(HEAD, main)"));
    }

    #[test]
    fn long_mode_colors_each_field_with_its_own_reset() {
        let rendered = render_long("/a", &details(Some(commit()), None), 2);
        // Hash yellow, date green, author blue, refs cyan; one reset per span.
        for code in ["\x1b[33m", "\x1b[32m", "\x1b[34m", "\x1b[36m"] {
            assert!(rendered.contains(code));
        }
        assert!(rendered.matches("\x1b[0m").count() >= 4);
    }
}

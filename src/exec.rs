//! Git subprocess execution.
//!
//! Every predicate and extractor funnels through here: one `git` child at a
//! time, bound to a working directory, with stdin null and stderr discarded.
//! Stdout is either discarded too (silent mode) or drained into a bounded
//! buffer (capture mode).

use std::io::Read;
use std::path::Path;
use std::process::{Child, ChildStdout, Command, ExitStatus, Stdio};
use std::time::Duration;

use wait_timeout::ChildExt;

/// Upper bound on captured stdout. Output beyond this is dropped silently;
/// every consumer parses only the leading portion of a known single- or
/// multi-line format.
pub const MAX_CAPTURE_BYTES: usize = 64 * 1024;

/// Result of a capture-mode invocation: the wait status plus whatever stdout
/// fit in the buffer.
#[derive(Debug)]
pub struct Capture {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
}

impl Capture {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Captured stdout as text. Invalid UTF-8 is replaced; the parsers only
    /// match ASCII prefixes.
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }
}

/// One `git` invocation bound to a working directory.
///
/// A nonexistent directory or a missing `git` binary fails the spawn before
/// git ever runs; callers fold that into probe failure.
pub struct GitCmd<'a> {
    dir: &'a Path,
    args: &'a [&'a str],
    timeout: Option<Duration>,
}

impl<'a> GitCmd<'a> {
    pub fn new(dir: &'a Path, args: &'a [&'a str]) -> Self {
        Self {
            dir,
            args,
            timeout: None,
        }
    }

    /// Kill the child if it outlives `timeout`. `None` waits forever, which
    /// is the default.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Silent mode: both output streams go to the null sink and only the
    /// wait status comes back.
    pub fn status(self) -> std::io::Result<ExitStatus> {
        let mut child = self
            .command()
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        self.wait(&mut child)
    }

    /// Capture mode: stderr is discarded, stdout is drained into a bounded
    /// buffer.
    ///
    /// The read end is closed once the bound is hit, so an over-talkative
    /// child sees a broken pipe instead of blocking the scan. A read error
    /// on the pipe is an executor-level failure regardless of how the child
    /// exits.
    pub fn capture(self) -> std::io::Result<Capture> {
        let mut child = self
            .command()
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;
        let pipe = child.stdout.take();

        match self.timeout {
            None => {
                let (stdout, read_result) = read_bounded(pipe);
                let status = child.wait()?;
                read_result?;
                Ok(Capture { status, stdout })
            }
            Some(limit) => {
                // Drain in a helper thread so the deadline also covers a
                // child that hangs while holding its stdout open; after the
                // kill the reader sees EOF and the join returns.
                let reader = std::thread::spawn(move || read_bounded(pipe));
                match child.wait_timeout(limit)? {
                    Some(status) => {
                        let (stdout, read_result) = reader.join().unwrap_or((Vec::new(), Ok(0)));
                        read_result?;
                        Ok(Capture { status, stdout })
                    }
                    None => {
                        let _ = child.kill();
                        let _ = child.wait();
                        let _ = reader.join();
                        Err(std::io::Error::new(
                            std::io::ErrorKind::TimedOut,
                            "git invocation timed out",
                        ))
                    }
                }
            }
        }
    }

    fn command(&self) -> Command {
        log::debug!("$ git {} [{}]", self.args.join(" "), self.dir.display());
        let mut cmd = Command::new("git");
        cmd.args(self.args)
            .current_dir(self.dir)
            .stdin(Stdio::null());
        cmd
    }

    fn wait(&self, child: &mut Child) -> std::io::Result<ExitStatus> {
        match self.timeout {
            None => child.wait(),
            Some(limit) => match child.wait_timeout(limit)? {
                Some(status) => Ok(status),
                None => {
                    let _ = child.kill();
                    let _ = child.wait();
                    Err(std::io::Error::new(
                        std::io::ErrorKind::TimedOut,
                        "git invocation timed out",
                    ))
                }
            },
        }
    }
}

fn read_bounded(pipe: Option<ChildStdout>) -> (Vec<u8>, std::io::Result<usize>) {
    let mut buf = Vec::new();
    let result = match pipe {
        Some(mut pipe) => {
            let result = (&mut pipe)
                .take(MAX_CAPTURE_BYTES as u64)
                .read_to_end(&mut buf);
            drop(pipe);
            result
        }
        None => Ok(0),
    };
    (buf, result)
}

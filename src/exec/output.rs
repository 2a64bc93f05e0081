// src/exec/output.rs

//! Result of an invocation and the post-processing applied to it.

use crate::errors::{ExitError, Result, ShellError};
use crate::flags::{Flag, Flags};

/// What an invocation produced: captured stdout, captured stderr and the
/// outcome.
///
/// Captures are returned even when the command failed. Streams that were
/// passed through or merged elsewhere are empty.
#[derive(Debug)]
pub struct Output {
    pub stdout: String,
    pub stderr: String,
    pub status: Result<()>,
}

impl Output {
    pub fn is_success(&self) -> bool {
        self.status.is_ok()
    }

    pub fn error(&self) -> Option<&ShellError> {
        self.status.as_ref().err()
    }

    pub fn exit_error(&self) -> Option<&ExitError> {
        self.error().and_then(ShellError::as_exit)
    }

    /// `Some(0)` on success, the child's code on failure when one is known.
    pub fn exit_code(&self) -> Option<i32> {
        match &self.status {
            Ok(()) => Some(0),
            Err(e) => e.exit_code(),
        }
    }

    /// `(stdout, stderr)` on success; the captures are dropped on failure.
    pub fn into_result(self) -> Result<(String, String)> {
        self.status.map(|()| (self.stdout, self.stderr))
    }

    pub fn into_parts(self) -> (String, String, Result<()>) {
        (self.stdout, self.stderr, self.status)
    }
}

/// Apply `TrimSpace` and `FirstLine` to the returned strings.
///
/// Trimming runs first and touches both streams; `FirstLine` only touches
/// stdout.
pub fn post_process(flags: Flags, mut stdout: String, mut stderr: String) -> (String, String) {
    if flags.contains(Flag::TrimSpace) {
        stdout = stdout.trim().to_string();
        stderr = stderr.trim().to_string();
    }

    if flags.contains(Flag::FirstLine) {
        stdout = first_line(&stdout);
    }

    (stdout, stderr)
}

/// Everything before the first `\n`, with `\r` removed.
pub fn first_line(s: &str) -> String {
    let head = s.split_once('\n').map_or(s, |(head, _)| head);
    head.replace('\r', "")
}

// src/errors.rs

//! Crate-wide error type.
//!
//! [`ShellError`] covers setup, launch and execution failures. The structured
//! execution error (child ran and exited non-zero) is [`ExitError`]; its
//! `Display` is the human-readable rendering used by `Warn`, `MustExit` and
//! `MustPanic`.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::flags::{Flag, Flags};
use crate::util::indent_lines;

/// Exit code `sh` reports when it cannot find a program.
pub const EXIT_NOT_FOUND: i32 = 127;

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("working directory {}: {source}", .path.display())]
    WorkingDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("shell probe failed: {0}")]
    Probe(String),

    #[error("{cmd_line}: failed to launch shell: {source}")]
    Launch {
        cmd_line: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Exit(#[from] ExitError),

    #[error("{cmd_line} terminated without an exit status{}", signal_suffix(.signal))]
    Signaled { cmd_line: String, signal: Option<i32> },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ShellError {
    /// The child's exit code. Only execution errors carry one.
    pub fn exit_code(&self) -> Option<i32> {
        self.as_exit().map(|e| e.exit_code)
    }

    pub fn as_exit(&self) -> Option<&ExitError> {
        match self {
            ShellError::Exit(e) => Some(e),
            _ => None,
        }
    }
}

fn signal_suffix(signal: &Option<i32>) -> String {
    signal.map(|s| format!(" (signal {s})")).unwrap_or_default()
}

/// The child ran and exited with a non-zero status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitError {
    pub exit_code: i32,
    /// The command line as formatted by the caller (without the strict prefix).
    pub cmd_line: String,
    /// Captured stderr. Empty when stderr was passed through or merged.
    pub stderr: String,
    flags: Flags,
}

impl ExitError {
    pub(crate) fn new(
        exit_code: i32,
        cmd_line: impl Into<String>,
        stderr: impl Into<String>,
        flags: Flags,
    ) -> Self {
        Self {
            exit_code,
            cmd_line: cmd_line.into(),
            stderr: stderr.into(),
            flags,
        }
    }

    /// True when the shell reported "command not found".
    pub fn is_not_found(&self) -> bool {
        self.exit_code == EXIT_NOT_FOUND
    }

    fn render(&self) -> String {
        if self.flags.contains(Flag::NoAnnotate) {
            return self.stderr.clone();
        }

        // In verbose mode the command line was already printed by the preamble.
        let mut lines = vec![if self.flags.contains(Flag::Verbose) {
            format!("  returned {}", self.exit_code)
        } else {
            format!("{} returned {}", self.cmd_line, self.exit_code)
        }];

        let stderr = indent_lines(&self.stderr, " > ");
        if !stderr.is_empty() {
            lines.push(stderr);
        }

        lines.join("\n")
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl std::error::Error for ExitError {}

pub type Result<T> = std::result::Result<T, ShellError>;

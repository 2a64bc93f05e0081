// src/flags.rs

//! Policy flags for an execution [`Context`](crate::Context).
//!
//! A [`Flag`] is one tag from a closed set; [`Flags`] is the set itself,
//! stored as a small bit-set so that order does not matter and duplicates
//! collapse.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// A single execution policy flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
#[repr(u8)]
pub enum Flag {
    /// Abort (panic) with the rendered error when the child fails.
    MustPanic,
    /// Print the error via the formatter's error line and exit with status 1.
    MustExit,
    /// Print the error via the formatter's warning line, then return it.
    Warn,
    /// The rendered error is exactly the captured stderr, without framing.
    NoAnnotate,
    /// Merge child stderr into the returned stdout.
    StdErrInResult,
    /// Alias for the three `PassThrough*` flags below.
    PassThrough,
    /// Child stdout goes to the host's stdout; returned stdout is empty.
    PassThroughStdOut,
    /// Child stderr goes to the host's stderr; returned stderr is empty.
    PassThroughStdErr,
    /// Child stdin is inherited from the host (ignored when piping a reader).
    PassThroughStdIn,
    /// Strip leading and trailing whitespace from returned stdout and stderr.
    TrimSpace,
    /// Keep only the first line of returned stdout, with `\r` removed.
    FirstLine,
    /// Run the command line under `set -eu -o pipefail`.
    Strict,
    /// Print a styled preamble before each invocation.
    Verbose,
}

impl Flag {
    pub const ALL: [Flag; 13] = [
        Flag::MustPanic,
        Flag::MustExit,
        Flag::Warn,
        Flag::NoAnnotate,
        Flag::StdErrInResult,
        Flag::PassThrough,
        Flag::PassThroughStdOut,
        Flag::PassThroughStdErr,
        Flag::PassThroughStdIn,
        Flag::TrimSpace,
        Flag::FirstLine,
        Flag::Strict,
        Flag::Verbose,
    ];

    /// Kebab-case name, as accepted by `FromStr` and the config file.
    pub fn name(self) -> &'static str {
        match self {
            Flag::MustPanic => "must-panic",
            Flag::MustExit => "must-exit",
            Flag::Warn => "warn",
            Flag::NoAnnotate => "no-annotate",
            Flag::StdErrInResult => "std-err-in-result",
            Flag::PassThrough => "pass-through",
            Flag::PassThroughStdOut => "pass-through-stdout",
            Flag::PassThroughStdErr => "pass-through-stderr",
            Flag::PassThroughStdIn => "pass-through-stdin",
            Flag::TrimSpace => "trim-space",
            Flag::FirstLine => "first-line",
            Flag::Strict => "strict",
            Flag::Verbose => "verbose",
        }
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Flag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        let flag = match normalized.as_str() {
            "must-panic" => Flag::MustPanic,
            "must-exit" => Flag::MustExit,
            "warn" | "warning" => Flag::Warn,
            "no-annotate" => Flag::NoAnnotate,
            "std-err-in-result" | "stderr-in-result" => Flag::StdErrInResult,
            "pass-through" | "passthrough" => Flag::PassThrough,
            "pass-through-stdout" | "pass-through-std-out" => Flag::PassThroughStdOut,
            "pass-through-stderr" | "pass-through-std-err" => Flag::PassThroughStdErr,
            "pass-through-stdin" | "pass-through-std-in" => Flag::PassThroughStdIn,
            "trim-space" => Flag::TrimSpace,
            "first-line" => Flag::FirstLine,
            "strict" => Flag::Strict,
            "verbose" => Flag::Verbose,
            other => return Err(format!("unknown flag: {other}")),
        };
        Ok(flag)
    }
}

impl TryFrom<String> for Flag {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// An unordered set of [`Flag`]s.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Flags(u16);

impl Flags {
    pub const fn empty() -> Self {
        Flags(0)
    }

    pub fn contains(self, flag: Flag) -> bool {
        self.0 & flag.bit() != 0
    }

    pub fn insert(&mut self, flag: Flag) {
        self.0 |= flag.bit();
    }

    pub fn with(mut self, flag: Flag) -> Self {
        self.insert(flag);
        self
    }

    pub fn union(self, other: Flags) -> Self {
        Flags(self.0 | other.0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the set with `PassThrough` expanded into its three
    /// constituents. The alias itself stays in the set.
    pub fn expanded(self) -> Self {
        if self.contains(Flag::PassThrough) {
            self.with(Flag::PassThroughStdIn)
                .with(Flag::PassThroughStdOut)
                .with(Flag::PassThroughStdErr)
        } else {
            self
        }
    }

    pub fn iter(self) -> impl Iterator<Item = Flag> {
        Flag::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

impl fmt::Debug for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl From<Flag> for Flags {
    fn from(flag: Flag) -> Self {
        Flags::empty().with(flag)
    }
}

impl<const N: usize> From<[Flag; N]> for Flags {
    fn from(flags: [Flag; N]) -> Self {
        flags.into_iter().collect()
    }
}

impl From<&[Flag]> for Flags {
    fn from(flags: &[Flag]) -> Self {
        flags.iter().copied().collect()
    }
}

impl From<Vec<Flag>> for Flags {
    fn from(flags: Vec<Flag>) -> Self {
        flags.into_iter().collect()
    }
}

impl FromIterator<Flag> for Flags {
    fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
        let mut flags = Flags::empty();
        flags.extend(iter);
        flags
    }
}

impl Extend<Flag> for Flags {
    fn extend<I: IntoIterator<Item = Flag>>(&mut self, iter: I) {
        for flag in iter {
            self.insert(flag);
        }
    }
}

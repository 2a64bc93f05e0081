// src/exec/mod.rs

//! Process execution layer.
//!
//! Command lines run through `sh -c` using `tokio::process::Command`.
//!
//! - [`context`] owns [`Context`], the public surface: construction,
//!   `exec`/`execf` and `pipe_exec`/`pipe_execf`.
//! - `streams` decides how stdin/stdout/stderr are wired for one
//!   invocation and drains captured pipes.
//! - [`escalation`] is the single place that decides what a failure does
//!   (return, warn, exit, panic).
//! - [`output`] holds the returned [`Output`] and the `TrimSpace` /
//!   `FirstLine` post-processing.

pub mod context;
pub mod escalation;
pub mod output;
pub(crate) mod streams;

pub use context::{Context, SHELL, STRICT_PREAMBLE};
pub use escalation::Escalation;
pub use output::{Output, first_line, post_process};

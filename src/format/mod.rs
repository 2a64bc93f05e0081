// src/format/mod.rs

//! Output sink used by the execution context for its verbose preamble and
//! for warning/error lines.
//!
//! - [`Formatter`] is the interface the context depends on.
//! - [`Silenced`] swallows everything; the shell probe runs with it.
//! - [`Console`] writes to the host's stdout/stderr, optionally styled with
//!   ANSI escapes via `anstyle`.

mod console;
mod silenced;

use std::fmt;
use std::sync::Arc;

pub use console::Console;
pub use silenced::Silenced;

/// A styled print function produced by [`Formatter::make_printer`].
pub type Printer = Arc<dyn Fn(fmt::Arguments<'_>) + Send + Sync>;

/// Foreground/background color requested for a printer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    None,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

/// Text emphasis requested for a printer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emphasis {
    Bold,
    Dim,
    Italic,
    Underline,
}

pub trait Formatter: Send + Sync {
    /// Build a print function that renders its arguments with the given style.
    fn make_printer(&self, fg: Color, bg: Color, emphasis: &[Emphasis]) -> Printer;

    /// Emit `msg` as a warning line.
    fn warning_line(&self, msg: &str);

    /// Emit `msg` as an error line.
    fn error_line(&self, msg: &str);
}

impl<F: Formatter + ?Sized> Formatter for Arc<F> {
    fn make_printer(&self, fg: Color, bg: Color, emphasis: &[Emphasis]) -> Printer {
        (**self).make_printer(fg, bg, emphasis)
    }

    fn warning_line(&self, msg: &str) {
        (**self).warning_line(msg)
    }

    fn error_line(&self, msg: &str) {
        (**self).error_line(msg)
    }
}

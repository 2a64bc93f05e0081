// src/format/console.rs

use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

use anstream::stream::{AsLockedWrite, RawStream};
use anstream::{AutoStream, ColorChoice};
use anstyle::{AnsiColor, Effects, Style};

use super::{Color, Emphasis, Formatter, Printer};

/// Writes printer output to stdout and warning/error lines to stderr.
///
/// Warning and error lines are prefixed with `WARNING: ` / `ERROR: ` (bold
/// yellow / bold red). Every write goes through an [`AutoStream`], so whether
/// styling survives is decided per stream: under [`ColorChoice::Auto`] a
/// redirected stderr gets plain text even when stdout is a terminal, and
/// `NO_COLOR` / `CLICOLOR` / `CLICOLOR_FORCE` are honoured.
#[derive(Debug, Clone, Copy)]
pub struct Console {
    choice: ColorChoice,
}

impl Console {
    pub fn with_choice(choice: ColorChoice) -> Self {
        Self { choice }
    }

    /// Unstyled output.
    pub fn plain() -> Self {
        Self::with_choice(ColorChoice::Never)
    }

    /// ANSI-styled output, whatever the streams are connected to.
    pub fn ansi() -> Self {
        Self::with_choice(ColorChoice::AlwaysAnsi)
    }

    /// Styled where the stream and environment support it.
    pub fn auto() -> Self {
        Self::with_choice(ColorChoice::Auto)
    }

    pub fn choice(&self) -> ColorChoice {
        self.choice
    }

    fn write_line<S: RawStream + AsLockedWrite>(&self, raw: S, label: &str, color: AnsiColor, msg: &str) {
        let style = Style::new().fg_color(Some(color.into())).bold();
        let mut out = AutoStream::new(raw, self.choice);
        let _ = writeln!(out, "{}{label}{}{msg}", style.render(), style.render_reset());
        let _ = out.flush();
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::auto()
    }
}

impl Formatter for Console {
    fn make_printer(&self, fg: Color, bg: Color, emphasis: &[Emphasis]) -> Printer {
        let choice = self.choice;
        let style = to_style(fg, bg, emphasis);
        Arc::new(move |args: fmt::Arguments<'_>| {
            let mut out = AutoStream::new(io::stdout().lock(), choice);
            let _ = write!(out, "{}{args}{}", style.render(), style.render_reset());
            let _ = out.flush();
        })
    }

    fn warning_line(&self, msg: &str) {
        self.write_line(io::stderr().lock(), "WARNING: ", AnsiColor::Yellow, msg);
    }

    fn error_line(&self, msg: &str) {
        self.write_line(io::stderr().lock(), "ERROR: ", AnsiColor::Red, msg);
    }
}

fn to_style(fg: Color, bg: Color, emphasis: &[Emphasis]) -> Style {
    let effects = emphasis.iter().fold(Effects::new(), |acc, e| {
        acc | match e {
            Emphasis::Bold => Effects::BOLD,
            Emphasis::Dim => Effects::DIMMED,
            Emphasis::Italic => Effects::ITALIC,
            Emphasis::Underline => Effects::UNDERLINE,
        }
    });

    Style::new()
        .fg_color(ansi_color(fg).map(Into::into))
        .bg_color(ansi_color(bg).map(Into::into))
        .effects(effects)
}

fn ansi_color(color: Color) -> Option<AnsiColor> {
    match color {
        Color::None => None,
        Color::Black => Some(AnsiColor::Black),
        Color::Red => Some(AnsiColor::Red),
        Color::Green => Some(AnsiColor::Green),
        Color::Yellow => Some(AnsiColor::Yellow),
        Color::Blue => Some(AnsiColor::Blue),
        Color::Magenta => Some(AnsiColor::Magenta),
        Color::Cyan => Some(AnsiColor::Cyan),
        Color::White => Some(AnsiColor::White),
    }
}

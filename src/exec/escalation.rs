// src/exec/escalation.rs

//! What a context does with a failed invocation.

use tracing::debug;

use crate::errors::ShellError;
use crate::flags::{Flag, Flags};
use crate::format::Formatter;

/// Error policy, resolved once from the flag set.
///
/// Precedence when several flags are set: `MustExit`, then `MustPanic`,
/// then `Warn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Escalation {
    /// Hand the error back to the caller.
    #[default]
    Return,
    /// Print a warning line, then hand the error back.
    Warn,
    /// Print an error line and terminate the host with status 1.
    Exit,
    /// Panic with the rendered error.
    Panic,
}

impl Escalation {
    pub fn from_flags(flags: Flags) -> Self {
        if flags.contains(Flag::MustExit) {
            Escalation::Exit
        } else if flags.contains(Flag::MustPanic) {
            Escalation::Panic
        } else if flags.contains(Flag::Warn) {
            Escalation::Warn
        } else {
            Escalation::Return
        }
    }

    /// Apply the policy to `err`. Returns only for `Return` and `Warn`.
    pub fn apply(self, formatter: &dyn Formatter, err: &ShellError) {
        debug!(policy = ?self, error = %err, "escalating command failure");
        match self {
            Escalation::Return => {}
            Escalation::Warn => formatter.warning_line(&err.to_string()),
            Escalation::Exit => {
                formatter.error_line(&err.to_string());
                std::process::exit(1);
            }
            Escalation::Panic => panic!("{err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fmt;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::errors::ExitError;
    use crate::format::{Color, Emphasis, Printer};

    #[derive(Default)]
    struct Lines(Mutex<Vec<String>>);

    impl Formatter for Lines {
        fn make_printer(&self, _: Color, _: Color, _: &[Emphasis]) -> Printer {
            Arc::new(|_: fmt::Arguments<'_>| {})
        }

        fn warning_line(&self, msg: &str) {
            self.0.lock().unwrap().push(format!("warning: {msg}"));
        }

        fn error_line(&self, msg: &str) {
            self.0.lock().unwrap().push(format!("error: {msg}"));
        }
    }

    fn failure() -> ShellError {
        ExitError::new(4, "false", "", Flags::empty()).into()
    }

    #[test]
    fn precedence_is_exit_panic_warn() {
        let all = Flags::from([Flag::Warn, Flag::MustPanic, Flag::MustExit]);
        assert_eq!(Escalation::from_flags(all), Escalation::Exit);
        assert_eq!(
            Escalation::from_flags(Flags::from([Flag::Warn, Flag::MustPanic])),
            Escalation::Panic
        );
        assert_eq!(Escalation::from_flags(Flag::Warn.into()), Escalation::Warn);
        assert_eq!(Escalation::from_flags(Flags::empty()), Escalation::Return);
    }

    #[test]
    fn warn_prints_rendered_error() {
        let lines = Lines::default();
        Escalation::Warn.apply(&lines, &failure());
        assert_eq!(*lines.0.lock().unwrap(), vec!["warning: false returned 4"]);
    }

    #[test]
    fn return_is_silent() {
        let lines = Lines::default();
        Escalation::Return.apply(&lines, &failure());
        assert!(lines.0.lock().unwrap().is_empty());
    }

    #[test]
    #[should_panic(expected = "false returned 4")]
    fn panic_uses_rendered_error() {
        Escalation::Panic.apply(&Lines::default(), &failure());
    }
}

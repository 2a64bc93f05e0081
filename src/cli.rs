// src/cli.rs

//! CLI argument parsing for the `shellcmd` binary using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::flags::Flag;
use crate::format::Console;

/// Command-line arguments for `shellcmd`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "shellcmd",
    version,
    about = "Run a shell command line with capture, pass-through and error policy flags.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to a profile file (TOML).
    ///
    /// Default: `Shellcmd.toml` in the current directory, if it exists.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Profile from the config file to apply.
    #[arg(long, short, value_name = "NAME")]
    pub profile: Option<String>,

    /// Extra policy flag (repeatable), e.g. `strict`, `trim-space`, `warn`.
    #[arg(long = "flag", short = 'f', value_name = "FLAG")]
    pub flags: Vec<Flag>,

    /// Working directory for the command. Overrides the profile.
    #[arg(long, short = 'C', value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Pipe this process's stdin into the command.
    #[arg(long)]
    pub stdin: bool,

    /// When to style verbose/warning/error output.
    #[arg(long, value_enum, value_name = "WHEN", default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SHELLCMD_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// The command line. Words are joined with single spaces and handed to
    /// `sh -c` without escaping.
    #[arg(required = true, trailing_var_arg = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn console(self) -> Console {
        Console::with_choice(self.into())
    }
}

impl From<ColorChoice> for anstream::ColorChoice {
    fn from(choice: ColorChoice) -> Self {
        match choice {
            ColorChoice::Auto => anstream::ColorChoice::Auto,
            ColorChoice::Always => anstream::ColorChoice::Always,
            ColorChoice::Never => anstream::ColorChoice::Never,
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags_and_trailing_command() {
        let args = CliArgs::try_parse_from([
            "shellcmd", "-f", "strict", "--flag", "trim-space", "-C", "/tmp", "--", "ls", "-la",
        ])
        .unwrap();
        assert_eq!(args.flags, vec![Flag::Strict, Flag::TrimSpace]);
        assert_eq!(args.dir, Some(PathBuf::from("/tmp")));
        assert_eq!(args.command, vec!["ls", "-la"]);
        assert_eq!(args.color, ColorChoice::Auto);
    }

    #[test]
    fn rejects_unknown_flags() {
        assert!(CliArgs::try_parse_from(["shellcmd", "-f", "loud", "--", "true"]).is_err());
    }

    #[test]
    fn color_choice_maps_onto_the_console() {
        let args = CliArgs::try_parse_from(["shellcmd", "--color", "never", "--", "true"]).unwrap();
        assert_eq!(args.color.console().choice(), anstream::ColorChoice::Never);
        assert_eq!(ColorChoice::Always.console().choice(), anstream::ColorChoice::Always);
        assert_eq!(ColorChoice::Auto.console().choice(), anstream::ColorChoice::Auto);
    }

    #[test]
    fn requires_a_command() {
        assert!(CliArgs::try_parse_from(["shellcmd", "-f", "strict"]).is_err());
    }
}

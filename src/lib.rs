// src/lib.rs

//! Run shell command lines and capture their results under a configurable
//! policy.
//!
//! A [`Context`] fixes a working directory, a [`Formatter`] and a set of
//! [`Flag`]s. Each invocation hands a command line to `sh -c`, wires the
//! child's streams per the flags, waits for it, and returns an [`Output`]
//! carrying captured stdout, captured stderr and the outcome.
//!
//! ```no_run
//! use shellcmd::{Context, Flag, Silenced, execf};
//!
//! # async fn demo() -> shellcmd::Result<()> {
//! let ctx = Context::new("", Silenced, [Flag::TrimSpace, Flag::Strict]).await;
//! let branch = execf!(ctx, "git -C {} rev-parse --abbrev-ref HEAD", "repo")
//!     .await
//!     .into_result()?
//!     .0;
//! # let _ = branch;
//! # Ok(())
//! # }
//! ```
//!
//! Command lines are not escaped. Use [`shell_join`] / [`quote`] for values
//! that are not trusted.

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod flags;
pub mod format;
pub mod logging;
pub mod probe;
pub mod util;

use std::path::{Path, PathBuf};

use anyhow::{Result as AnyResult, bail};
use tracing::{debug, info};

pub use crate::errors::{ExitError, Result, ShellError};
pub use crate::exec::{Context, Escalation, Output};
pub use crate::flags::{Flag, Flags};
pub use crate::format::{Color, Console, Emphasis, Formatter, Printer, Silenced};
pub use crate::util::{quote, shell_join};

use crate::cli::CliArgs;
use crate::config::loader::{default_config_path, load_and_validate};
use crate::config::ResolvedProfile;

/// Run a formatted command line: `execf!(ctx, "ls {}", dir)`.
#[macro_export]
macro_rules! execf {
    ($ctx:expr, $($arg:tt)+) => {
        $ctx.execf(::std::format_args!($($arg)+))
    };
}

/// Run a formatted command line with `reader` piped into its stdin:
/// `pipe_execf!(ctx, reader, "wc -l")`.
#[macro_export]
macro_rules! pipe_execf {
    ($ctx:expr, $reader:expr, $($arg:tt)+) => {
        $ctx.pipe_execf($reader, ::std::format_args!($($arg)+))
    };
}

/// Entry point used by `main.rs`. Returns the exit code for the host.
///
/// This wires together:
/// - profile loading (explicit `--config`, or `Shellcmd.toml` if present)
/// - flag and working directory overrides from the command line
/// - the execution context and the single invocation
pub async fn run(args: CliArgs) -> AnyResult<i32> {
    let profile = load_profile(&args)?;

    let mut flags = profile.flags;
    flags.extend(args.flags.iter().copied());
    let working_dir = args.dir.clone().unwrap_or(profile.working_dir);

    let formatter = std::sync::Arc::new(args.color.console());
    let ctx = Context::try_new(&working_dir, formatter.clone(), flags).await?;
    let cmd_line = args.command.join(" ");

    info!(cmd = %cmd_line, flags = ?ctx.flags(), "running command");

    let output = if args.stdin {
        ctx.pipe_exec(tokio::io::stdin(), cmd_line).await
    } else {
        ctx.exec(cmd_line).await
    };

    emit(&output.stdout, &mut std::io::stdout())?;
    emit(&output.stderr, &mut std::io::stderr())?;

    match &output.status {
        Ok(()) => Ok(0),
        Err(err) => {
            // Warn has already printed the failure.
            if ctx.escalation() == Escalation::Return {
                formatter.error_line(&err.to_string());
            }
            Ok(err.exit_code().filter(|c| *c != 0).unwrap_or(1))
        }
    }
}

fn load_profile(args: &CliArgs) -> AnyResult<ResolvedProfile> {
    let path: Option<PathBuf> = match &args.config {
        Some(path) => Some(path.clone()),
        None => Some(default_config_path()).filter(|p| p.is_file()),
    };

    match path {
        Some(path) => {
            debug!(config = %path.display(), profile = ?args.profile, "loading profile");
            let cfg = load_and_validate(&path)?;
            Ok(cfg.resolve(args.profile.as_deref())?)
        }
        None if args.profile.is_some() => {
            bail!("--profile requires a config file (none given, no {} found)", default_path_display())
        }
        None => Ok(ResolvedProfile::default()),
    }
}

fn default_path_display() -> String {
    default_config_path().display().to_string()
}

/// Write captured text, ending it with a newline if it lacks one.
fn emit(text: &str, out: &mut impl std::io::Write) -> std::io::Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    out.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    out.flush()
}

/// Directory a relative `working_dir` in a config file is resolved against.
pub(crate) fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::new(),
    }
}

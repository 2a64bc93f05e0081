// src/exec/context.rs

//! The execution context: a working directory, a formatter and a flag set,
//! fixed at construction and shared by every invocation.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::sync::Arc;

use tokio::io::AsyncRead;
use tokio::process::Command;
use tracing::debug;

use crate::errors::{ExitError, Result, ShellError};
use crate::exec::escalation::Escalation;
use crate::exec::output::{Output, post_process};
use crate::exec::streams::{self, Input, StdinSource, StreamPlan};
use crate::flags::{Flag, Flags};
use crate::format::{Color, Emphasis, Formatter, Printer};
use crate::probe;

/// Shell interpreter, located via `PATH`.
pub const SHELL: &str = "sh";

/// Prepended to the command line under [`Flag::Strict`].
pub const STRICT_PREAMBLE: &str = "set -eu -o pipefail; ";

/// Printers bound once for the verbose preamble.
#[derive(Clone)]
struct VerbosePrinters {
    regular: Printer,
    green: Printer,
    bold: Printer,
}

impl VerbosePrinters {
    fn new(formatter: &dyn Formatter) -> Self {
        Self {
            regular: formatter.make_printer(Color::None, Color::None, &[]),
            green: formatter.make_printer(Color::Green, Color::None, &[]),
            bold: formatter.make_printer(Color::None, Color::None, &[Emphasis::Bold]),
        }
    }
}

/// Runs shell command lines under a fixed policy.
///
/// Command lines are handed to `sh -c` verbatim. Nothing is escaped, so any
/// value interpolated into a command line must already be safe for the
/// shell; see [`shell_join`](crate::shell_join).
///
/// A context never changes after construction and can be shared between
/// tasks; every invocation is independent.
#[derive(Clone)]
pub struct Context {
    working_dir: PathBuf,
    formatter: Arc<dyn Formatter>,
    flags: Flags,
    escalation: Escalation,
    verbose: Option<VerbosePrinters>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("working_dir", &self.working_dir)
            .field("flags", &self.flags)
            .field("escalation", &self.escalation)
            .finish_non_exhaustive()
    }
}

impl Context {
    /// Build a context, running the shell probe first if it has not run yet.
    ///
    /// An empty `working_dir` or `"."` means the current directory.
    ///
    /// # Panics
    ///
    /// If the shell probe fails or the working directory cannot be resolved.
    /// Use [`Context::try_new`] to get these as errors instead.
    pub async fn new(
        working_dir: impl AsRef<Path>,
        formatter: impl Formatter + 'static,
        flags: impl Into<Flags>,
    ) -> Self {
        match Self::try_new(working_dir, formatter, flags).await {
            Ok(ctx) => ctx,
            Err(err) => panic!("{err}"),
        }
    }

    pub async fn try_new(
        working_dir: impl AsRef<Path>,
        formatter: impl Formatter + 'static,
        flags: impl Into<Flags>,
    ) -> Result<Self> {
        probe::check().await?;
        Self::unchecked(working_dir, formatter, flags)
    }

    /// Build a context without consulting the shell probe. The probe itself
    /// uses this.
    pub(crate) fn unchecked(
        working_dir: impl AsRef<Path>,
        formatter: impl Formatter + 'static,
        flags: impl Into<Flags>,
    ) -> Result<Self> {
        let flags = flags.into().expanded();
        let formatter: Arc<dyn Formatter> = Arc::new(formatter);
        let verbose = flags
            .contains(Flag::Verbose)
            .then(|| VerbosePrinters::new(formatter.as_ref()));

        Ok(Self {
            working_dir: resolve_working_dir(working_dir.as_ref())?,
            formatter,
            flags,
            escalation: Escalation::from_flags(flags),
            verbose,
        })
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// The flag set, with `PassThrough` expanded.
    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn escalation(&self) -> Escalation {
        self.escalation
    }

    /// Run `cmd_line` with stdin bound per the flags.
    pub async fn exec(&self, cmd_line: impl Into<String>) -> Output {
        self.run(cmd_line.into(), None).await
    }

    /// Like [`exec`](Self::exec), with a formatted command line.
    ///
    /// The line is materialised before the returned future first polls.
    /// The [`execf!`](crate::execf) macro wraps this.
    pub fn execf<'a>(&'a self, args: fmt::Arguments<'_>) -> impl Future<Output = Output> + use<'a> {
        self.exec(args.to_string())
    }

    /// Run `cmd_line` with `reader` streamed into the child's stdin.
    ///
    /// Takes priority over [`Flag::PassThroughStdIn`].
    pub async fn pipe_exec<R>(&self, reader: R, cmd_line: impl Into<String>) -> Output
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        self.run(cmd_line.into(), Some(Box::new(reader))).await
    }

    /// Like [`pipe_exec`](Self::pipe_exec), with a formatted command line.
    /// The [`pipe_execf!`](crate::pipe_execf) macro wraps this.
    pub fn pipe_execf<'a, R>(
        &'a self,
        reader: R,
        args: fmt::Arguments<'_>,
    ) -> impl Future<Output = Output> + use<'a, R>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        self.pipe_exec(reader, args.to_string())
    }

    async fn run(&self, cmd_line: String, input: Option<Input>) -> Output {
        let (stdout, stderr, status) = match self.spawn_and_wait(&cmd_line, input).await {
            Ok((stdout, stderr, exit)) => {
                let status = self.classify(&cmd_line, exit, &stderr);
                (stdout, stderr, status)
            }
            Err(err) => (String::new(), String::new(), Err(err)),
        };

        if let Err(err) = &status {
            self.escalation.apply(self.formatter.as_ref(), err);
        }

        let (stdout, stderr) = post_process(self.flags, stdout, stderr);
        Output {
            stdout,
            stderr,
            status,
        }
    }

    async fn spawn_and_wait(
        &self,
        cmd_line: &str,
        input: Option<Input>,
    ) -> Result<(String, String, ExitStatus)> {
        self.check_working_dir().await?;

        let mut cmd = self.shell_command(cmd_line);
        cmd.current_dir(&self.working_dir).kill_on_drop(true);

        let stdin = StdinSource::select(input, self.flags);
        let plan = StreamPlan::from_flags(self.flags);
        let merged = plan.configure(&mut cmd, &stdin)?;

        self.print_preamble(cmd_line);

        debug!(
            cmd = %cmd_line,
            dir = %self.working_dir.display(),
            strict = self.flags.contains(Flag::Strict),
            "spawning shell"
        );

        let mut child = cmd.spawn().map_err(|source| ShellError::Launch {
            cmd_line: cmd_line.to_string(),
            source,
        })?;
        // Release the parent's copies of the merged pipe's write ends so the
        // reader sees EOF once the child exits.
        drop(cmd);

        if let StdinSource::Reader(reader) = stdin {
            if let Some(child_stdin) = child.stdin.take() {
                streams::spawn_stdin_copier(reader, child_stdin);
            }
        }

        let stdout_task = match merged {
            Some(pipe) => Some(streams::spawn_drain_blocking(pipe)),
            None => child.stdout.take().map(streams::spawn_drain),
        };
        let stderr_task = child.stderr.take().map(streams::spawn_drain);

        let status = child.wait().await?;
        let stdout = streams::collect(stdout_task).await?;
        let stderr = streams::collect(stderr_task).await?;

        debug!(
            cmd = %cmd_line,
            exit_code = ?status.code(),
            success = status.success(),
            "shell exited"
        );

        Ok((stdout, stderr, status))
    }

    /// A missing working directory would otherwise surface as a spawn
    /// failure indistinguishable from a missing shell.
    async fn check_working_dir(&self) -> Result<()> {
        let invalid = |source| ShellError::WorkingDir {
            path: self.working_dir.clone(),
            source,
        };
        let meta = tokio::fs::metadata(&self.working_dir).await.map_err(invalid)?;
        if !meta.is_dir() {
            return Err(invalid(io::Error::from(io::ErrorKind::NotADirectory)));
        }
        Ok(())
    }

    fn shell_command(&self, cmd_line: &str) -> Command {
        let mut cmd = Command::new(SHELL);
        cmd.arg("-c");
        if self.flags.contains(Flag::Strict) {
            cmd.arg(format!("{STRICT_PREAMBLE}{cmd_line}"));
        } else {
            cmd.arg(cmd_line);
        }
        cmd
    }

    fn print_preamble(&self, cmd_line: &str) {
        if let Some(p) = &self.verbose {
            (p.regular)(format_args!("{}", self.working_dir.display()));
            (p.green)(format_args!(" $ "));
            (p.bold)(format_args!("{cmd_line}"));
            (p.regular)(format_args!("\n"));
        }
    }

    fn classify(&self, cmd_line: &str, status: ExitStatus, stderr: &str) -> Result<()> {
        if status.success() {
            return Ok(());
        }
        match status.code() {
            Some(code) => Err(ExitError::new(code, cmd_line, stderr, self.flags).into()),
            None => Err(ShellError::Signaled {
                cmd_line: cmd_line.to_string(),
                signal: exit_signal(status),
            }),
        }
    }
}

fn resolve_working_dir(dir: &Path) -> Result<PathBuf> {
    let resolved = if dir.as_os_str().is_empty() || dir == Path::new(".") {
        std::env::current_dir()
    } else if dir.is_absolute() {
        Ok(dir.to_path_buf())
    } else {
        std::path::absolute(dir)
    };

    resolved.map_err(|source| ShellError::WorkingDir {
        path: dir.to_path_buf(),
        source,
    })
}

#[cfg(unix)]
fn exit_signal(status: ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn exit_signal(_status: ExitStatus) -> Option<i32> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Silenced;

    #[test]
    fn empty_and_dot_resolve_to_current_dir() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(resolve_working_dir(Path::new("")).unwrap(), cwd);
        assert_eq!(resolve_working_dir(Path::new(".")).unwrap(), cwd);
    }

    #[test]
    fn relative_dirs_become_absolute() {
        let resolved = resolve_working_dir(Path::new("sub/dir")).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("sub/dir"));
    }

    #[test]
    fn construction_expands_pass_through_and_binds_printers() {
        let ctx = Context::unchecked("/", Silenced, [Flag::PassThrough, Flag::Verbose]).unwrap();
        assert!(ctx.flags().contains(Flag::PassThroughStdIn));
        assert!(ctx.flags().contains(Flag::PassThroughStdErr));
        assert!(ctx.verbose.is_some());

        let quiet = Context::unchecked("/", Silenced, Flags::empty()).unwrap();
        assert!(quiet.verbose.is_none());
        assert_eq!(quiet.working_dir(), Path::new("/"));
    }

    #[test]
    fn strict_prefixes_the_script() {
        let ctx = Context::unchecked("/", Silenced, Flag::Strict).unwrap();
        let cmd = ctx.shell_command("false | wc -l");
        let args: Vec<_> = cmd.as_std().get_args().collect();
        assert_eq!(args, ["-c", "set -eu -o pipefail; false | wc -l"]);
    }

    #[tokio::test]
    async fn missing_working_dir_is_reported_before_spawning() {
        let ctx = Context::unchecked("/definitely/not/here", Silenced, Flags::empty()).unwrap();
        let out = ctx.exec("true").await;

        match out.error() {
            Some(ShellError::WorkingDir { path, source }) => {
                assert_eq!(path, Path::new("/definitely/not/here"));
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected a working directory error, got {other:?}"),
        }
        assert_eq!(out.exit_code(), None);
    }

    #[tokio::test]
    async fn captures_both_streams_and_exit_code() {
        let ctx = Context::unchecked("", Silenced, Flags::empty()).unwrap();
        let out = ctx.exec("printf out; printf err >&2; exit 5").await;
        assert_eq!(out.stdout, "out");
        assert_eq!(out.stderr, "err");
        let err = out.exit_error().expect("exit error");
        assert_eq!(err.exit_code, 5);
        assert_eq!(err.stderr, "err");
        assert_eq!(err.cmd_line, "printf out; printf err >&2; exit 5");
    }
}

// src/exec/streams.rs

//! How the child's standard streams are wired for one invocation.

use std::io::{self, PipeReader, Read};
use std::process::Stdio;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{ChildStdin, Command};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::flags::{Flag, Flags};

/// Boxed input source for `pipe_exec`.
pub(crate) type Input = Box<dyn AsyncRead + Send + Unpin>;

/// Where the child's stdin comes from. Priority: reader, inherit, nothing.
pub(crate) enum StdinSource {
    Reader(Input),
    Inherit,
    Null,
}

impl StdinSource {
    pub(crate) fn select(input: Option<Input>, flags: Flags) -> Self {
        match input {
            Some(reader) => StdinSource::Reader(reader),
            None if flags.contains(Flag::PassThroughStdIn) => StdinSource::Inherit,
            None => StdinSource::Null,
        }
    }

    fn stdio(&self) -> Stdio {
        match self {
            StdinSource::Reader(_) => Stdio::piped(),
            StdinSource::Inherit => Stdio::inherit(),
            StdinSource::Null => Stdio::null(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StdoutSink {
    Inherit,
    Capture,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StderrSink {
    Inherit,
    /// Follow stdout: into the stdout capture, or to the host's stdout when
    /// stdout is passed through.
    MergeIntoStdout,
    Capture,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StreamPlan {
    pub(crate) stdout: StdoutSink,
    pub(crate) stderr: StderrSink,
}

impl StreamPlan {
    /// `flags` must already have `PassThrough` expanded.
    pub(crate) fn from_flags(flags: Flags) -> Self {
        let stdout = if flags.contains(Flag::PassThroughStdOut) {
            StdoutSink::Inherit
        } else {
            StdoutSink::Capture
        };

        let stderr = if flags.contains(Flag::PassThroughStdErr) {
            StderrSink::Inherit
        } else if flags.contains(Flag::StdErrInResult) {
            StderrSink::MergeIntoStdout
        } else {
            StderrSink::Capture
        };

        Self { stdout, stderr }
    }

    /// Configure stdin/stdout/stderr on `cmd`.
    ///
    /// When stderr is merged into a captured stdout both descriptors share
    /// one OS pipe so the child's writes keep their order; the read end is
    /// returned. The write ends live inside `cmd` until it is dropped.
    pub(crate) fn configure(
        &self,
        cmd: &mut Command,
        stdin: &StdinSource,
    ) -> io::Result<Option<PipeReader>> {
        cmd.stdin(stdin.stdio());

        match (self.stdout, self.stderr) {
            (StdoutSink::Capture, StderrSink::MergeIntoStdout) => {
                let (reader, writer) = io::pipe()?;
                cmd.stdout(writer.try_clone()?);
                cmd.stderr(writer);
                return Ok(Some(reader));
            }
            (StdoutSink::Inherit, StderrSink::MergeIntoStdout) => {
                cmd.stdout(Stdio::inherit());
                cmd.stderr(io::stdout());
            }
            (stdout, stderr) => {
                cmd.stdout(match stdout {
                    StdoutSink::Inherit => Stdio::inherit(),
                    StdoutSink::Capture => Stdio::piped(),
                });
                cmd.stderr(match stderr {
                    StderrSink::Inherit => Stdio::inherit(),
                    _ => Stdio::piped(),
                });
            }
        }

        Ok(None)
    }
}

/// Stream `input` into the child's stdin in the background. Stdin is closed
/// when the reader reaches EOF or the child stops reading.
pub(crate) fn spawn_stdin_copier(mut input: Input, mut stdin: ChildStdin) -> JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::io::copy(&mut input, &mut stdin).await {
            Ok(bytes) => trace!(bytes, "stdin input exhausted; closing child stdin"),
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                debug!("child closed stdin before input was exhausted")
            }
            Err(e) => warn!(error = %e, "copying input into child stdin failed"),
        }
    })
}

/// Read an async pipe to its end on a separate task.
pub(crate) fn spawn_drain<R>(mut pipe: R) -> JoinHandle<io::Result<Vec<u8>>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buffer = Vec::new();
        pipe.read_to_end(&mut buffer).await.map(|_| buffer)
    })
}

/// Read the shared stdout/stderr pipe to its end on the blocking pool.
pub(crate) fn spawn_drain_blocking(mut pipe: PipeReader) -> JoinHandle<io::Result<Vec<u8>>> {
    tokio::task::spawn_blocking(move || {
        let mut buffer = Vec::new();
        pipe.read_to_end(&mut buffer).map(|_| buffer)
    })
}

/// Await a drain task; an absent task yields an empty buffer.
pub(crate) async fn collect(task: Option<JoinHandle<io::Result<Vec<u8>>>>) -> io::Result<String> {
    let bytes = match task {
        Some(handle) => handle.await.map_err(io::Error::other)??,
        None => Vec::new(),
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(flags: impl Into<Flags>) -> StreamPlan {
        StreamPlan::from_flags(flags.into().expanded())
    }

    #[test]
    fn default_captures_both_streams() {
        assert_eq!(
            plan(Flags::empty()),
            StreamPlan {
                stdout: StdoutSink::Capture,
                stderr: StderrSink::Capture,
            }
        );
    }

    #[test]
    fn pass_through_wins_over_merge() {
        let p = plan([Flag::StdErrInResult, Flag::PassThroughStdErr]);
        assert_eq!(p.stderr, StderrSink::Inherit);

        let p = plan([Flag::StdErrInResult, Flag::PassThrough]);
        assert_eq!(p.stdout, StdoutSink::Inherit);
        assert_eq!(p.stderr, StderrSink::Inherit);
    }

    #[test]
    fn merge_is_selected_without_pass_through() {
        let p = plan(Flag::StdErrInResult);
        assert_eq!(p.stdout, StdoutSink::Capture);
        assert_eq!(p.stderr, StderrSink::MergeIntoStdout);
    }

    #[test]
    fn reader_takes_priority_over_inherited_stdin() {
        let flags = Flags::from(Flag::PassThroughStdIn);
        let input: Input = Box::new(&b"data"[..]);
        assert!(matches!(
            StdinSource::select(Some(input), flags),
            StdinSource::Reader(_)
        ));
        assert!(matches!(StdinSource::select(None, flags), StdinSource::Inherit));
        assert!(matches!(
            StdinSource::select(None, Flags::empty()),
            StdinSource::Null
        ));
    }
}

// src/probe.rs

//! One-shot check that `sh` is usable and that stdout/stderr capture works.
//!
//! The first call runs the probe; the outcome (success or the first failure
//! reason) is cached and handed to every later caller. Concurrent first
//! callers wait on the same lock, so the probe runs once.

use std::process::Stdio;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::errors::{Result, ShellError};
use crate::exec::{Context, SHELL};
use crate::flags::Flags;
use crate::format::Silenced;

const CANARY: &str = "echo 'stdout'; echo 'stderr' 1>&2";

/// A memoised shell probe.
///
/// The crate keeps one process-wide instance behind [`check`] and [`reset`];
/// separate instances are useful for observing the memoisation in isolation.
#[derive(Debug)]
pub struct ShellProbe {
    outcome: Mutex<Option<std::result::Result<(), String>>>,
    runs: AtomicUsize,
}

impl ShellProbe {
    pub const fn new() -> Self {
        Self {
            outcome: Mutex::const_new(None),
            runs: AtomicUsize::new(0),
        }
    }

    /// Run the probe if it has not run yet and return the cached outcome.
    pub async fn check(&self) -> Result<()> {
        let mut outcome = self.outcome.lock().await;

        if let Some(cached) = outcome.as_ref() {
            return cached.clone().map_err(ShellError::Probe);
        }

        self.runs.fetch_add(1, Ordering::SeqCst);
        let result = run_probe().await;
        match &result {
            Ok(()) => debug!(shell = SHELL, "shell probe passed"),
            Err(reason) => error!(shell = SHELL, %reason, "shell probe failed"),
        }

        *outcome = Some(result.clone());
        result.map_err(ShellError::Probe)
    }

    /// Forget the cached outcome so the next [`check`](Self::check) probes again.
    pub async fn reset(&self) {
        *self.outcome.lock().await = None;
    }

    /// How many times the probe has actually executed.
    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

impl Default for ShellProbe {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL: ShellProbe = ShellProbe::new();

/// Check the process-wide probe.
pub async fn check() -> Result<()> {
    GLOBAL.check().await
}

/// Reset the process-wide probe.
pub async fn reset() {
    GLOBAL.reset().await
}

pub fn global() -> &'static ShellProbe {
    &GLOBAL
}

async fn run_probe() -> std::result::Result<(), String> {
    let status = Command::new(SHELL)
        .args(["-c", "exit 0"])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map_err(|e| format!("cannot launch `{SHELL}`: {e}"))?;

    if !status.success() {
        return Err(format!("`{SHELL} -c 'exit 0'` did not succeed ({status})"));
    }

    let ctx = Context::unchecked("", Silenced, Flags::empty()).map_err(|e| e.to_string())?;
    let (stdout, stderr, status) = ctx.exec(CANARY).await.into_parts();
    status.map_err(|e| e.to_string())?;

    if !stdout.contains("stdout") {
        return Err("shell execution did not capture stdout correctly".to_string());
    }
    if !stderr.contains("stderr") {
        return Err("shell execution did not capture stderr correctly".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn probe_passes_on_a_posix_host() {
        let probe = ShellProbe::new();
        probe.check().await.expect("shell probe should pass");
        assert_eq!(probe.runs(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_first_checks_run_once() {
        let probe = Arc::new(ShellProbe::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let probe = Arc::clone(&probe);
                tokio::spawn(async move { probe.check().await.is_ok() })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap());
        }
        assert_eq!(probe.runs(), 1);

        probe.check().await.unwrap();
        assert_eq!(probe.runs(), 1);
    }

    #[tokio::test]
    async fn reset_forces_a_new_run() {
        let probe = ShellProbe::new();
        probe.check().await.unwrap();
        probe.reset().await;
        probe.check().await.unwrap();
        assert_eq!(probe.runs(), 2);
    }
}

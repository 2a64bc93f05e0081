#![allow(dead_code)]

use shellcmd::{Context, Flags, Silenced};
use shellcmd_test_utils::init_tracing;

/// A context in the current directory with a silenced formatter.
pub async fn context(flags: impl Into<Flags>) -> Context {
    init_tracing();
    Context::new("", Silenced, flags).await
}

use shellcmd::quote;

/// A command line that writes `stdout` to stdout and `stderr` to stderr
/// verbatim (no trailing newline added), then exits with `code`.
pub fn helper_cmd(stdout: &str, stderr: &str, code: i32) -> String {
    format!(
        "printf '%s' {}; printf '%s' {} >&2; exit {code}",
        quote(stdout),
        quote(stderr)
    )
}

use std::process::Command;

fn shellcmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_shellcmd"));
    cmd.arg("--color").arg("never");
    cmd
}

#[test]
fn prints_captured_stdout_and_succeeds() {
    let output = shellcmd()
        .args(["-f", "trim-space", "--", "echo", "'  hi  '"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "hi\n");
}

#[test]
fn exit_code_of_the_command_is_propagated() {
    let output = shellcmd().args(["--", "echo oops >&2; exit 3"]).output().unwrap();

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("oops"));
    assert!(stderr.contains("ERROR: echo oops >&2; exit 3 returned 3"), "stderr was: {stderr}");
}

#[test]
fn stdin_option_pipes_host_input() {
    use std::io::Write;
    use std::process::Stdio;

    let mut child = shellcmd()
        .args(["--stdin", "-f", "trim-space", "--", "wc", "-l"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(b"1\n2\n").unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "2\n");
}

#[test]
fn profile_without_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let output = shellcmd()
        .current_dir(dir.path())
        .args(["--profile", "x", "--", "true"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("--profile requires a config file"));
}

#[test]
fn profile_from_config_file_is_applied() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("Shellcmd.toml"),
        "[profile.first]\nflags = [\"first-line\"]\n",
    )
    .unwrap();

    let output = shellcmd()
        .current_dir(dir.path())
        .args(["-p", "first", "--", "printf 'a\\nb\\n'"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "a\n");
}

#[test]
fn auto_color_leaves_redirected_stderr_plain() {
    let output = Command::new(env!("CARGO_BIN_EXE_shellcmd"))
        .env_remove("CLICOLOR_FORCE")
        .args(["--color", "auto", "--", "exit 3"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: exit 3 returned 3"), "stderr was: {stderr}");
    assert!(!stderr.contains('\u{1b}'), "escapes leaked: {stderr:?}");
}

#[test]
fn always_color_styles_the_error_prefix() {
    let output = Command::new(env!("CARGO_BIN_EXE_shellcmd"))
        .args(["--color", "always", "--", "exit 3"])
        .output()
        .unwrap();

    assert!(String::from_utf8_lossy(&output.stderr).contains("\u{1b}["));
}

#[test]
fn missing_working_directory_exits_with_one() {
    let dir = tempfile::tempdir().unwrap();
    let output = shellcmd()
        .arg("-C")
        .arg(dir.path().join("gone"))
        .args(["--", "true"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERROR: working directory"));
}

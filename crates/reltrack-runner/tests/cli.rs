//! Runs the built binary and checks stdout, stderr and exit status.

use std::io::Write;
use std::process::{Command, Output, Stdio};

use pretty_assertions::assert_eq;

fn run_binary(input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_reltrack"))
        .env_remove("RELTRACK_INPUT")
        .env("RELTRACK_FLUSH", "0")
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start reltrack");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("Failed to write commands");

    child.wait_with_output().expect("Failed to wait for reltrack")
}

#[test]
fn test_reports_to_stdout() {
    let output = run_binary(
        "addent a\naddent b\naddent c\naddrel a b r1\naddrel c b r1\nreport\ndelent b\nreport\nend\n",
    );
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "r1 b 2;\nnone\n");
    assert!(output.stderr.is_empty());
}

#[test]
fn test_malformed_input_exits_non_zero() {
    let output = run_binary("addent a\nreport\nhello\n");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "none\n");
    assert_eq!(
        String::from_utf8_lossy(&output.stderr),
        "Error parsing instructions\n"
    );
}

#[test]
fn test_end_of_input_exits_zero() {
    let output = run_binary("addent a\n");
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_default_log_filter_keeps_stderr_empty() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_reltrack"))
        .env_remove("RELTRACK_INPUT")
        .env_remove("RUST_LOG")
        .env("RELTRACK_FLUSH", "0")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start reltrack");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(b"addent a\naddent b\naddrel a b r\ndelent a\nreport\nend\n")
        .expect("Failed to write commands");
    let output = child.wait_with_output().expect("Failed to wait for reltrack");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "none\n");
    assert!(output.stderr.is_empty());
}

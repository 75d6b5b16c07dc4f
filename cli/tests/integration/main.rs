use std::{
    io::Write,
    process::{Command, Output, Stdio},
};

use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn run_with_stdin(args: &[&str], input: &str) -> Output {
    let tinfer_bin = env!("CARGO_BIN_EXE_tinfer");
    let mut tinfer = Command::new(tinfer_bin)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("tinfer should be runnable");
    let Some(mut stdin) = tinfer.stdin.take() else {
        panic!("couldn't retrieve stdin handle to tinfer")
    };
    stdin
        .write_all(input.as_bytes())
        .expect("writing into tinfer stdin should work");
    drop(stdin);

    tinfer
        .wait_with_output()
        .expect("couldn't retrieve the output of tinfer")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("the output of tinfer should be valid utf8")
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).expect("the output of tinfer should be valid utf8")
}

#[test]
fn infer_from_stdin() {
    let output = run_with_stdin(&["infer"], "(lambda ((x : number)) : number (+ x 1))");

    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "(number -> number)\n");
}

#[test]
fn infer_from_file() {
    let dir = tempdir().expect("should be able to make a temporary directory");
    let path = dir.path().join("let.l5");
    std::fs::write(&path, "(let (((x : number) 3)) (+ x 1))")
        .expect("should be able to write the input file");

    let output = Command::new(env!("CARGO_BIN_EXE_tinfer"))
        .arg("infer")
        .arg(&path)
        .output()
        .expect("tinfer should be runnable");

    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "number\n");
}

#[test]
fn failing_inference_exits_with_error() {
    let output = run_with_stdin(&["infer"], "((lambda ((x : number)) : number x) \"hello\")");

    assert!(!output.status.success());
    assert_eq!(stdout_of(&output), "");

    let stderr = stderr_of(&output);
    assert!(stderr.contains("number"));
    assert!(stderr.contains("string"));
}

#[test]
fn json_error_format() {
    let output = run_with_stdin(&["infer", "--error-format", "json"], "(if 3 1 2)");

    assert!(!output.status.success());
    assert!(stderr_of(&output).starts_with("{\"diagnostics\":["));
}

#[test]
fn missing_file_is_reported() {
    let dir = tempdir().expect("should be able to make a temporary directory");

    let output = Command::new(env!("CARGO_BIN_EXE_tinfer"))
        .arg("infer")
        .arg(dir.path().join("missing.l5"))
        .output()
        .expect("tinfer should be runnable");

    assert!(!output.status.success());
    assert!(!stderr_of(&output).is_empty());
}

#[test]
fn pprint_ast_roundtrips_annotations() {
    let output = run_with_stdin(&["pprint-ast"], "(lambda ((x : number)) : number (+ x 1))");

    assert!(output.status.success());
    assert_eq!(
        stdout_of(&output),
        "(lambda ((x : number)) : number (+ x 1))\n"
    );
}

#[test]
fn automatic_color_on_non_tty() {
    let output = run_with_stdin(&["infer"], "(if #t 1 \"a\")");

    for stream in [stdout_of(&output), stderr_of(&output)] {
        // The prefix used for the ANSI escape codes used for terminal colors
        let ansi_code_prefix = "\x1b[";
        assert_eq!(
            stream.find(ansi_code_prefix),
            None,
            "The tinfer output shouldn't be colorized when stdout isn't a tty"
        );
    }
}

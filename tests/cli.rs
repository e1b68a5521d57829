mod common;

use common::jsonmap;
use std::io::Write;

#[test]
fn reshapes_input_and_prints_pretty_json() {
    let mut program_file = tempfile::NamedTempFile::new().unwrap();
    write!(program_file, "foo = &bar;").unwrap();

    let mut data_file = tempfile::NamedTempFile::new().unwrap();
    write!(data_file, r#"{{"bar": "hello, world!"}}"#).unwrap();

    let output = jsonmap()
        .arg(program_file.path())
        .arg(data_file.path())
        .output()
        .expect("failed to run jsonmap");

    assert!(
        output.status.success(),
        "expected exit code 0, got {:?}\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout: serde_json::Value = serde_json::from_slice(&output.stdout).expect("stdout was not valid JSON");
    assert_eq!(stdout, serde_json::json!({"foo": "hello, world!"}));
}

#[test]
fn reads_input_from_stdin_when_data_file_omitted() {
    let mut program_file = tempfile::NamedTempFile::new().unwrap();
    write!(program_file, "foo = &bar;").unwrap();

    let mut child = jsonmap()
        .arg(program_file.path())
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::piped())
        .spawn()
        .expect("failed to run jsonmap");

    child
        .stdin
        .as_mut()
        .unwrap()
        .write_all(br#"{"bar": 42}"#)
        .unwrap();

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    let stdout: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stdout, serde_json::json!({"foo": 42}));
}

#[test]
fn syntax_error_exits_with_failure_and_reports_position() {
    let mut program_file = tempfile::NamedTempFile::new().unwrap();
    write!(program_file, "foo &bar;").unwrap();
    let mut data_file = tempfile::NamedTempFile::new().unwrap();
    write!(data_file, "{{}}").unwrap();

    let output = jsonmap()
        .arg(program_file.path())
        .arg(data_file.path())
        .output()
        .expect("failed to run jsonmap");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error:"), "stderr was: {}", stderr);
}

//! End-to-end tests for the `streamdelta` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;

fn streamdelta() -> Command {
    Command::new(env!("CARGO_BIN_EXE_streamdelta"))
}

fn sample(len: usize, salt: u32) -> Vec<u8> {
    (0..len as u32)
        .map(|i| (i.wrapping_mul(2_654_435_761).wrapping_add(salt) >> 11) as u8)
        .collect()
}

fn write(dir: &Path, name: &str, data: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, data).expect("write input");
    path
}

#[test]
fn help_lists_usage() {
    let output = streamdelta().arg("--help").output().expect("run");
    assert!(output.status.success(), "--help should succeed");
    assert!(output.stderr.is_empty(), "help output should not write to stderr");
    let stdout = String::from_utf8(output.stdout).expect("stdout is UTF-8");
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("--block-size"));
}

#[test]
fn version_goes_to_stdout() {
    let output = streamdelta().arg("--version").output().expect("run");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout is UTF-8");
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn missing_operands_exit_with_syntax_error() {
    let output = streamdelta().output().expect("run");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).expect("stderr is UTF-8");
    assert!(stderr.contains("Usage:"));
}

#[test]
fn unknown_checksum_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let old = write(dir.path(), "old", b"old contents");
    let new = write(dir.path(), "new", b"new contents");

    let output = streamdelta()
        .args(["--checksum", "crc32"])
        .arg(&old)
        .arg(&new)
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).expect("stderr is UTF-8");
    assert!(stderr.contains("crc32"));
}

#[test]
fn missing_old_file_exits_with_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let new = write(dir.path(), "new", b"new contents");

    let output = streamdelta()
        .arg(dir.path().join("absent"))
        .arg(&new)
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).expect("stderr is UTF-8");
    assert!(stderr.contains("failed to open"));
}

#[test]
fn output_rebuilds_new_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let old_data = sample(50_000, 5);
    let mut new_data = old_data.clone();
    new_data.splice(20_000..20_010, b"inserted bytes here".iter().copied());
    new_data.truncate(45_000);

    let old = write(dir.path(), "old", &old_data);
    let new = write(dir.path(), "new", &new_data);
    let rebuilt = dir.path().join("rebuilt");

    for checksum in ["md4", "md5", "sha1", "sha256", "xxh64", "xxh3"] {
        let output = streamdelta()
            .args(["--checksum", checksum, "--checksum-seed", "42", "-B", "512"])
            .arg("--output")
            .arg(&rebuilt)
            .arg(&old)
            .arg(&new)
            .output()
            .expect("run");
        assert!(
            output.status.success(),
            "{checksum}: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        let stdout = String::from_utf8(output.stdout).expect("stdout is UTF-8");
        assert!(stdout.contains(&format!("total: {} bytes", new_data.len())));
        assert_eq!(fs::read(&rebuilt).expect("read rebuilt"), new_data, "{checksum}");
    }
}

#[test]
fn events_flag_prints_each_event() {
    let dir = tempfile::tempdir().expect("tempdir");
    let old = write(dir.path(), "old", &[b'A'; 64]);
    let mut new_data = vec![b'A'; 16];
    new_data.extend_from_slice(&[b'B'; 8]);
    new_data.extend_from_slice(&[b'A'; 16]);
    let new = write(dir.path(), "new", &new_data);

    let assert = streamdelta()
        .args(["-B", "16", "--events"])
        .arg(&old)
        .arg(&new)
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    let events: Vec<&str> = stdout
        .lines()
        .filter(|line| line.starts_with("copy ") || line.starts_with("data "))
        .collect();
    assert_eq!(
        events,
        [
            "copy new=0 old=48 len=16",
            "data new=16 len=8",
            "copy new=24 old=48 len=16",
        ]
    );
}

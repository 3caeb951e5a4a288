// Integration tests for the `calmerge` binary.
// Run with: cargo test -p calmerge --test cli -- --nocapture

use std::io::Write;
use std::process::{Command, Output};

use tempfile::{NamedTempFile, TempDir};

fn calmerge() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_calmerge"));
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn result_file(content: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().expect("temp file");
    f.write_all(content.as_bytes()).expect("write temp file");
    f
}

fn run(args: &[&str], files: &[&NamedTempFile]) -> Output {
    let mut cmd = calmerge();
    cmd.args(args);
    for f in files {
        cmd.arg(f.path());
    }
    cmd.output().expect("run calmerge")
}

fn stdout_lines(output: &Output) -> Vec<Vec<String>> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|l| l.split_whitespace().map(str::to_string).collect())
        .collect()
}

// ---------------------------------------------------------------------------
// Merging
// ---------------------------------------------------------------------------

#[test]
fn merge_two_files_by_workload() {
    let a = result_file("X\n1-t-h-3 1\nfair01 2\n");
    let b = result_file("Y\n1-t-h-03 5\nfair01 6\nfair02 7\n");

    let output = run(&["--quiet"], &[&a, &b]);
    assert!(output.status.success(), "exit code was {:?}", output.status);

    let lines = stdout_lines(&output);
    assert_eq!(lines[0], vec!["X", "Y"]);
    assert_eq!(lines[1], vec!["1-t-h-03", "1", "5"]);
    assert_eq!(lines[2], vec!["fair01", "2", "6"]);
    assert_eq!(lines.len(), 3, "fair02 is missing from the first file");
}

#[test]
fn pure_merge_pads_with_no_data() {
    let a = result_file("X\na 1\nb 2\n");
    let b = result_file("Y\nc 3\n");

    let output = run(&["--quiet", "--pure-merge"], &[&a, &b]);
    assert!(output.status.success());

    let lines = stdout_lines(&output);
    assert_eq!(lines[1], vec!["1", "1", "3"]);
    assert_eq!(lines[2], vec!["2", "2", "NoData"]);
}

// ---------------------------------------------------------------------------
// Transforms
// ---------------------------------------------------------------------------

#[test]
fn average_of_fair_workloads() {
    let a = result_file("A B\nfair01 1 2\nfair02 3 4\n");

    let output = run(&["--quiet", "--average"], &[&a]);
    assert!(output.status.success());

    let lines = stdout_lines(&output);
    assert_eq!(lines, vec![vec!["A", "B"], vec!["average", "2.00", "3.00"]]);
}

#[test]
fn normalize_without_color() {
    let a = result_file("A B\nfair01 2 4\nfair02 4 2\n");

    let output = run(&["--quiet", "--normalize-to", "1", "--no-color", "--decimals", "1"], &[&a]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains('\u{1b}'));
    let lines = stdout_lines(&output);
    assert_eq!(lines[1], vec!["fair01", "1.0", "2.0"]);
    assert_eq!(lines[2], vec!["fair02", "1.0", "0.5"]);
}

#[test]
fn print_spec_and_renames() {
    let a = result_file("A B C\nfair01 1 2 3\nfair02 4 5 6\n");

    let output = run(
        &["--quiet", "--print-spec", "3,1", "--col-names", "c,a", "--row-names", "one,two"],
        &[&a],
    );
    assert!(output.status.success());

    let lines = stdout_lines(&output);
    assert_eq!(lines[0], vec!["c", "a"]);
    assert_eq!(lines[1], vec!["one", "3", "1"]);
    assert_eq!(lines[2], vec!["two", "6", "4"]);
}

#[test]
fn invert_transposes() {
    let a = result_file("A B\nfair01 1 2\nfair02 3 4\n");

    let output = run(&["--quiet", "--invert"], &[&a]);
    assert!(output.status.success());

    let lines = stdout_lines(&output);
    assert_eq!(lines[0], vec!["fair01", "fair02"]);
    assert_eq!(lines[1], vec!["A", "1", "3"]);
    assert_eq!(lines[2], vec!["B", "2", "4"]);
}

// ---------------------------------------------------------------------------
// Output surfaces
// ---------------------------------------------------------------------------

#[test]
fn json_output() {
    let a = result_file("A\nfair01 1\n");

    let output = run(&["--quiet", "--json"], &[&a]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["header"][1], "A");
    assert_eq!(value["rows"][0]["key"], "fair01");
    assert_eq!(value["rows"][0]["values"][0], "1");
}

#[test]
fn json_output_stays_parseable_with_logs() {
    let a = result_file("A B\nfair01 1 2\n");

    let output = run(&["--json", "--col-names", "x,y"], &[&a]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["header"][1], "x");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Renaming column A to x"), "stderr was {stderr}");
}

#[test]
fn json_output_of_empty_matrix_is_fatal() {
    let a = result_file("A\nfair01 1\n");
    let b = result_file("B\nfair02 2\n");

    let output = run(&["--quiet", "--json"], &[&a, &b]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("empty"));
}

#[test]
fn print_names_lists_columns() {
    let a = result_file("X Y\nfair01 1 2\n");

    let output = run(&["--quiet", "--print-names"], &[&a]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Column ID to column name mapping"));
    let lines = stdout_lines(&output);
    let file = a.path().display().to_string();
    assert!(lines.contains(&vec!["1".to_string(), "X".to_string(), file.clone()]));
    assert!(lines.contains(&vec!["2".to_string(), "Y".to_string(), file]));
}

#[test]
fn outfile_receives_table() {
    let a = result_file("A\nfair01 1\n");
    let dir = TempDir::new().expect("temp dir");
    let out = dir.path().join("merged.txt");

    let output = run(&["--quiet", "--outfile", out.to_str().unwrap()], &[&a]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let written = std::fs::read_to_string(&out).expect("outfile written");
    assert!(written.contains("fair01"));
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

#[test]
fn ragged_line_warns_on_stdout() {
    let a = result_file("\n\nA B\nfair01 1 2\nfair02 1\n");

    let output = run(&[], &[&a]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let expected = format!("Cannot parse line 5 of {}", a.path().display());
    assert!(stdout.contains("WARN"), "stdout was {stdout}");
    assert!(stdout.contains(&expected), "stdout was {stdout}");
    assert!(stdout.contains("fair01"));
}

#[test]
fn quiet_suppresses_warnings() {
    let a = result_file("A B\nfair01 1 2\nfair02 1\n");

    let output = run(&["--quiet"], &[&a]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Cannot parse line"), "stdout was {stdout}");
    assert_eq!(stdout_lines(&output)[1], vec!["fair01", "1", "2"]);
}

#[test]
fn average_warns_on_non_numeric_cell() {
    let a = result_file("A B\nfair01 1 x\nfair02 3 4\n");

    let output = run(&["--average"], &[&a]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Cannot convert 'x' to float"), "stdout was {stdout}");
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn missing_file_is_fatal() {
    let output = calmerge()
        .args(["--quiet", "/nonexistent/calmerge/run.txt"])
        .output()
        .expect("run calmerge");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("Error:"), "stderr was {stderr}");
    assert!(output.stdout.is_empty());
}

#[test]
fn bad_print_spec_is_fatal() {
    let a = result_file("A\nfair01 1\n");

    let output = run(&["--quiet", "--print-spec", "1,x"], &[&a]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("1,x"));
}

#[test]
fn rename_mismatch_is_fatal() {
    let a = result_file("A B\nfair01 1 2\n");

    let output = run(&["--quiet", "--col-names", "only"], &[&a]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn normalize_against_no_data_is_fatal() {
    let a = result_file("A B\nfair01 NoData 2\n");

    let output = run(&["--quiet", "--normalize-to", "1"], &[&a]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn no_input_files() {
    let output = calmerge().output().expect("run calmerge");
    assert!(!output.status.success());
}

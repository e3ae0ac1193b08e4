//! End-to-end tests driving the sumfile binary

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

struct Sandbox {
    _temp_dir: TempDir,
    home: PathBuf,
    config_home: PathBuf,
    workspace: PathBuf,
}

impl Sandbox {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let home = temp_dir.path().join("home");
        let config_home = temp_dir.path().join("config");
        let workspace = temp_dir.path().join("ws");
        fs::create_dir_all(&home).unwrap();
        fs::create_dir_all(&config_home).unwrap();
        fs::create_dir_all(&workspace).unwrap();
        Self {
            _temp_dir: temp_dir,
            home,
            config_home,
            workspace,
        }
    }

    fn write(&self, name: &str, content: &str) {
        fs::write(self.workspace.join(name), content).unwrap();
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_sumfile"));
        cmd.env("HOME", self.home.as_os_str())
            .env("XDG_CONFIG_HOME", self.config_home.as_os_str())
            .env_remove("SUMFILE__MANIFEST__ALGORITHM")
            .env_remove("SUMFILE__MANIFEST__FILE")
            .env_remove("SUMFILE_LOG")
            .arg("--workspace")
            .arg(&self.workspace);
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command().args(args).output().unwrap()
    }

    fn run_with_stdin(&self, args: &[&str], input: &[u8]) -> Output {
        let mut child = self
            .command()
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();
        child.stdin.take().unwrap().write_all(input).unwrap();
        child.wait_with_output().unwrap()
    }

    fn manifest(&self, name: &str) -> String {
        fs::read_to_string(self.workspace.join(name)).unwrap()
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn assert_success(output: &Output, what: &str) {
    assert!(
        output.status.success(),
        "{} should succeed: stderr={:?}",
        what,
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_add_then_check_passes() {
    let sandbox = Sandbox::new();
    sandbox.write("a.txt", "test");
    sandbox.write("b.txt", "other");

    let output = sandbox.run(&["add", "a.txt", "b.txt"]);
    assert_success(&output, "sumfile add");
    assert!(stdout(&output).contains("098f6bcd4621d373cade4e832627b4f6  a.txt\n"));
    assert!(sandbox
        .manifest("MD5SUMS")
        .starts_with("098f6bcd4621d373cade4e832627b4f6  a.txt\n"));

    let output = sandbox.run(&["check"]);
    assert_success(&output, "sumfile check");
    let text = stdout(&output);
    assert!(text.contains("a.txt: OK"));
    assert!(text.contains("b.txt: OK"));
}

#[test]
fn test_check_detects_modification() {
    let sandbox = Sandbox::new();
    sandbox.write("a.txt", "test");
    assert_success(&sandbox.run(&["add", "a.txt"]), "sumfile add");

    sandbox.write("a.txt", "tampered");
    let output = sandbox.run(&["check"]);

    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    assert!(text.contains("a.txt: FAILED"));
    assert!(text.contains("WARNING: 1 computed checksum did NOT match"));
}

#[test]
fn test_check_without_manifest_fails() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["check"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("sumfile: "));
}

#[test]
fn test_list_json() {
    let sandbox = Sandbox::new();
    sandbox.write("a.txt", "test");
    assert_success(&sandbox.run(&["add", "a.txt"]), "sumfile add");

    let output = sandbox.run(&["list", "--format", "json"]);
    assert_success(&output, "sumfile list");

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["algorithm"], "md5");
    assert_eq!(value["entries"][0]["name"], "a.txt");
    assert_eq!(
        value["entries"][0]["digest"],
        "098f6bcd4621d373cade4e832627b4f6"
    );
}

#[test]
fn test_check_json_reports_statuses() {
    let sandbox = Sandbox::new();
    sandbox.write("a.txt", "test");
    sandbox.write("b.txt", "other");
    assert_success(&sandbox.run(&["add", "a.txt", "b.txt"]), "sumfile add");
    fs::remove_file(sandbox.workspace.join("b.txt")).unwrap();

    let output = sandbox.run(&["check", "--format", "json"]);
    assert_eq!(output.status.code(), Some(1));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["success"], false);
    assert_eq!(value["outcomes"][0]["status"], "ok");
    assert_eq!(value["outcomes"][1]["name"], "b.txt");
    assert_eq!(value["outcomes"][1]["status"], "missing");
}

#[test]
fn test_stdin_entry() {
    let sandbox = Sandbox::new();

    let output = sandbox.run_with_stdin(&["add", "-"], b"test");
    assert_success(&output, "sumfile add -");
    assert_eq!(
        sandbox.manifest("MD5SUMS"),
        "098f6bcd4621d373cade4e832627b4f6  -\n"
    );

    let output = sandbox.run_with_stdin(&["check", "-"], b"test");
    assert_success(&output, "sumfile check -");
    assert!(stdout(&output).contains("-: OK"));

    let output = sandbox.run_with_stdin(&["check", "-"], b"nope");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_no_save_leaves_manifest_untouched() {
    let sandbox = Sandbox::new();
    sandbox.write("a.txt", "test");

    let output = sandbox.run(&["add", "--no-save", "a.txt"]);
    assert_success(&output, "sumfile add --no-save");
    assert!(stdout(&output).contains("  a.txt"));
    assert!(!sandbox.workspace.join("MD5SUMS").exists());
}

#[test]
fn test_blake3_uses_its_own_manifest_name() {
    let sandbox = Sandbox::new();
    sandbox.write("a.txt", "test");

    let output = sandbox.run(&["--algorithm", "blake3", "add", "a.txt"]);
    assert_success(&output, "sumfile --algorithm blake3 add");

    let content = sandbox.manifest("B3SUMS");
    let (digest, name) = content.trim_end().split_once("  ").unwrap();
    assert_eq!(digest.len(), 64);
    assert_eq!(name, "a.txt");

    assert_success(
        &sandbox.run(&["--algorithm", "blake3", "check"]),
        "sumfile --algorithm blake3 check",
    );
}

#[test]
fn test_workspace_config_selects_manifest_file() {
    let sandbox = Sandbox::new();
    sandbox.write(".sumfile.toml", "[manifest]\nfile = \"sums/list.md5\"\n");
    sandbox.write("a.txt", "test");

    assert_success(&sandbox.run(&["add", "a.txt"]), "sumfile add");
    assert!(sandbox.workspace.join("sums/list.md5").exists());
    assert_success(&sandbox.run(&["check"]), "sumfile check");
}

#[test]
fn test_logging_is_silent_by_default_and_verbose_on_request() {
    let sandbox = Sandbox::new();
    sandbox.write("a.txt", "test");

    let output = sandbox.run(&["add", "a.txt"]);
    assert_success(&output, "sumfile add");
    assert!(output.stderr.is_empty());

    let output = sandbox.run(&["--verbose", "check"]);
    assert_success(&output, "sumfile --verbose check");
    assert!(
        !String::from_utf8_lossy(&output.stderr).trim().is_empty(),
        "verbose mode should emit logs to stderr"
    );
    // Logs never leak into the manifest output
    assert!(!stdout(&output).contains("sumfile starting"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_unwritable_stdout_exits_nonzero() {
    let sandbox = Sandbox::new();
    sandbox.write("a.txt", "test");
    assert_success(&sandbox.run(&["add", "a.txt"]), "sumfile add");

    let full = fs::OpenOptions::new().write(true).open("/dev/full").unwrap();
    let output = sandbox
        .command()
        .arg("list")
        .stdout(Stdio::from(full))
        .stderr(Stdio::piped())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("sumfile: failed to write output"));
}

#[test]
fn test_dot_slash_names_match_plain_names() {
    let sandbox = Sandbox::new();
    sandbox.write("a.txt", "test");

    assert_success(&sandbox.run(&["add", "./a.txt"]), "sumfile add ./a.txt");
    assert_eq!(
        sandbox.manifest("MD5SUMS"),
        "098f6bcd4621d373cade4e832627b4f6  a.txt\n"
    );

    let output = sandbox.run(&["check", "./a.txt"]);
    assert_success(&output, "sumfile check ./a.txt");
    assert!(stdout(&output).contains("a.txt: OK"));
}

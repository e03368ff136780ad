use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const PASSPHRASE: &str = "test-passphrase-123";

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_sealbox"))
}

struct Env {
    dir: TempDir,
}

impl Env {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(dir.path().join("config")).expect("create config dir");
        std::fs::create_dir_all(dir.path().join("data")).expect("create data dir");
        Self { dir }
    }

    fn vault_path(&self) -> PathBuf {
        self.dir.path().join("vault")
    }

    fn config_file(&self) -> PathBuf {
        self.dir.path().join("config").join("sealbox").join("config.toml")
    }

    fn command(&self, passphrase: &str) -> Command {
        let mut cmd = Command::new(bin());
        cmd.env("XDG_CONFIG_HOME", self.dir.path().join("config"))
            .env("XDG_DATA_HOME", self.dir.path().join("data"))
            .env("SEALBOX_PASSPHRASE", passphrase)
            .env_remove("SEALBOX_PATH")
            .env_remove("SEALBOX_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }

    fn run(&self, passphrase: &str, args: &[&str]) -> Output {
        self.command(passphrase)
            .args(args)
            .output()
            .expect("run sealbox")
    }

    fn init(&self) {
        let vault = self.vault_path();
        let output = self.run(PASSPHRASE, &["init", path_str(&vault)]);
        assert_success(&output);
    }
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("utf-8 temp path")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "command failed: stdout={} stderr={}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[test]
fn test_init_writes_config_and_key_files() {
    let env = Env::new();
    env.init();

    let config = std::fs::read_to_string(env.config_file()).expect("config written");
    assert!(config.contains(path_str(&env.vault_path())));
    assert!(env.vault_path().join("private.key.age").exists());
    assert!(env.vault_path().join("public.key").exists());
    assert!(env.vault_path().join("passphrase.phc").exists());
    assert!(!env.vault_path().join("accounts.age").exists());
}

#[test]
fn test_add_list_show_flow() {
    let env = Env::new();
    env.init();

    let output = env.run(
        PASSPHRASE,
        &["--quiet", "add", "github", "--username", "octocat", "-f", "recovery=abc"],
    );
    assert_success(&output);
    let id = stdout(&output);
    assert_eq!(id.len(), 8);

    let output = env.run(PASSPHRASE, &["add", "--json", r#"{"name":"gitlab"}"#]);
    assert_success(&output);

    let output = env.run(PASSPHRASE, &["list", "--json"]);
    assert_success(&output);
    let listed: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json list");
    let entries = listed.as_array().expect("array");
    assert_eq!(entries.len(), 2);
    let names: Vec<&str> = entries
        .iter()
        .filter_map(|entry| entry["record"]["name"].as_str())
        .collect();
    assert!(names.contains(&"github"));
    assert!(names.contains(&"gitlab"));

    let output = env.run(PASSPHRASE, &["show", &id, "--json"]);
    assert_success(&output);
    let shown: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json show");
    assert_eq!(shown["id"], id.as_str());
    assert_eq!(shown["record"]["username"], "octocat");
    assert_eq!(shown["record"]["fields"]["recovery"], "abc");

    let output = env.run(PASSPHRASE, &["list", "--format", "plain"]);
    assert_success(&output);
    assert!(stdout(&output).contains(&id));
}

#[test]
fn test_index_blob_is_not_plaintext() {
    let env = Env::new();
    env.init();
    assert_success(&env.run(PASSPHRASE, &["add", "very-secret-service"]));

    let blob = std::fs::read_to_string(env.vault_path().join("accounts.age")).expect("index blob");
    assert!(blob.starts_with("-----BEGIN AGE ENCRYPTED FILE-----"));
    assert!(!blob.contains("very-secret-service"));
}

#[test]
fn test_wrong_passphrase_exits_with_auth_code() {
    let env = Env::new();
    env.init();

    let output = env.run("not-the-passphrase", &["list", "--no-input"]);
    assert_eq!(output.status.code(), Some(5));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Incorrect passphrase"));
}

#[test]
fn test_invalid_id_exits_with_input_code() {
    let env = Env::new();
    env.init();

    let output = env.run(PASSPHRASE, &["show", "NOT-AN-ID"]);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_unknown_id_exits_with_not_found_code() {
    let env = Env::new();
    env.init();

    let output = env.run(PASSPHRASE, &["show", "zzzzzzzz"]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_missing_vault_exits_with_not_found_code() {
    let env = Env::new();
    let missing = env.dir.path().join("nowhere");

    let output = env.run(PASSPHRASE, &["--vault", path_str(&missing), "list"]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_init_twice_is_rejected() {
    let env = Env::new();
    env.init();

    let vault = env.vault_path();
    let output = env.run(PASSPHRASE, &["init", path_str(&vault), "--no-config"]);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_status_reports_index_state() {
    let env = Env::new();
    env.init();

    let output = env.run(PASSPHRASE, &["status", "--unlock"]);
    assert_success(&output);
    let text = stdout(&output);
    assert!(text.contains("Initialized: yes"));
    assert!(text.contains("Accounts: 0"));

    assert_success(&env.run(PASSPHRASE, &["add", "github"]));
    let output = env.run(PASSPHRASE, &["status", "--unlock"]);
    assert!(stdout(&output).contains("Index: loaded"));
    assert!(stdout(&output).contains("Accounts: 1"));
}

#[test]
fn test_weak_passphrase_is_rejected_at_init() {
    let env = Env::new();
    let vault = env.vault_path();

    let output = env.run("short", &["init", path_str(&vault)]);
    assert_eq!(output.status.code(), Some(4));
    assert!(!vault.join("private.key.age").exists());
}

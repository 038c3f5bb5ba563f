//! Integration tests for the Bento CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`.  PINs
//! are supplied through `BENTO_PIN` / `BENTO_NEW_PIN` so nothing prompts.

use assert_cmd::Command;
use assert_fs::TempDir;
use predicates::prelude::*;

/// Helper: get a Command pointing at the bento binary, isolated in `dir`.
fn bento(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("bento").expect("binary should exist");
    cmd.current_dir(dir.path())
        .env_remove("BENTO_PIN")
        .env_remove("BENTO_NEW_PIN")
        .env_remove("BENTO_DATA_DIR")
        .env_remove("RUST_LOG");
    cmd
}

/// Helper: first password entry id, read from a stdout export.
fn first_entry_id(dir: &TempDir) -> String {
    let out = bento(dir).args(["export", "-o", "-"]).output().unwrap();
    let doc: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    doc["passwords"][0]["id"].as_str().unwrap().to_string()
}

#[test]
fn help_flag_shows_usage() {
    let tmp = TempDir::new().unwrap();
    bento(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("PIN-locked password vault"))
        .stdout(predicate::str::contains("pin"))
        .stdout(predicate::str::contains("pass"))
        .stdout(predicate::str::contains("note"))
        .stdout(predicate::str::contains("todo"))
        .stdout(predicate::str::contains("export"))
        .stdout(predicate::str::contains("import"));
}

#[test]
fn no_args_shows_help() {
    let tmp = TempDir::new().unwrap();
    bento(&tmp)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn weak_pin_is_reported() {
    let tmp = TempDir::new().unwrap();
    bento(&tmp)
        .args(["pin", "set"])
        .env("BENTO_PIN", "12")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("at least 4"));
}

#[test]
fn vault_lifecycle() {
    let tmp = TempDir::new().unwrap();

    bento(&tmp)
        .args(["pin", "set"])
        .env("BENTO_PIN", "1234")
        .assert()
        .success();
    assert!(tmp.path().join(".bento").join("master-pin-hash.json").exists());

    bento(&tmp)
        .args(["pass", "add", "mail", "a@b.com", "hunter2"])
        .env("BENTO_PIN", "1234")
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved password for 'mail'"));

    let id = first_entry_id(&tmp);

    bento(&tmp)
        .args(["pass", "show", &id])
        .env("BENTO_PIN", "1234")
        .assert()
        .success()
        .stdout("hunter2\n");

    bento(&tmp)
        .args(["pass", "show", &id])
        .env("BENTO_PIN", "0000")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Incorrect PIN"));

    bento(&tmp)
        .args(["pin", "change"])
        .env("BENTO_PIN", "1234")
        .env("BENTO_NEW_PIN", "5678")
        .assert()
        .success()
        .stderr(predicate::str::contains("can no longer be revealed"));

    bento(&tmp)
        .args(["pass", "show", &id])
        .env("BENTO_PIN", "5678")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Could not decrypt"));

    bento(&tmp)
        .args(["pass", "rm", &id, "--force"])
        .env("BENTO_PIN", "5678")
        .assert()
        .success();
}

#[test]
fn pass_commands_need_a_vault() {
    let tmp = TempDir::new().unwrap();
    bento(&tmp)
        .args(["pass", "list"])
        .env("BENTO_PIN", "1234")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No vault configured"));
}

#[test]
fn notes_and_todos_without_a_pin() {
    let tmp = TempDir::new().unwrap();

    bento(&tmp)
        .args(["note", "add", "remember the milk", "--title", "Shopping"])
        .assert()
        .success();
    bento(&tmp)
        .args(["note", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Shopping"));

    bento(&tmp)
        .args(["todo", "add", "file taxes", "--due", "2027-04-15"])
        .assert()
        .success();
    bento(&tmp)
        .args(["todo", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("file taxes"))
        .stdout(predicate::str::contains("2027-04-15"));
}

#[test]
fn export_then_import_elsewhere() {
    let source = TempDir::new().unwrap();
    bento(&source)
        .args(["pin", "set"])
        .env("BENTO_PIN", "1234")
        .assert()
        .success();
    bento(&source)
        .args(["pass", "add", "mail", "a@b.com", "hunter2"])
        .env("BENTO_PIN", "1234")
        .assert()
        .success();
    bento(&source)
        .args(["export", "-o", "backup.json"])
        .assert()
        .success();

    let target = TempDir::new().unwrap();
    let backup = source.path().join("backup.json");
    bento(&target)
        .args(["import", backup.to_str().unwrap(), "--force"])
        .assert()
        .success();

    let id = first_entry_id(&target);
    bento(&target)
        .args(["pass", "show", &id])
        .env("BENTO_PIN", "1234")
        .assert()
        .success()
        .stdout("hunter2\n");
}

#[test]
fn import_rejects_backup_without_master_pin() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("bad.json");
    std::fs::write(&file, r#"{"notes": [], "todos": [], "passwords": []}"#).unwrap();

    bento(&tmp)
        .args(["import", file.to_str().unwrap(), "--force"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("masterPin is missing"));
}

#[test]
fn export_before_setup_fails() {
    let tmp = TempDir::new().unwrap();
    bento(&tmp)
        .args(["export", "-o", "-"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No vault configured"));
}

#[test]
fn generate_respects_length() {
    let tmp = TempDir::new().unwrap();
    bento(&tmp)
        .args(["pass", "generate", "--length", "20"])
        .assert()
        .success()
        .stdout(predicate::str::is_match("^.{20}\n$").unwrap());
}

#[test]
fn piped_pins_are_read_one_line_at_a_time() {
    let tmp = TempDir::new().unwrap();

    bento(&tmp)
        .args(["pin", "set"])
        .write_stdin("1234\n1234\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Vault created"));

    bento(&tmp)
        .args(["pin", "change"])
        .write_stdin("1234\n5678\n5678\n")
        .assert()
        .success();

    bento(&tmp)
        .args(["pin", "unlock"])
        .write_stdin("5678\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("PIN accepted"));
}

#[test]
fn piped_confirmation_mismatch_is_reported() {
    let tmp = TempDir::new().unwrap();
    bento(&tmp)
        .args(["pin", "set"])
        .write_stdin("1234\n4321\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("New PINs do not match"));
    assert!(!tmp.path().join(".bento").join("master-pin-hash.json").exists());
}

#[test]
fn export_refuses_new_file_inside_data_dir() {
    let tmp = TempDir::new().unwrap();
    bento(&tmp)
        .args(["pin", "set"])
        .env("BENTO_PIN", "1234")
        .assert()
        .success();

    bento(&tmp)
        .args(["export", "-o", ".bento/backup.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("refusing to export into the data directory"));
    assert!(!tmp.path().join(".bento").join("backup.json").exists());
}

#[test]
fn unreadable_config_is_not_a_storage_failure() {
    let tmp = TempDir::new().unwrap();
    // A directory where the config file should be makes the read fail.
    std::fs::create_dir_all(tmp.path().join(".bento").join("bento.toml")).unwrap();

    bento(&tmp)
        .arg("status")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Config file error"));
}

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn help_lists_the_packaging_switches() {
    cargo_bin_cmd!("nap-release")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--no-zip"))
        .stdout(predicate::str::contains("--clean"))
        .stdout(predicate::str::contains("--include-docs"));
}

#[test]
fn missing_build_info_fails_the_run() {
    let root = tempfile::tempdir().unwrap();

    cargo_bin_cmd!("nap-release")
        .arg("--skip-dependencies")
        .arg("--root")
        .arg(root.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("build info file not found"));

    assert!(!root.path().join("packaging").exists());
}

#[test]
fn zero_jobs_is_a_usage_error() {
    let root = tempfile::tempdir().unwrap();

    cargo_bin_cmd!("nap-release")
        .args(["--jobs", "0", "--root"])
        .arg(root.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid arguments"));
}

#[test]
fn unknown_settings_keys_are_rejected() {
    let root = tempfile::tempdir().unwrap();
    let config = root.path().join("release.toml");
    std::fs::write(&config, "prodcut_name = \"NAP\"\n").unwrap();

    cargo_bin_cmd!("nap-release")
        .arg("--root")
        .arg(root.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("prodcut_name"));
}

mod common;

use common::FakeRunner;
use nap_release::packager::{
    PackageOptions, PlatformTarget, SettingsBuilder,
    platform::{linux, macos},
};

fn settings_with(root: &std::path::Path, linux: &[&str], macos: &[&str]) -> nap_release::packager::Settings {
    let owned = |items: &[&str]| -> Vec<String> { items.iter().map(|item| item.to_string()).collect() };
    SettingsBuilder::new()
        .root(root)
        .linux_dependencies(owned(linux))
        .macos_dependencies(owned(macos))
        .options(PackageOptions::default())
        .build()
        .unwrap()
}

#[tokio::test]
async fn linux_with_everything_installed_installs_nothing() {
    let root = tempfile::tempdir().unwrap();
    let settings = settings_with(root.path(), &["cmake", "patchelf"], &[]);
    let runner = FakeRunner::new().installed(&["cmake", "patchelf"]);

    PlatformTarget::Linux.provision(&settings, &runner).await.unwrap();

    assert_eq!(runner.calls_to("dpkg").len(), 2);
    assert!(runner.calls_to("sudo").is_empty());
}

#[tokio::test]
async fn linux_installs_missing_packages_in_one_batch() {
    let root = tempfile::tempdir().unwrap();
    let settings = settings_with(root.path(), &["cmake", "libglew-dev", "ffmpeg"], &[]);
    let runner = FakeRunner::new().installed(&["cmake"]);

    linux::provision(&settings, &runner).await.unwrap();

    let installs = runner.calls_to("sudo");
    assert_eq!(installs.len(), 1);
    assert_eq!(
        installs[0].to_string(),
        "sudo apt-get --assume-yes install libglew-dev ffmpeg"
    );
}

#[tokio::test]
async fn linux_install_failure_is_fatal() {
    let root = tempfile::tempdir().unwrap();
    let settings = settings_with(root.path(), &["ffmpeg"], &[]);
    let runner = FakeRunner::new().failing("sudo", 100);

    let err = linux::provision(&settings, &runner).await.unwrap_err();
    assert_eq!(err.exit_code(), 100);
}

#[tokio::test]
async fn failed_query_counts_as_missing() {
    let root = tempfile::tempdir().unwrap();
    let settings = settings_with(root.path(), &["cmake"], &[]);
    let runner = FakeRunner::new().failing("dpkg", 2);

    assert!(!linux::is_package_installed(&settings, &runner, "cmake").await);
}

#[tokio::test]
async fn macos_without_homebrew_skips_provisioning() {
    let root = tempfile::tempdir().unwrap();
    let settings = settings_with(root.path(), &[], &["sdl2", "glew"]);
    let runner = FakeRunner::new().off_path("brew");

    PlatformTarget::MacOs.provision(&settings, &runner).await.unwrap();

    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn macos_install_failures_are_isolated() {
    let root = tempfile::tempdir().unwrap();
    let settings = settings_with(root.path(), &[], &["cmake", "sdl2", "glew", "qt"]);
    let runner = FakeRunner::new()
        .installed(&["cmake"])
        .broken_install("sdl2");

    macos::provision(&settings, &runner).await.unwrap();

    let installs: Vec<String> = runner
        .calls_to("brew")
        .iter()
        .filter(|call| call.arguments()[0] == "install")
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        installs,
        ["brew install sdl2", "brew install glew", "brew install qt"]
    );
}

#[tokio::test]
async fn macos_reads_the_missing_keg_marker() {
    let root = tempfile::tempdir().unwrap();
    let settings = settings_with(root.path(), &[], &[]);
    let runner = FakeRunner::new().installed(&["glew"]);

    assert!(macos::is_package_installed(&settings, &runner, "glew").await);
    assert!(!macos::is_package_installed(&settings, &runner, "mpg123").await);
}

#[tokio::test]
async fn windows_provisioning_runs_nothing() {
    let root = tempfile::tempdir().unwrap();
    let settings = settings_with(root.path(), &["cmake"], &["cmake"]);
    let runner = FakeRunner::new();

    PlatformTarget::Windows.provision(&settings, &runner).await.unwrap();

    assert!(runner.calls().is_empty());
}

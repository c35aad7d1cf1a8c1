mod common;

use common::{FakeRunner, REVISION, read_json};
use nap_release::packager::{
    Error, PackageOptions, Pipeline, PlatformTarget, Stage, Timestamp,
    pipeline::clean_previous_builds,
};

const TIMESTAMP: &str = "2024.01.01T00.00";

fn timestamp() -> Timestamp {
    TIMESTAMP.parse().unwrap()
}

fn without_provisioning() -> PackageOptions {
    PackageOptions {
        provision: false,
        ..Default::default()
    }
}

#[tokio::test]
async fn linux_release_bumps_build_number_and_names_the_tarball() {
    let root = common::source_tree(r#"{"version": "1.2", "buildNumber": 5}"#);
    let settings = common::settings(root.path(), without_provisioning());
    let runner = FakeRunner::new().install_into(&settings.staging_path(), &[("bin/napkin", "elf")]);

    let mut pipeline = Pipeline::new(&settings, &runner, PlatformTarget::Linux);
    let artifact = pipeline.run(timestamp()).await.unwrap();

    assert_eq!(pipeline.stage(), Stage::Done);
    assert_eq!(artifact.file_name(), "NAP-1.2-Linux-2024.01.01T00.00.tar.xz");
    assert!(artifact.path().is_file());

    let persisted = read_json(&settings.build_info_path());
    assert_eq!(persisted["buildNumber"], 6);
    assert!(persisted.get("gitRevision").is_none());

    let packaged = read_json(&settings.packaged_build_info_path());
    assert_eq!(packaged["buildNumber"], 6);
    assert_eq!(packaged["gitRevision"], REVISION);
    assert_eq!(packaged["timestamp"], TIMESTAMP);
}

#[tokio::test]
async fn linux_configures_and_builds_each_configuration_in_its_own_directory() {
    let root = common::source_tree(r#"{"version": "1.2"}"#);
    let settings = common::settings(root.path(), without_provisioning());
    let runner = FakeRunner::new();

    Pipeline::new(&settings, &runner, PlatformTarget::Linux)
        .run(timestamp())
        .await
        .unwrap();

    let programs: Vec<String> = runner
        .calls()
        .iter()
        .map(|call| call.program().to_string())
        .collect();
    assert_eq!(programs, ["git", "cmake", "make", "cmake", "make", "tar"]);

    let cmake = runner.calls_to("cmake");
    assert_eq!(cmake[0].arguments()[..3], ["-H.", "-BbuildRelease", "-DCMAKE_BUILD_TYPE=Release"]);
    assert_eq!(cmake[1].arguments()[1], "-BbuildDebug");
    let flags = cmake[0].arguments();
    assert!(flags.contains(&format!("-DNAP_BUILD_TIMESTAMP={TIMESTAMP}")));
    assert!(flags.contains(&format!("-DNAP_BUILD_GIT_REVISION={REVISION}")));
    assert!(flags.contains(&"-DNAP_PACKAGED_BUILD=1".to_string()));

    let make = runner.calls_to("make");
    assert_eq!(make[0].to_string(), "make all install -j4");
    assert_eq!(make[0].dir(), settings.root().join("buildRelease"));
    assert_eq!(make[1].dir(), settings.root().join("buildDebug"));
}

#[tokio::test]
async fn provisioning_with_everything_installed_runs_no_install() {
    let root = common::source_tree(r#"{"version": "1.2"}"#);
    let settings = common::settings(root.path(), PackageOptions::default());
    let installed: Vec<&str> = settings
        .dependencies()
        .linux
        .iter()
        .map(String::as_str)
        .collect();
    let runner = FakeRunner::new().installed(&installed);

    Pipeline::new(&settings, &runner, PlatformTarget::Linux)
        .run(timestamp())
        .await
        .unwrap();

    assert_eq!(runner.calls_to("dpkg").len(), installed.len());
    assert!(runner.calls_to("sudo").is_empty());
}

#[tokio::test]
async fn directory_release_leaves_staging_in_place() {
    let root = common::source_tree(r#"{"version": "2.0", "buildNumber": 1}"#);
    let settings = common::settings(
        root.path(),
        PackageOptions {
            zip: false,
            provision: false,
            ..Default::default()
        },
    );
    let runner = FakeRunner::new().install_into(&settings.staging_path(), &[("lib/libnap.so", "so")]);

    let artifact = Pipeline::new(&settings, &runner, PlatformTarget::Linux)
        .run(timestamp())
        .await
        .unwrap();

    assert!(artifact.path().is_dir());
    assert_eq!(artifact.file_name(), "NAP-2.0-Linux-2024.01.01T00.00");
    assert!(artifact.path().join("cmake/buildinfo.json").is_file());
    assert!(settings.staging_path().join("lib/libnap.so").is_file());
    assert!(runner.calls_to("tar").is_empty());
}

#[tokio::test]
async fn clean_removes_every_build_directory_even_when_one_is_missing() {
    let root = common::source_tree(r#"{"version": "1.2"}"#);
    for dir in ["buildRelease", "lib", "bin"] {
        std::fs::create_dir_all(root.path().join(dir).join("stale")).unwrap();
    }
    let settings = common::settings(
        root.path(),
        PackageOptions {
            clean: true,
            ..without_provisioning()
        },
    );

    clean_previous_builds(&settings, PlatformTarget::Linux)
        .await
        .unwrap();

    for dir in ["buildRelease", "buildDebug", "lib", "bin"] {
        assert!(!root.path().join(dir).exists(), "{dir} survived");
    }
}

#[tokio::test]
async fn clean_run_starts_from_an_empty_tree() {
    let root = common::source_tree(r#"{"version": "1.2"}"#);
    std::fs::create_dir_all(root.path().join("buildDebug/stale")).unwrap();
    std::fs::create_dir_all(root.path().join("packaging/old")).unwrap();
    let settings = common::settings(
        root.path(),
        PackageOptions {
            clean: true,
            ..without_provisioning()
        },
    );
    let runner = FakeRunner::new();

    Pipeline::new(&settings, &runner, PlatformTarget::Linux)
        .run(timestamp())
        .await
        .unwrap();

    assert!(!root.path().join("buildDebug/stale").exists());
    assert!(!settings.staging_path().join("old").exists());
}

#[tokio::test]
async fn configure_failure_halts_with_the_tool_exit_code() {
    let root = common::source_tree(r#"{"version": "1.2", "buildNumber": 5}"#);
    let settings = common::settings(root.path(), without_provisioning());
    let runner = FakeRunner::new().failing("cmake", 2);

    let mut pipeline = Pipeline::new(&settings, &runner, PlatformTarget::Linux);
    let err = pipeline.run(timestamp()).await.unwrap_err();

    assert_eq!(err.exit_code(), 2);
    assert_eq!(pipeline.stage(), Stage::StagingCleared);
    assert!(runner.calls_to("make").is_empty());
    assert_eq!(read_json(&settings.build_info_path())["buildNumber"], 6);
}

#[tokio::test]
async fn missing_build_info_fails_before_any_tool_runs() {
    let root = tempfile::tempdir().unwrap();
    let settings = common::settings(root.path(), PackageOptions::default());
    let runner = FakeRunner::new();

    let mut pipeline = Pipeline::new(&settings, &runner, PlatformTarget::Linux);
    let err = pipeline.run(timestamp()).await.unwrap_err();

    assert!(matches!(err, Error::MissingBuildInfo { .. }));
    assert_eq!(pipeline.stage(), Stage::Idle);
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn macos_builds_every_configuration_from_one_xcode_project() {
    let root = common::source_tree(r#"{"version": "0.5", "buildNumber": 9}"#);
    let settings = common::settings(root.path(), without_provisioning());
    let runner = FakeRunner::new().install_into(
        &settings.staging_path(),
        &[("bin/napkin.app/Contents/Info.plist", "plist"), ("bin/.DS_Store", "finder")],
    );

    let artifact = Pipeline::new(&settings, &runner, PlatformTarget::MacOs)
        .run(timestamp())
        .await
        .unwrap();

    assert_eq!(artifact.file_name(), "NAP-0.5-macOS-2024.01.01T00.00.zip");

    let cmake = runner.calls_to("cmake");
    assert_eq!(cmake.len(), 1);
    assert_eq!(cmake[0].arguments()[..4], ["-H.", "-Bbuild", "-G", "Xcode"]);

    let xcodebuild: Vec<String> = runner
        .calls_to("xcodebuild")
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        xcodebuild,
        [
            "xcodebuild -configuration Release -target install -jobs 4",
            "xcodebuild -configuration Debug -target install -jobs 4",
        ]
    );
    assert!(!settings.staging_path().join("bin/.DS_Store").exists());
    assert!(settings.staging_path().join("bin/napkin.app/Contents/Info.plist").is_file());
}

#[tokio::test]
async fn windows_builds_through_cmake_and_zips_in_process() {
    let root = common::source_tree(r#"{"version": "1.2", "buildNumber": 5}"#);
    let settings = common::settings(root.path(), without_provisioning());
    let runner = FakeRunner::new().install_into(&settings.staging_path(), &[("bin/napkin.exe", "pe")]);

    let artifact = Pipeline::new(&settings, &runner, PlatformTarget::Windows)
        .run(timestamp())
        .await
        .unwrap();

    assert_eq!(artifact.file_name(), "NAP-1.2-Win64-2024.01.01T00.00.zip");
    assert!(settings.build_path(None).is_dir());

    let cmake = runner.calls_to("cmake");
    assert_eq!(cmake.len(), 3);
    assert!(cmake[0].arguments().contains(&"Visual Studio 14 2015 Win64".to_string()));
    assert!(cmake[0].arguments().contains(&"-DPYBIND11_PYTHON_VERSION=3.5".to_string()));
    assert_eq!(
        cmake[1].to_string(),
        "cmake --build build --target install --config Release --parallel 4"
    );
    assert_eq!(cmake[2].arguments()[5], "Debug");

    let archive = zip::ZipArchive::new(std::fs::File::open(artifact.path()).unwrap()).unwrap();
    assert!(
        archive
            .file_names()
            .any(|name| name == "NAP-1.2-Win64-2024.01.01T00.00/cmake/buildinfo.json")
    );
}

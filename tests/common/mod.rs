//! Shared fixtures for integration tests.
#![allow(dead_code)]

use nap_release::packager::{
    ExternalToolError, PackageOptions, Settings, SettingsBuilder, ToolCommand, ToolOutput,
    ToolRunner,
};
use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::Mutex,
};
use tempfile::TempDir;

pub const REVISION: &str = "0123456789abcdef0123456789abcdef01234567";

/// Records every command and answers like the real tools would.
///
/// - `dpkg`/`brew list` report packages from the installed set
/// - build commands drop the configured files into the staging tree
/// - `tar`/`zip` create the archive in their working directory
#[derive(Debug, Default)]
pub struct FakeRunner {
    calls: Mutex<Vec<ToolCommand>>,
    installed: HashSet<String>,
    broken_installs: HashSet<String>,
    failures: HashMap<String, i32>,
    on_path: HashSet<String>,
    install_into: Option<(PathBuf, Vec<(String, String)>)>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default().on_path("brew")
    }

    /// Marks packages as already installed.
    pub fn installed(mut self, packages: &[&str]) -> Self {
        self.installed
            .extend(packages.iter().map(|package| package.to_string()));
        self
    }

    /// Makes `brew install <package>` fail.
    pub fn broken_install(mut self, package: &str) -> Self {
        self.broken_installs.insert(package.to_string());
        self
    }

    /// Makes every invocation of `program` exit with `code`.
    pub fn failing(mut self, program: &str, code: i32) -> Self {
        self.failures.insert(program.to_string(), code);
        self
    }

    pub fn on_path(mut self, program: &str) -> Self {
        self.on_path.insert(program.to_string());
        self
    }

    pub fn off_path(mut self, program: &str) -> Self {
        self.on_path.remove(program);
        self
    }

    /// Files the build step installs, relative to `staging`.
    pub fn install_into(mut self, staging: &Path, files: &[(&str, &str)]) -> Self {
        let files = files
            .iter()
            .map(|(path, contents)| (path.to_string(), contents.to_string()))
            .collect();
        self.install_into = Some((staging.to_path_buf(), files));
        self
    }

    pub fn calls(&self) -> Vec<ToolCommand> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded command lines, in order.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(ToString::to_string).collect()
    }

    /// Recorded calls of `program`.
    pub fn calls_to(&self, program: &str) -> Vec<ToolCommand> {
        self.calls()
            .into_iter()
            .filter(|call| call.program() == program)
            .collect()
    }

    fn install(&self) {
        if let Some((staging, files)) = &self.install_into {
            for (path, contents) in files {
                let target = staging.join(path);
                std::fs::create_dir_all(target.parent().unwrap()).unwrap();
                std::fs::write(target, contents).unwrap();
            }
        }
    }
}

fn ok(stdout: &str, stderr: &str) -> Result<ToolOutput, ExternalToolError> {
    Ok(ToolOutput {
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
    })
}

fn fail(command: &ToolCommand, code: i32, stderr: &str) -> Result<ToolOutput, ExternalToolError> {
    Err(ExternalToolError::NonZero {
        command: command.to_string(),
        code: Some(code),
        stdout: String::new(),
        stderr: stderr.to_string(),
    })
}

impl ToolRunner for FakeRunner {
    async fn run(&self, command: &ToolCommand) -> Result<ToolOutput, ExternalToolError> {
        self.calls.lock().unwrap().push(command.clone());

        if let Some(code) = self.failures.get(command.program()) {
            return fail(command, *code, "simulated failure");
        }

        let args = command.arguments();
        let first = args.first().map(String::as_str).unwrap_or_default();
        let last = args.last().map(String::as_str).unwrap_or_default();

        match command.program() {
            "dpkg" if self.installed.contains(last) => ok(&format!("{last}\t\tinstall\n"), ""),
            "dpkg" => ok("", &format!("dpkg: no packages found matching {last}\n")),
            "brew" if first == "list" && self.installed.contains(last) => ok("", ""),
            "brew" if first == "list" => fail(
                command,
                1,
                &format!("Error: No such keg: /usr/local/Cellar/{last}\n"),
            ),
            "brew" if first == "install" && self.broken_installs.contains(last) => {
                fail(command, 1, "Error: simulated install failure")
            }
            "git" => ok(&format!("{REVISION}\n"), ""),
            "make" | "xcodebuild" => {
                self.install();
                ok("", "")
            }
            "cmake" if first == "--build" => {
                self.install();
                ok("", "")
            }
            "tar" | "zip" => {
                std::fs::write(command.dir().join(&args[1]), "archive").unwrap();
                ok("", "")
            }
            _ => ok("", ""),
        }
    }

    fn locate(&self, program: &str) -> Option<PathBuf> {
        self.on_path
            .contains(program)
            .then(|| PathBuf::from("/usr/local/bin").join(program))
    }
}

/// Source tree with a build-info record.
pub fn source_tree(build_info: &str) -> TempDir {
    let root = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(root.path().join("cmake")).unwrap();
    std::fs::write(root.path().join("cmake/buildInfo.json"), build_info).unwrap();
    root
}

/// Settings for `root` with four jobs and the given switches.
pub fn settings(root: &Path, options: PackageOptions) -> Settings {
    SettingsBuilder::new()
        .root(root)
        .jobs(4)
        .options(options)
        .build()
        .unwrap()
}

pub fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

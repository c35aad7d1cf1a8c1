//! External tool invocation.
//!
//! Every stage of the pipeline reaches CMake, the package managers, git and
//! the archivers through [`ToolRunner::run`]. The runner only reports what
//! happened; whether a failure is fatal is decided by the caller.

use std::{
    fmt,
    io,
    path::{Path, PathBuf},
    process::ExitStatus,
};
use thiserror::Error;

/// A single external command line with its working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: String,
    args: Vec<String>,
    current_dir: PathBuf,
    capture: bool,
}

impl ToolCommand {
    /// Creates a command for `program`, run from the current directory.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: PathBuf::from("."),
            capture: false,
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets the working directory.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Captures stdout/stderr instead of streaming them to the terminal.
    pub fn capture_output(mut self) -> Self {
        self.capture = true;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    pub fn dir(&self) -> &Path {
        &self.current_dir
    }

    pub fn captures_output(&self) -> bool {
        self.capture
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.contains(' ') {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Output of a successful tool run.
///
/// Streams are empty unless the command asked for captured output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Failure to run an external tool.
#[derive(Error, Debug)]
pub enum ExternalToolError {
    /// The process could not be started (tool missing, permissions, ...).
    #[error("failed to execute `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// The process ran and reported failure.
    #[error("`{command}` failed with {}", describe_code(.code))]
    NonZero {
        command: String,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
}

impl ExternalToolError {
    /// Builds a [`ExternalToolError::NonZero`] from a finished process.
    pub fn from_status(command: &ToolCommand, status: ExitStatus, stdout: String, stderr: String) -> Self {
        Self::NonZero {
            command: command.to_string(),
            code: status.code(),
            stdout,
            stderr,
        }
    }

    /// Captured stderr, if the tool ran far enough to produce any.
    pub fn stderr(&self) -> &str {
        match self {
            Self::Spawn { .. } => "",
            Self::NonZero { stderr, .. } => stderr,
        }
    }

    /// Exit code to propagate from the binary.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NonZero { code: Some(code), .. } if *code != 0 => *code,
            _ => 1,
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Runs external tools on behalf of the pipeline.
#[allow(async_fn_in_trait)]
pub trait ToolRunner {
    /// Runs `command` to completion.
    ///
    /// Returns [`ExternalToolError::NonZero`] for any unsuccessful exit.
    async fn run(&self, command: &ToolCommand) -> Result<ToolOutput, ExternalToolError>;

    /// Locates `program` on `PATH`.
    fn locate(&self, program: &str) -> Option<PathBuf> {
        match which::which(program) {
            Ok(path) => {
                log::debug!("Found {} at: {}", program, path.display());
                Some(path)
            }
            Err(e) => {
                log::debug!("{} not found in PATH: {}", program, e);
                None
            }
        }
    }
}

/// [`ToolRunner`] backed by real subprocesses.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    async fn run(&self, command: &ToolCommand) -> Result<ToolOutput, ExternalToolError> {
        log::info!("$ {} (in {})", command, command.dir().display());

        let mut process = tokio::process::Command::new(command.program());
        process.args(command.arguments()).current_dir(command.dir());

        let spawn_error = |source| ExternalToolError::Spawn {
            command: command.to_string(),
            source,
        };

        let (status, stdout, stderr) = if command.captures_output() {
            let output = process.output().await.map_err(spawn_error)?;
            (
                output.status,
                String::from_utf8_lossy(&output.stdout).into_owned(),
                String::from_utf8_lossy(&output.stderr).into_owned(),
            )
        } else {
            let status = process.status().await.map_err(spawn_error)?;
            (status, String::new(), String::new())
        };

        if !status.success() {
            log::debug!("`{}` exited with {:?}", command.program(), status.code());
            return Err(ExternalToolError::from_status(command, status, stdout, stderr));
        }

        Ok(ToolOutput {
            stdout,
            stderr,
        })
    }
}

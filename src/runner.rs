//! # External Command Execution
//!
//! Every collaborator the pipeline drives (`a2ensite`, `certbot`, `wp`,
//! `git`, `yarn`, `composer`, `chown`, ...) goes through the
//! [`CommandRunner`] trait. The runner executes one command synchronously
//! and hands back its captured output.
//!
//! A non-zero exit status is **not** an error here. Several collaborators
//! report failure only through their diagnostic text, so callers inspect
//! `stdout`/`stderr` themselves. The only error a runner returns is a
//! failure to start the process at all.
//!
//! The trait exists so tests can swap in a scripted runner instead of
//! touching the host.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// An argument vector plus an optional working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append a path argument, converting it lossily to text.
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy())
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// The full argument vector, program first.
    pub fn argv(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.argv().join(" "))
    }
}

/// Captured output of one finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, when the process exited normally. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i32>,
}

impl CommandOutput {
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            status: None,
        }
    }

    /// Non-empty stderr lines.
    pub fn diagnostics(&self) -> Vec<String> {
        self.stderr
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Executes external commands for the pipeline.
pub trait CommandRunner {
    /// Run `command` to completion and capture its output.
    fn run(&self, command: &CommandSpec) -> Result<CommandOutput>;
}

/// Runs commands on the host with `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &CommandSpec) -> Result<CommandOutput> {
        log::debug!("Running: {}", command);

        let mut process = Command::new(OsStr::new(&command.program));
        process.args(&command.args);
        if let Some(cwd) = &command.cwd {
            process.current_dir(cwd);
        }

        let output = process.output().map_err(|e| Error::CommandSpawn {
            command: command.to_string(),
            message: e.to_string(),
        })?;

        Ok(CommandOutput {
            stdout: decode(output.stdout),
            stderr: decode(output.stderr),
            status: output.status.code(),
        })
    }
}

/// Decode captured bytes, keeping invalid UTF-8 visible as replacement
/// characters instead of failing.
fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

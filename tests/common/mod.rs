//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new();
//!     let runner = RecordingRunner::new();
//!     let report = fixture.provisioner(&runner).run(&SiteRequest::new("demo").unwrap());
//! }
//! ```

use assert_fs::prelude::*;
use mkvhost::config::ProvisionConfig;
use mkvhost::error::{Error, Result};
use mkvhost::runner::{CommandOutput, CommandRunner, CommandSpec};
use mkvhost::stages::orchestrator::Provisioner;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::{RecordingRunner, TestFixture};
    #[allow(unused_imports)]
    pub use mkvhost::runner::CommandOutput;
    #[allow(unused_imports)]
    pub use mkvhost::site::SiteRequest;
    #[allow(unused_imports)]
    pub use mkvhost::stages::Stage;
}

/// A canned answer for commands matching `program` and, when set, an
/// argument containing `needle`.
#[derive(Clone)]
struct Response {
    program: String,
    needle: Option<String>,
    output: Option<CommandOutput>,
    creates: Option<PathBuf>,
}

impl Response {
    fn matches(&self, command: &CommandSpec) -> bool {
        command.program == self.program
            && self
                .needle
                .as_ref()
                .is_none_or(|needle| command.args.iter().any(|arg| arg.contains(needle.as_str())))
    }
}

/// A `CommandRunner` that records every command and answers from a script.
///
/// Clones share the same recording, so a test can keep one handle and give
/// the other to the provisioner. Unscripted commands succeed silently.
#[derive(Clone, Default)]
pub struct RecordingRunner {
    calls: Arc<Mutex<Vec<CommandSpec>>>,
    responses: Arc<Mutex<Vec<Response>>>,
}

#[allow(dead_code)]
impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, response: Response) {
        self.responses.lock().unwrap().push(response);
    }

    /// Answer matching commands with `stdout`/`stderr`.
    pub fn respond(self, program: &str, needle: &str, stdout: &str, stderr: &str) -> Self {
        self.push(Response {
            program: program.to_string(),
            needle: Some(needle.to_string()),
            output: Some(CommandOutput::new(stdout, stderr)),
            creates: None,
        });
        self
    }

    /// Make matching commands fail to start.
    pub fn fail_to_spawn(self, program: &str) -> Self {
        self.push(Response {
            program: program.to_string(),
            needle: None,
            output: None,
            creates: None,
        });
        self
    }

    /// Create `dir` whenever a matching command runs.
    pub fn create_dir_on(self, program: &str, needle: &str, dir: &Path) -> Self {
        self.push(Response {
            program: program.to_string(),
            needle: Some(needle.to_string()),
            output: Some(CommandOutput::default()),
            creates: Some(dir.to_path_buf()),
        });
        self
    }

    /// Every command run so far, in order.
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    /// Every command rendered as one line.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(ToString::to_string).collect()
    }

    /// Commands whose program is `program`.
    pub fn calls_to(&self, program: &str) -> Vec<CommandSpec> {
        self.calls()
            .into_iter()
            .filter(|command| command.program == program)
            .collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, command: &CommandSpec) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push(command.clone());

        let response = self
            .responses
            .lock()
            .unwrap()
            .iter()
            .find(|response| response.matches(command))
            .cloned();

        match response {
            None => Ok(CommandOutput::default()),
            Some(Response { output: None, .. }) => Err(Error::CommandSpawn {
                command: command.to_string(),
                message: "No such file or directory (os error 2)".to_string(),
            }),
            Some(Response {
                output: Some(output),
                creates,
                ..
            }) => {
                if let Some(dir) = creates {
                    fs::create_dir_all(dir).unwrap();
                }
                Ok(output)
            }
        }
    }
}

/// A temporary host layout: sites-available, manifests, document roots and
/// logs all live under one temp directory.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child("sites-available")
            .create_dir_all()
            .expect("Failed to create sites-available");
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    pub fn config(&self) -> ProvisionConfig {
        ProvisionConfig {
            sites_available_dir: self.path().join("sites-available"),
            vhost_conf_dir: self.path().join("vhost_confs"),
            document_root_base: self.path().join("html"),
            log_dir: self.path().join("log"),
            ..ProvisionConfig::default()
        }
    }

    /// Write the fixture's layout as a YAML config file and return its path.
    pub fn write_config_file(&self) -> PathBuf {
        let config = self.config();
        let yaml = serde_yaml::to_string(&config).expect("Failed to serialize config");
        let child = self.temp_dir.child("mkvhost.yaml");
        child.write_str(&yaml).expect("Failed to write config file");
        child.path().to_path_buf()
    }

    pub fn provisioner(&self, runner: &RecordingRunner) -> Provisioner {
        Provisioner::with_runner(self.config(), Box::new(runner.clone()))
    }

    pub fn document_root(&self, site: &str) -> PathBuf {
        self.path().join("html").join(site)
    }

    pub fn wp_content(&self, site: &str) -> PathBuf {
        self.document_root(site).join("wp-content")
    }

    pub fn manifest_path(&self, site: &str) -> PathBuf {
        self.path().join("vhost_confs").join(format!("{site}.conf"))
    }

    pub fn vhost_path(&self, fqdn: &str) -> PathBuf {
        self.path().join("sites-available").join(format!("{fqdn}.conf"))
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

//! Stages of a provisioning run.
//!
//! ## Overview
//!
//! A run walks a fixed, linear sequence of named stages:
//!
//! 1. `DocumentRootCreated` - document root and `.htaccess`
//! 2. `VhostWritten` - virtual-host descriptor
//! 3. `SiteEnabled` - `a2ensite` and a web server restart
//! 4. `CertificateRequested` - `certbot`
//! 5. `ApplicationInstalled` - WordPress download, database, configuration, install
//! 6. `PluginsInstalled` - install and activate each plugin
//! 7. `SproutInstalled` - clone and check out the sprout repository
//! 8. `ReposCloned` - clone each requested repository
//! 9. `ManifestWritten` - JSON manifest of the application site
//! 10. `PermissionsFixed` - hand the files to the web server user
//!
//! Stages 5-9 only run when the application was requested, and 6-8 only
//! when their input is present. A stage that hits an error records it in
//! its [`StageReport`] and the run moves on; only the pre-flight checks in
//! [`orchestrator`] can stop a run.

use crate::classify::CloneResultSet;
use crate::config::ProvisionConfig;
use crate::credentials::DatabaseCredentials;
use crate::error::Result;
use crate::manifest::ProvisioningManifest;
use crate::runner::{CommandOutput, CommandRunner, CommandSpec};
use crate::site::{SiteName, SiteRequest};
use std::fmt;
use std::path::PathBuf;

pub mod application;
pub mod clone;
pub mod finalize;
pub mod orchestrator;
pub mod web;

/// Named states of the provisioning state machine, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    DocumentRootCreated,
    VhostWritten,
    SiteEnabled,
    CertificateRequested,
    ApplicationInstalled,
    PluginsInstalled,
    SproutInstalled,
    ReposCloned,
    ManifestWritten,
    PermissionsFixed,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::DocumentRootCreated => "document root",
            Stage::VhostWritten => "virtual host",
            Stage::SiteEnabled => "enable site",
            Stage::CertificateRequested => "certificate",
            Stage::ApplicationInstalled => "install WordPress",
            Stage::PluginsInstalled => "plugins",
            Stage::SproutInstalled => "sprout",
            Stage::ReposCloned => "clone repositories",
            Stage::ManifestWritten => "manifest",
            Stage::PermissionsFixed => "permissions",
        }
    }

    /// The stages a request walks through, in order.
    pub fn plan(request: &SiteRequest) -> Vec<Stage> {
        let mut stages = vec![
            Stage::DocumentRootCreated,
            Stage::VhostWritten,
            Stage::SiteEnabled,
            Stage::CertificateRequested,
        ];

        if request.wants_application {
            stages.push(Stage::ApplicationInstalled);
            if !request.plugin_refs.is_empty() {
                stages.push(Stage::PluginsInstalled);
            }
            if request.application_version.is_some() {
                stages.push(Stage::SproutInstalled);
            }
            if !request.repo_refs.is_empty() {
                stages.push(Stage::ReposCloned);
            }
            stages.push(Stage::ManifestWritten);
        }

        stages.push(Stage::PermissionsFixed);
        stages
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One command a stage ran, with what it printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRecord {
    pub command: String,
    pub output: CommandOutput,
}

/// What happened during one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub stage: Stage,
    pub commands: Vec<CommandRecord>,
    /// Informational lines for the operator.
    pub notes: Vec<String>,
    /// Errors the stage recorded instead of aborting.
    pub failures: Vec<String>,
}

impl StageReport {
    pub fn new(stage: Stage) -> Self {
        Self {
            stage,
            commands: Vec::new(),
            notes: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn note(&mut self, note: impl Into<String>) {
        let note = note.into();
        log::info!("{}", note);
        self.notes.push(note);
    }

    pub fn fail(&mut self, failure: impl Into<String>) {
        let failure = failure.into();
        log::warn!("{}: {}", self.stage, failure);
        self.failures.push(failure);
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Result of a whole provisioning run.
#[derive(Debug, Clone)]
pub struct ProvisioningReport {
    pub site: String,
    pub fqdn: String,
    pub stages: Vec<StageReport>,
    /// Present only when the application was installed.
    pub manifest: Option<ProvisioningManifest>,
    pub manifest_path: Option<PathBuf>,
}

impl ProvisioningReport {
    pub fn stage(&self, stage: Stage) -> Option<&StageReport> {
        self.stages.iter().find(|report| report.stage == stage)
    }

    pub fn failure_count(&self) -> usize {
        self.stages.iter().map(|report| report.failures.len()).sum()
    }
}

/// Admin and database secrets produced by the application install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installation {
    pub admin_user: String,
    pub admin_password: String,
    pub database: DatabaseCredentials,
}

/// State carried from one stage to a later one.
#[derive(Debug, Default)]
pub(crate) struct RunState {
    pub installation: Option<Installation>,
    pub clone_results: Option<CloneResultSet>,
    pub manifest: Option<ProvisioningManifest>,
    pub manifest_path: Option<PathBuf>,
}

/// Shared, read-only inputs of every stage.
pub struct StageContext<'a> {
    pub config: &'a ProvisionConfig,
    pub runner: &'a dyn CommandRunner,
    pub site: &'a SiteName,
    pub fqdn: &'a str,
}

impl StageContext<'_> {
    pub fn document_root(&self) -> PathBuf {
        self.config.document_root(self.site.as_str())
    }

    /// `--path=<document root>` as understood by WP-CLI.
    pub fn wp_path_arg(&self) -> String {
        format!("--path={}", self.document_root().display())
    }

    /// Run a command, log what it printed and record it in `report`.
    pub fn execute(&self, report: &mut StageReport, command: CommandSpec) -> Result<CommandOutput> {
        log::debug!("Running: {}", command);
        let output = self.runner.run(&command)?;

        if !output.stdout.trim().is_empty() {
            log::info!("{}: {}", command.program, output.stdout.trim_end());
        }
        for line in output.diagnostics() {
            log::warn!("{} [stderr]: {}", command.program, line);
        }

        report.commands.push(CommandRecord {
            command: command.to_string(),
            output: output.clone(),
        });
        Ok(output)
    }

    /// Like [`execute`](Self::execute), but a command that cannot be started
    /// is recorded as a stage failure instead of returned.
    pub fn run(&self, report: &mut StageReport, command: CommandSpec) -> Option<CommandOutput> {
        match self.execute(report, command) {
            Ok(output) => Some(output),
            Err(e) => {
                report.fail(e.to_string());
                None
            }
        }
    }
}

//! Orchestrator for a complete provisioning run
//!
//! [`Provisioner::run`] checks its pre-flight conditions, then walks the
//! stage plan for the request one stage at a time. Each stage finishes
//! before the next starts, because later stages read what earlier ones put
//! on disk. Stage errors go into that stage's report; nothing after the
//! pre-flight checks can stop the run, and `PermissionsFixed` always runs.

use super::{
    application, clone, finalize, web, ProvisioningReport, RunState, Stage, StageContext,
    StageReport,
};
use crate::config::ProvisionConfig;
use crate::error::{Error, Result};
use crate::runner::{CommandRunner, SystemRunner};
use crate::site::{validate_site, SiteRequest};
use std::env;

/// Fail when the process working directory has been removed.
pub fn ensure_working_directory() -> Result<()> {
    env::current_dir()
        .map(|_| ())
        .map_err(|e| Error::WorkingDirectoryMissing {
            message: format!(
                "{e}. Please run mkvhost from a directory that actually exists."
            ),
        })
}

/// Drives the stage sequence for one site.
pub struct Provisioner {
    config: ProvisionConfig,
    runner: Box<dyn CommandRunner>,
}

impl Provisioner {
    /// Creates a provisioner that runs commands on this host.
    pub fn new(config: ProvisionConfig) -> Self {
        Self::with_runner(config, Box::new(SystemRunner))
    }

    /// Creates a provisioner with a custom command runner.
    pub fn with_runner(config: ProvisionConfig, runner: Box<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }

    /// Provision the site described by `request`.
    ///
    /// Returns `Err` only for pre-flight failures, before anything has been
    /// written or executed.
    pub fn run(&self, request: &SiteRequest) -> Result<ProvisioningReport> {
        ensure_working_directory()?;

        let (site, fqdn) = validate_site(request.name.as_str(), &self.config.domain)?;
        let ctx = StageContext {
            config: &self.config,
            runner: self.runner.as_ref(),
            site: &site,
            fqdn: &fqdn,
        };

        log::info!("Provisioning {}", fqdn);
        let mut state = RunState::default();
        let mut stages = Vec::new();
        for stage in Stage::plan(request) {
            log::info!("==> {}", stage);
            stages.push(self.enter(stage, &ctx, request, &mut state));
        }

        Ok(ProvisioningReport {
            site: site.to_string(),
            fqdn,
            stages,
            manifest: state.manifest,
            manifest_path: state.manifest_path,
        })
    }

    fn enter(
        &self,
        stage: Stage,
        ctx: &StageContext<'_>,
        request: &SiteRequest,
        state: &mut RunState,
    ) -> StageReport {
        let mut report = StageReport::new(stage);

        let result = match stage {
            Stage::DocumentRootCreated => web::create_document_root(ctx, &mut report),
            Stage::VhostWritten => web::write_vhost(ctx, &mut report),
            Stage::SiteEnabled => {
                web::enable_site(ctx, &mut report);
                Ok(())
            }
            Stage::CertificateRequested => {
                web::request_certificate(ctx, &mut report);
                Ok(())
            }
            Stage::ApplicationInstalled => {
                state.installation = Some(application::install_application(ctx, &mut report));
                Ok(())
            }
            Stage::PluginsInstalled => {
                application::install_plugins(ctx, &mut report, &request.plugin_refs);
                Ok(())
            }
            Stage::SproutInstalled => {
                if let Some(version) = &request.application_version {
                    application::install_sprout(
                        ctx,
                        &mut report,
                        version,
                        request.application_branch.as_deref(),
                    );
                }
                Ok(())
            }
            Stage::ReposCloned => {
                state.clone_results = Some(clone::clone_repositories(
                    ctx,
                    &mut report,
                    &request.repo_refs,
                ));
                Ok(())
            }
            Stage::ManifestWritten => match &state.installation {
                Some(installation) => finalize::write_manifest(
                    ctx,
                    &mut report,
                    installation,
                    state.clone_results.take(),
                )
                .map(|(manifest, path)| {
                    state.manifest = Some(manifest);
                    state.manifest_path = Some(path);
                }),
                None => {
                    report.fail("WordPress was not installed; no manifest written");
                    Ok(())
                }
            },
            Stage::PermissionsFixed => {
                finalize::fix_permissions(ctx, &mut report);
                Ok(())
            }
        };

        if let Err(e) = result {
            report.fail(e.to_string());
        }
        report
    }
}

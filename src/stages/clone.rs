//! Batch cloning of repository references into a site's `wp-content`.
//!
//! Each reference is resolved, cloned with `git -C <wp-content> clone`, and
//! the clone's stderr classified. A missing `wp-content` ends the batch at
//! the first reference that trips over it.

use super::{StageContext, StageReport};
use crate::classify::{
    classify, Classification, CloneAttempt, CloneOutcome, CloneResultSet, DependencyInstall,
    PREREQUISITE_MISSING_MESSAGE,
};
use crate::repository::resolve;
use crate::runner::{CommandOutput, CommandSpec};
use std::path::Path;

/// Clone every reference in order and collect the outcomes.
pub fn clone_repositories(
    ctx: &StageContext<'_>,
    report: &mut StageReport,
    references: &[String],
) -> CloneResultSet {
    let target = ctx.config.clone_dir(ctx.site.as_str());
    let mut results = CloneResultSet::default();
    report.note(format!("Cloning Git Repo(s): {}", references.join(", ")));

    for reference in references {
        let resolved = match resolve(reference, &ctx.config.git_host, &ctx.config.default_owner) {
            Ok(resolved) => resolved,
            Err(e) => {
                report.fail(e.to_string());
                results.record(CloneOutcome::Failed {
                    repository: reference.clone(),
                    diagnostic: vec![e.to_string()],
                });
                continue;
            }
        };

        let target_exists = target.is_dir();
        let command = CommandSpec::new("git")
            .arg("-C")
            .path_arg(&target)
            .arg("clone")
            .arg(resolved.clone_url.as_str());

        let output = match ctx.execute(report, command) {
            Ok(output) => output,
            Err(e) => {
                report.fail(e.to_string());
                results.record(CloneOutcome::Failed {
                    repository: resolved.canonical_name,
                    diagnostic: vec![e.to_string()],
                });
                continue;
            }
        };

        let attempt = CloneAttempt {
            canonical_name: &resolved.canonical_name,
            dir_name: &resolved.dir_name,
            stderr: &output.stderr,
            target_exists,
            organization_marker: &ctx.config.organization_marker,
        };

        match classify(&attempt) {
            Classification::PrerequisiteMissing => {
                report.fail(PREREQUISITE_MISSING_MESSAGE);
                results.record(CloneOutcome::PrerequisiteMissing {
                    diagnostic: PREREQUISITE_MISSING_MESSAGE.to_string(),
                });
                break;
            }
            Classification::Succeeded {
                install_dependencies,
            } => {
                report.note(format!("Cloned {}", resolved.canonical_name));
                let dependencies = install_dependencies.then(|| {
                    install_dev_dependencies(ctx, report, &target.join(&resolved.dir_name))
                });
                results.record(CloneOutcome::Succeeded {
                    repository: resolved.canonical_name,
                    dependencies,
                });
            }
            Classification::Failed { diagnostic } => {
                report.fail(format!(
                    "Clone of {} failed: {}",
                    resolved.canonical_name,
                    diagnostic.join(" | ")
                ));
                results.record(CloneOutcome::Failed {
                    repository: resolved.canonical_name,
                    diagnostic,
                });
            }
        }
    }

    results
}

/// Install frontend and backend dependencies inside a fresh clone.
///
/// A package manager that cannot be started is a stage failure; its error
/// text also stands in for the missing stderr in the success record.
fn install_dev_dependencies(
    ctx: &StageContext<'_>,
    report: &mut StageReport,
    checkout: &Path,
) -> DependencyInstall {
    let mut run_in_checkout = |command: CommandSpec| {
        match ctx.execute(report, command.current_dir(checkout)) {
            Ok(output) => output,
            Err(e) => {
                report.fail(e.to_string());
                CommandOutput::new("", e.to_string())
            }
        }
    };

    let yarn = run_in_checkout(CommandSpec::new("yarn").arg("install"));
    let composer = run_in_checkout(CommandSpec::new("composer").args(["-o", "install"]));
    DependencyInstall { yarn, composer }
}

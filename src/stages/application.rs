//! WordPress stages: core install, plugins and the sprout variant.
//!
//! Everything here goes through WP-CLI (`wp ... --allow-root`) against the
//! site's document root. WP-CLI output is logged and recorded, never
//! interpreted: a failed step leaves its diagnostics in the stage report and
//! the next step runs anyway.

use super::clone::clone_repositories;
use super::{Installation, StageContext, StageReport};
use crate::credentials::{generate_secret, DatabaseCredentials};
use crate::runner::CommandSpec;

/// Download, configure and install WordPress, creating its database on the way.
///
/// Credentials are generated exactly once here and returned even when a
/// collaborator reported an error, so the manifest always records them.
pub fn install_application(ctx: &StageContext<'_>, report: &mut StageReport) -> Installation {
    let path_arg = ctx.wp_path_arg();
    report.note(format!("Installing WordPress into {}", ctx.document_root().display()));

    ctx.run(
        report,
        CommandSpec::new("wp")
            .args(["core", "download", "--force"])
            .args([path_arg.as_str(), "--allow-root"]),
    );

    let database = DatabaseCredentials::generate(ctx.site, ctx.config.credential_length);
    create_database(ctx, report, &database);

    ctx.run(
        report,
        CommandSpec::new("wp")
            .args(["config", "create"])
            .arg(format!("--dbname={}", database.database_name))
            .arg(format!("--dbuser={}", database.database_user))
            .arg(format!("--dbpass={}", database.database_password))
            .args([path_arg.as_str(), "--allow-root"]),
    );
    ctx.run(
        report,
        CommandSpec::new("wp")
            .args(["config", "set", "WP_DEBUG", "true"])
            .args([path_arg.as_str(), "--allow-root"]),
    );

    let admin_user = format!("{}adm", ctx.site);
    let admin_password = generate_secret(ctx.config.credential_length);
    ctx.run(
        report,
        CommandSpec::new("wp")
            .args(["core", "install"])
            .arg(format!("--url=https://{}", ctx.fqdn))
            .arg(format!(
                "--title={}{}",
                ctx.config.site_title_prefix,
                ctx.site.capitalized()
            ))
            .arg(format!("--admin_user={admin_user}"))
            .arg(format!("--admin_password={admin_password}"))
            .arg(format!("--admin_email={}", ctx.config.admin_email))
            .arg("--skip-email")
            .args([path_arg.as_str(), "--allow-root"]),
    );

    Installation {
        admin_user,
        admin_password,
        database,
    }
}

fn create_database(ctx: &StageContext<'_>, report: &mut StageReport, database: &DatabaseCredentials) {
    let mut command = CommandSpec::new("mysql");
    if let Some(password) = &ctx.config.mysql_password {
        command = command.arg(format!("-p{password}"));
    }
    let command = command
        .arg("-u")
        .arg(ctx.config.mysql_user.as_str())
        .arg("-e")
        .arg(database.create_statement());
    ctx.run(report, command);
}

/// Install and activate each plugin in order.
pub fn install_plugins(ctx: &StageContext<'_>, report: &mut StageReport, plugins: &[String]) {
    let path_arg = ctx.wp_path_arg();
    for plugin in plugins {
        report.note(format!("Plugin: {plugin}"));
        for action in ["install", "activate"] {
            ctx.run(
                report,
                CommandSpec::new("wp")
                    .args(["plugin", action, plugin.as_str()])
                    .args([path_arg.as_str(), "--allow-root"]),
            );
        }
    }
}

/// Clone the sprout repository and check out `branch` when one is given.
///
/// The sprout build itself is done by hand; `version` is reported only.
pub fn install_sprout(
    ctx: &StageContext<'_>,
    report: &mut StageReport,
    version: &str,
    branch: Option<&str>,
) {
    report.note(format!("Installing Sprout: {version}"));

    let repository = ctx.config.sprout_repository.clone();
    let results = clone_repositories(ctx, report, std::slice::from_ref(&repository));
    for outcome in results.successes.iter().chain(&results.failures) {
        report.note(outcome.to_string());
    }

    match branch {
        Some(branch) => {
            report.note(format!("Installing Branch: {branch}"));
            let checkout_dir = ctx.config.clone_dir(ctx.site.as_str()).join(&repository);
            ctx.run(
                report,
                CommandSpec::new("git")
                    .arg("-C")
                    .path_arg(&checkout_dir)
                    .args(["checkout", branch]),
            );
        }
        None => report.note("No sprout branch requested; staying on the default branch"),
    }
}

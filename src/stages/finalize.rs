//! Closing stages: the manifest and file ownership.

use super::{Installation, StageContext, StageReport};
use crate::classify::CloneResultSet;
use crate::error::Result;
use crate::manifest::ProvisioningManifest;
use crate::runner::CommandSpec;
use std::path::PathBuf;

/// Assemble the manifest for an installed application site and save it.
pub fn write_manifest(
    ctx: &StageContext<'_>,
    report: &mut StageReport,
    installation: &Installation,
    clone_results: Option<CloneResultSet>,
) -> Result<(ProvisioningManifest, PathBuf)> {
    let manifest = ProvisioningManifest {
        admin_url: format!("https://{}/wp-admin/", ctx.fqdn),
        admin_user: installation.admin_user.clone(),
        admin_password: installation.admin_password.clone(),
        database_credentials: installation.database.clone(),
        clone_results,
    };

    let path = ctx.config.manifest_path(ctx.site.as_str());
    manifest.save(&path)?;
    report.note(format!("Wrote {}", path.display()));
    Ok((manifest, path))
}

/// Hand the document root and the manifest directory to the web server user.
pub fn fix_permissions(ctx: &StageContext<'_>, report: &mut StageReport) {
    let owner = ctx.config.web_owner.as_str();
    for dir in [ctx.document_root(), ctx.config.vhost_conf_dir.clone()] {
        ctx.run(
            report,
            CommandSpec::new("chown").args(["-R", owner]).path_arg(&dir),
        );
    }
}

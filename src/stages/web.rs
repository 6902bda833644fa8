//! Web server stages: document root, virtual host, site enable, certificate.

use super::{StageContext, StageReport};
use crate::error::Result;
use crate::runner::CommandSpec;
use crate::template::{render_htaccess, render_vhost, write_file};
use std::fs;

/// Create the document root and write its `.htaccess`.
pub fn create_document_root(ctx: &StageContext<'_>, report: &mut StageReport) -> Result<()> {
    let doc_root = ctx.document_root();
    fs::create_dir_all(&doc_root)?;
    report.note(format!("Document root: {}", doc_root.display()));

    let htaccess_path = doc_root.join(".htaccess");
    write_file(&htaccess_path, &render_htaccess(&doc_root))?;
    report.note(format!("Wrote {}", htaccess_path.display()));
    Ok(())
}

/// Write `<fqdn>.conf` into the sites-available directory.
pub fn write_vhost(ctx: &StageContext<'_>, report: &mut StageReport) -> Result<()> {
    let path = ctx.config.vhost_path(ctx.fqdn);
    let vhost = render_vhost(ctx.site.as_str(), ctx.fqdn, ctx.config);
    write_file(&path, &vhost)?;
    report.note(format!("Wrote {}", path.display()));
    Ok(())
}

pub fn enable_site(ctx: &StageContext<'_>, report: &mut StageReport) {
    ctx.run(report, CommandSpec::new("a2ensite").arg(ctx.fqdn));
    ctx.run(
        report,
        CommandSpec::new("systemctl").args(["restart", ctx.config.web_server_service.as_str()]),
    );
}

pub fn request_certificate(ctx: &StageContext<'_>, report: &mut StageReport) {
    let command = CommandSpec::new("certbot")
        .args([
            "--apache",
            "--agree-tos",
            "--redirect",
            "--hsts",
            "--staple-ocsp",
            "--must-staple",
            "-d",
        ])
        .arg(ctx.fqdn)
        .arg("--email")
        .arg(ctx.config.admin_email.as_str());
    ctx.run(report, command);
}

//! # Output Configuration
//!
//! Controls how the end-of-run summary looks on the terminal.
//!
//! ## Respecting User Preferences
//!
//! The module respects the following environment variables and flags:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals

use crate::stages::{ProvisioningReport, StageReport};
use console::style;
use std::env;
use std::fmt::Write;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `color_flag` is the value of `--color`: "always", "never" or "auto".
    /// In auto mode colors are disabled by `NO_COLOR`, `CLICOLOR=0`,
    /// `TERM=dumb`, or a non-TTY stdout (unless `CLICOLOR_FORCE=1`).
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // The presence of NO_COLOR (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Returns the emoji when colors are enabled, the plain text otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

fn stage_line(config: &OutputConfig, stage: &StageReport) -> String {
    let marker = if stage.is_clean() {
        emoji(config, "✅", "[OK]  ")
    } else {
        emoji(config, "⚠️ ", "[WARN]")
    };
    let name = if config.use_color {
        style(stage.stage.name()).bold().to_string()
    } else {
        stage.stage.name().to_string()
    };
    format!("{marker} {name}")
}

/// Render the end-of-run summary.
///
/// Secrets are included on purpose: the operator needs the admin password
/// to log in, and it is also stored in the manifest.
pub fn render_report(config: &OutputConfig, report: &ProvisioningReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} Provisioned {}",
        emoji(config, "🌐", "[SITE]"),
        report.fqdn
    );
    let _ = writeln!(out);

    for stage in &report.stages {
        let _ = writeln!(out, "{}", stage_line(config, stage));
        for failure in &stage.failures {
            let failure = if config.use_color {
                style(failure).yellow().to_string()
            } else {
                failure.clone()
            };
            let _ = writeln!(out, "       {failure}");
        }
    }

    if let Some(manifest) = &report.manifest {
        let _ = writeln!(out);
        let _ = writeln!(out, "Admin URL:      {}", manifest.admin_url);
        let _ = writeln!(out, "Admin User:     {}", manifest.admin_user);
        let _ = writeln!(out, "Admin Password: {}", manifest.admin_password);
        if let Some(path) = &report.manifest_path {
            let _ = writeln!(out, "Manifest:       {}", path.display());
        }
    }

    let failures = report.failure_count();
    let _ = writeln!(out);
    if failures == 0 {
        let _ = writeln!(out, "{} Done", emoji(config, "🎉", "[DONE]"));
    } else {
        let _ = writeln!(
            out,
            "{} Done with {} recorded problem(s)",
            emoji(config, "⚠️ ", "[DONE]"),
            failures
        );
    }
    out
}

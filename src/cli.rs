//! CLI argument parsing and dispatch

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use mkvhost::config::ProvisionConfig;
use mkvhost::output::{render_report, OutputConfig};
use mkvhost::site::SiteRequest;
use mkvhost::stages::orchestrator::Provisioner;

/// Provision a development virtual host, optionally with WordPress
#[derive(Parser, Debug)]
#[command(name = "mkvhost")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Site name (letters and digits only); served as <site>.<domain>
    pub site: String,

    /// This is a WordPress site
    #[arg(short, long)]
    pub wordpress: bool,

    /// Install BoldGrid Inspirations (reserved, currently has no effect)
    #[arg(short = 'I', long)]
    pub inspirations: bool,

    /// Plugins to install and activate
    #[arg(short, long, num_args = 1.., value_name = "PLUGIN")]
    pub plugins: Vec<String>,

    /// Git repos to clone into wp-content (owner/name or name)
    #[arg(short, long, num_args = 1.., value_name = "REPO")]
    pub git: Vec<String>,

    /// Sprout version to install
    #[arg(short, long, value_name = "VERSION")]
    pub sprout: Option<String>,

    /// Sprout branch to check out
    #[arg(short, long, value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Path to a YAML config file
    #[arg(long, value_name = "PATH", env = "MKVHOST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database administrator password
    #[arg(long, value_name = "PASSWORD", env = "MKVHOST_MYSQL_PASSWORD", hide_env_values = true)]
    pub mysql_password: Option<String>,

    /// Colorize output (always, never, auto)
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);
        let output = OutputConfig::from_env_and_flag(&self.color);

        let request = SiteRequest::new(&self.site)?
            .with_application(self.wordpress)
            .with_plugins(self.plugins)
            .with_repositories(self.git)
            .with_sprout(self.sprout, self.branch);
        if self.inspirations {
            log::debug!("--inspirations is reserved and has no effect");
        }

        let mut config = ProvisionConfig::load(self.config.as_deref())?;
        if self.mysql_password.is_some() {
            config.mysql_password = self.mysql_password;
        }

        let report = Provisioner::new(config).run(&request)?;
        print!("{}", render_report(&output, &report));
        Ok(())
    }
}

/// Progress and diagnostics go to stdout alongside the summary.
/// `RUST_LOG` wins over `--log-level` when set.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .target(env_logger::Target::Stdout)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_full_invocation() {
        let cli = Cli::try_parse_from([
            "mkvhost", "demo", "-w", "-p", "akismet", "jetpack", "-g", "foo/bar", "baz", "-s",
            "1.2.0", "-b", "develop",
        ])
        .unwrap();
        assert_eq!(cli.site, "demo");
        assert!(cli.wordpress);
        assert!(!cli.inspirations);
        assert_eq!(cli.plugins, vec!["akismet", "jetpack"]);
        assert_eq!(cli.git, vec!["foo/bar", "baz"]);
        assert_eq!(cli.sprout.as_deref(), Some("1.2.0"));
        assert_eq!(cli.branch.as_deref(), Some("develop"));
        assert_eq!(cli.color, "auto");
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn test_parse_requires_site() {
        assert!(Cli::try_parse_from(["mkvhost", "-w"]).is_err());
    }

    #[test]
    fn test_invalid_site_fails_before_config_is_read() {
        let cli = Cli::try_parse_from([
            "mkvhost",
            "bad-name",
            "--config",
            "/nonexistent/config.yaml",
        ])
        .unwrap();
        let err = cli.execute().unwrap_err();
        assert!(err.to_string().contains("alphanumeric"));
    }
}

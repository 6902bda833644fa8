//! # Provisioning Configuration
//!
//! This module defines `ProvisionConfig`, the immutable set of host-level
//! settings (domain, directory layout, service names, account defaults)
//! that every provisioning run reads from. It is built once, before the
//! pipeline starts, and handed to the `Provisioner` by value.
//!
//! ## Sources
//!
//! 1. An explicit YAML file (`--config` / `MKVHOST_CONFIG`). A missing or
//!    malformed explicit file is a fatal error.
//! 2. The platform config file (`~/.config/mkvhost/config.yaml`) when it
//!    exists.
//! 3. Built-in defaults from [`crate::defaults`].
//!
//! Every key is optional; absent keys take their default value.
//!
//! ```yaml
//! domain: example.test
//! document_root_base: /srv/www
//! mysql_password: hunter2
//! ```

use crate::defaults;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Host-level settings shared by every stage of a provisioning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisionConfig {
    /// Base domain appended to every site name.
    pub domain: String,
    /// Directory the web server reads virtual-host descriptors from.
    pub sites_available_dir: PathBuf,
    /// Directory holding the per-site JSON manifests.
    pub vhost_conf_dir: PathBuf,
    /// Parent of every site's document root.
    pub document_root_base: PathBuf,
    /// Web server access-log directory.
    pub log_dir: PathBuf,
    /// Let's Encrypt configuration root.
    pub letsencrypt_dir: PathBuf,
    /// Service restarted after a site is enabled.
    pub web_server_service: String,
    /// Database administrator account used to create site databases.
    pub mysql_user: String,
    /// Database administrator password. Omitted from the `mysql` call when unset.
    pub mysql_password: Option<String>,
    pub admin_email: String,
    pub site_title_prefix: String,
    /// Host that short-form repository references resolve against.
    pub git_host: Url,
    /// Owner used for single-segment repository references.
    pub default_owner: String,
    /// Repositories whose name contains this marker get their dependencies installed.
    pub organization_marker: String,
    pub sprout_repository: String,
    /// `user:group` handed to `chown -R` at the end of the run.
    pub web_owner: String,
    pub credential_length: usize,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            domain: defaults::DOMAIN.to_string(),
            sites_available_dir: PathBuf::from(defaults::SITES_AVAILABLE_DIR),
            vhost_conf_dir: PathBuf::from(defaults::VHOST_CONF_DIR),
            document_root_base: PathBuf::from(defaults::DOCUMENT_ROOT_BASE),
            log_dir: PathBuf::from(defaults::LOG_DIR),
            letsencrypt_dir: PathBuf::from(defaults::LETSENCRYPT_DIR),
            web_server_service: defaults::WEB_SERVER_SERVICE.to_string(),
            mysql_user: defaults::MYSQL_USER.to_string(),
            mysql_password: None,
            admin_email: defaults::ADMIN_EMAIL.to_string(),
            site_title_prefix: defaults::SITE_TITLE_PREFIX.to_string(),
            git_host: Url::parse(defaults::GIT_HOST).expect("default git host is a valid URL"),
            default_owner: defaults::DEFAULT_OWNER.to_string(),
            organization_marker: defaults::ORGANIZATION_MARKER.to_string(),
            sprout_repository: defaults::SPROUT_REPOSITORY.to_string(),
            web_owner: defaults::WEB_OWNER.to_string(),
            credential_length: defaults::CREDENTIAL_LENGTH,
        }
    }
}

impl ProvisionConfig {
    /// Parse a configuration from YAML text.
    pub fn parse(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("cannot read {}: {}", path.display(), e),
            hint: Some("pass --config with an existing YAML file".to_string()),
        })?;
        Self::parse(&text)
    }

    /// Resolve the configuration for this run.
    ///
    /// An explicit path must exist. Otherwise the platform default file is
    /// used if present, falling back to built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match defaults::default_config_path() {
            Some(path) if path.is_file() => {
                log::debug!("Loading configuration from {}", path.display());
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.domain.is_empty() {
            return Err(Error::Config {
                message: "domain must not be empty".to_string(),
                hint: None,
            });
        }
        if self.credential_length == 0 {
            return Err(Error::Config {
                message: "credential_length must be at least 1".to_string(),
                hint: None,
            });
        }
        if !self.git_host.path().ends_with('/') {
            return Err(Error::Config {
                message: format!("git_host '{}' must end with '/'", self.git_host),
                hint: Some("use a host URL such as https://github.com/".to_string()),
            });
        }
        Ok(())
    }

    /// Document root of a site.
    pub fn document_root(&self, site: &str) -> PathBuf {
        self.document_root_base.join(site)
    }

    /// Directory repositories are cloned into. It only exists once the
    /// application has been installed.
    pub fn clone_dir(&self, site: &str) -> PathBuf {
        self.document_root(site).join("wp-content")
    }

    /// Path of the virtual-host descriptor for a fully-qualified name.
    pub fn vhost_path(&self, fqdn: &str) -> PathBuf {
        self.sites_available_dir.join(format!("{fqdn}.conf"))
    }

    /// Path of the JSON manifest for a site.
    pub fn manifest_path(&self, site: &str) -> PathBuf {
        self.vhost_conf_dir.join(format!("{site}.conf"))
    }

    /// Directory holding the certificate for the base domain.
    pub fn certificate_dir(&self) -> PathBuf {
        self.letsencrypt_dir.join("live").join(&self.domain)
    }
}

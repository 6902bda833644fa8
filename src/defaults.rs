//! Default values for mkvhost configuration.
//!
//! These mirror the layout of a Debian Apache host with Let's Encrypt
//! certificates and WP-CLI installed.

use std::path::PathBuf;

pub const DOMAIN: &str = "boldgrid.dev";
pub const SITES_AVAILABLE_DIR: &str = "/etc/apache2/sites-available";
pub const VHOST_CONF_DIR: &str = "/var/www/vhost_confs";
pub const DOCUMENT_ROOT_BASE: &str = "/var/www/html";
pub const LOG_DIR: &str = "/var/log/apache2";
pub const LETSENCRYPT_DIR: &str = "/etc/letsencrypt";
pub const WEB_SERVER_SERVICE: &str = "apache2";
pub const MYSQL_USER: &str = "phpmyadmin";
pub const ADMIN_EMAIL: &str = "wordpress@boldgrid.dev";
pub const SITE_TITLE_PREFIX: &str = "BG Dev - ";
pub const GIT_HOST: &str = "https://github.com/";
pub const DEFAULT_OWNER: &str = "boldgrid";
pub const ORGANIZATION_MARKER: &str = "boldgrid";
pub const SPROUT_REPOSITORY: &str = "sprout-invoices";
pub const WEB_OWNER: &str = "www-data:www-data";
pub const CREDENTIAL_LENGTH: usize = 12;

/// Returns the default configuration file path.
///
/// Uses the platform-appropriate config directory:
/// - Linux: `~/.config/mkvhost/config.yaml` (XDG Base Directory)
/// - macOS: `~/Library/Application Support/mkvhost/config.yaml`
///
/// Returns `None` when the platform config directory cannot be determined.
/// This can be overridden by the `--config` CLI flag or the
/// `MKVHOST_CONFIG` environment variable.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("mkvhost").join("config.yaml"))
}

//! Virtual-host and access-rule templates.
//!
//! Both renderers are pure: they only interpolate already-validated site
//! names and configured paths. [`write_file`] is the one place the rendered
//! text reaches the disk.

use crate::config::ProvisionConfig;
use crate::error::Result;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Render the Apache virtual-host descriptor for a site.
///
/// The descriptor declares a plain `*:80` host and an `mod_ssl`-guarded
/// `*:443` host that uses the base domain's certificate.
pub fn render_vhost(site: &str, fqdn: &str, config: &ProvisionConfig) -> String {
    let doc_root = config.document_root(site);
    let doc_root = doc_root.display();
    let log_dir = config.log_dir.display();
    let cert_dir = config.certificate_dir();
    let cert_dir = cert_dir.display();
    let letsencrypt_dir = config.letsencrypt_dir.display();

    format!(
        r#"<VirtualHost *:80>
        ServerName {fqdn}
        DocumentRoot {doc_root}

        ErrorLog {doc_root}/error.log
        CustomLog {log_dir}/{site}.access.log combined

        <Directory {doc_root}/>
            Options FollowSymLinks
            AllowOverride All
            Require all granted
        </Directory>
    </VirtualHost>
	<IfModule mod_ssl.c>
		SSLStaplingCache shmcb:/var/run/apache2/stapling_cache(128000)
		<VirtualHost *:443>
				ServerName {fqdn}
				DocumentRoot {doc_root}

				ErrorLog {doc_root}/ssl.error.log
				CustomLog {log_dir}/{site}-ssl.access.log combined

				<Directory {doc_root}/>
					Options FollowSymLinks
					AllowOverride All
					Require all granted
				</Directory>

			SSLCertificateFile {cert_dir}/fullchain.pem
			SSLCertificateKeyFile {cert_dir}/privkey.pem

			Include {letsencrypt_dir}/options-ssl-apache.conf

			Header always set Strict-Transport-Security "max-age=31536000"

			SSLUseStapling on

		</VirtualHost>
	</IfModule>"#
    )
}

/// Render the `.htaccess` access rules for a document root.
pub fn render_htaccess(doc_root: &Path) -> String {
    let doc_root = doc_root.display();
    format!(
        r#"php_value error_log "{doc_root}/php.error.log"

	<IfModule mod_rewrite.c>
	RewriteEngine On
	RewriteRule .* - [E=HTTP_AUTHORIZATION:%{{HTTP:Authorization}}]
	RewriteBase /
	RewriteRule ^index\.php$ - [L]
	RewriteCond %{{REQUEST_FILENAME}} !-f
	RewriteCond %{{REQUEST_FILENAME}} !-d
	RewriteRule . /index.php [L]
	</IfModule>"#
    )
}

/// Create or truncate `path` and write `contents` to it.
///
/// The handle is flushed and closed before returning, on success and on
/// error alike.
pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_render_vhost_interpolates_site_values() {
        let config = ProvisionConfig::default();
        let vhost = render_vhost("demo", "demo.boldgrid.dev", &config);

        assert!(vhost.starts_with("<VirtualHost *:80>"));
        assert_eq!(vhost.matches("ServerName demo.boldgrid.dev").count(), 2);
        assert_eq!(vhost.matches("DocumentRoot /var/www/html/demo").count(), 2);
        assert!(vhost.contains("ErrorLog /var/www/html/demo/error.log"));
        assert!(vhost.contains("ErrorLog /var/www/html/demo/ssl.error.log"));
        assert!(vhost.contains("CustomLog /var/log/apache2/demo.access.log combined"));
        assert!(vhost.contains("CustomLog /var/log/apache2/demo-ssl.access.log combined"));
        assert!(vhost.contains("<Directory /var/www/html/demo/>"));
        assert!(vhost
            .contains("SSLCertificateFile /etc/letsencrypt/live/boldgrid.dev/fullchain.pem"));
        assert!(vhost
            .contains("SSLCertificateKeyFile /etc/letsencrypt/live/boldgrid.dev/privkey.pem"));
        assert!(vhost.contains("Include /etc/letsencrypt/options-ssl-apache.conf"));
        assert!(vhost.trim_end().ends_with("</IfModule>"));
    }

    #[test]
    fn test_render_vhost_is_deterministic() {
        let config = ProvisionConfig::default();
        assert_eq!(
            render_vhost("demo", "demo.boldgrid.dev", &config),
            render_vhost("demo", "demo.boldgrid.dev", &config)
        );
    }

    #[test]
    fn test_render_vhost_follows_config_paths() {
        let config = ProvisionConfig {
            document_root_base: PathBuf::from("/srv/www"),
            log_dir: PathBuf::from("/srv/log"),
            domain: "example.test".to_string(),
            ..ProvisionConfig::default()
        };
        let vhost = render_vhost("shop", "shop.example.test", &config);
        assert!(vhost.contains("DocumentRoot /srv/www/shop"));
        assert!(vhost.contains("CustomLog /srv/log/shop.access.log combined"));
        assert!(vhost.contains("/etc/letsencrypt/live/example.test/fullchain.pem"));
    }

    #[test]
    fn test_render_htaccess() {
        let htaccess = render_htaccess(Path::new("/var/www/html/demo"));
        assert!(htaccess.starts_with(r#"php_value error_log "/var/www/html/demo/php.error.log""#));
        assert!(htaccess.contains("RewriteRule .* - [E=HTTP_AUTHORIZATION:%{HTTP:Authorization}]"));
        assert!(htaccess.contains("RewriteCond %{REQUEST_FILENAME} !-f"));
        assert!(htaccess.contains("RewriteCond %{REQUEST_FILENAME} !-d"));
        assert!(htaccess.contains(r"RewriteRule ^index\.php$ - [L]"));
        assert!(htaccess.contains("RewriteRule . /index.php [L]"));
    }

    #[test]
    fn test_write_file_truncates_existing_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".htaccess");
        std::fs::write(&path, "old content that is longer than the new one").unwrap();

        write_file(&path, "new").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_write_file_missing_parent_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("file.conf");
        assert!(write_file(&path, "x").is_err());
    }
}

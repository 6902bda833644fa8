//! Random credentials for development sites.
//!
//! Secrets are drawn from the thread-local generator. They protect throwaway
//! development databases and admin accounts only.

use crate::site::SiteName;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Letters and digits, 62 characters.
pub const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a random alphanumeric string of `length` characters.
pub fn generate_secret(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..ALPHABET.len());
            ALPHABET[idx] as char
        })
        .collect()
}

/// Database name, user and password for one site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseCredentials {
    #[serde(rename = "db_name")]
    pub database_name: String,
    #[serde(rename = "db_user")]
    pub database_user: String,
    #[serde(rename = "db_pass")]
    pub database_password: String,
}

impl DatabaseCredentials {
    /// Credentials for `site`: database and user are both `<site>_wp`.
    pub fn generate(site: &SiteName, length: usize) -> Self {
        let name = format!("{}_wp", site);
        Self {
            database_name: name.clone(),
            database_user: name,
            database_password: generate_secret(length),
        }
    }

    /// SQL that creates the database and grants the user full access to it.
    pub fn create_statement(&self) -> String {
        format!(
            "CREATE DATABASE {db};GRANT ALL ON {db}.* TO '{user}'@'localhost' IDENTIFIED BY '{pass}';FLUSH PRIVILEGES;",
            db = self.database_name,
            user = self.database_user,
            pass = self.database_password,
        )
    }
}

//! # Provisioning Manifest
//!
//! The manifest is the durable record of an application site: admin login,
//! database credentials and what happened to each requested repository. It
//! is written once, as 4-space indented JSON with keys in declaration order.
//!
//! Credentials are stored in clear text. The manifest lives on a development
//! host and is meant to be read by the operator.

use crate::classify::CloneResultSet;
use crate::credentials::DatabaseCredentials;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// What an application site was provisioned with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningManifest {
    #[serde(rename = "ADMIN_URL")]
    pub admin_url: String,
    #[serde(rename = "ADMIN_USER")]
    pub admin_user: String,
    #[serde(rename = "ADMIN_PASS")]
    pub admin_password: String,
    #[serde(rename = "DB_DATA")]
    pub database_credentials: DatabaseCredentials,
    /// `None` when no repositories were requested.
    #[serde(rename = "GITS_CLONED")]
    pub clone_results: Option<CloneResultSet>,
}

impl ProvisioningManifest {
    /// Render the manifest as pretty JSON with 4-space indentation.
    pub fn to_json(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
        self.serialize(&mut serializer)?;
        Ok(())
    }

    /// Write the manifest to `path`, creating its parent directory if needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Read a manifest back from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

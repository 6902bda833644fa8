//! # Site Identity
//!
//! The site name is the single piece of operator input that ends up in file
//! paths, service names and command arguments. [`SiteName::parse`] is the
//! only way to build one, and it only accepts non-empty ASCII alphanumeric
//! strings, so every downstream path or argument derived from a `SiteName`
//! is free of separators, whitespace and shell metacharacters.

use crate::error::{Error, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static SITE_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("site name pattern compiles"));

/// A validated site name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SiteName(String);

impl SiteName {
    /// Validate a raw site name.
    pub fn parse(raw: &str) -> Result<Self> {
        if SITE_NAME_PATTERN.is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(Error::InvalidIdentifier {
                name: raw.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `<site>.<domain>`
    pub fn fully_qualified(&self, domain: &str) -> String {
        format!("{}.{}", self.0, domain)
    }

    /// The site name with its first letter upper-cased and the rest
    /// lower-cased, as used in the application title.
    pub fn capitalized(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(char::to_lowercase))
                .collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for SiteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SiteName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validate a raw site name and derive its fully-qualified name.
pub fn validate_site(raw: &str, domain: &str) -> Result<(SiteName, String)> {
    let site = SiteName::parse(raw)?;
    let fqdn = site.fully_qualified(domain);
    Ok((site, fqdn))
}

/// Everything the operator asked for in one provisioning run.
///
/// Built once from CLI input; the pipeline only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRequest {
    pub name: SiteName,
    pub wants_application: bool,
    pub plugin_refs: Vec<String>,
    pub repo_refs: Vec<String>,
    pub application_version: Option<String>,
    pub application_branch: Option<String>,
}

impl SiteRequest {
    /// Start a request for a bare virtual host.
    pub fn new(raw_name: &str) -> Result<Self> {
        Ok(Self {
            name: SiteName::parse(raw_name)?,
            wants_application: false,
            plugin_refs: Vec::new(),
            repo_refs: Vec::new(),
            application_version: None,
            application_branch: None,
        })
    }

    pub fn with_application(mut self, wants_application: bool) -> Self {
        self.wants_application = wants_application;
        self
    }

    pub fn with_plugins(mut self, plugin_refs: Vec<String>) -> Self {
        self.plugin_refs = plugin_refs;
        self
    }

    pub fn with_repositories(mut self, repo_refs: Vec<String>) -> Self {
        self.repo_refs = repo_refs;
        self
    }

    /// Request the sprout variant at `version`, optionally checked out at `branch`.
    pub fn with_sprout(mut self, version: Option<String>, branch: Option<String>) -> Self {
        self.application_version = version;
        self.application_branch = branch;
        self
    }
}

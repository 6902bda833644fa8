//! # Repository Reference Resolution
//!
//! Operators name repositories in short form:
//!
//! - `owner/name` clones `<git_host>owner/name.git`
//! - `name` clones `<git_host><default_owner>/name.git`
//!
//! Anything with two or more slashes, or with an empty segment, is rejected
//! with [`Error::InvalidReference`] and never reaches `git`.

use crate::error::{Error, Result};
use url::Url;

/// A short-form reference resolved to a canonical name and clone URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRepository {
    /// `owner/name`
    pub canonical_name: String,
    pub clone_url: String,
    /// Last segment of the reference; `git clone` checks out into a
    /// directory of this name.
    pub dir_name: String,
}

/// Resolve a raw repository reference against `git_host`.
pub fn resolve(reference: &str, git_host: &Url, default_owner: &str) -> Result<ResolvedRepository> {
    let segments: Vec<&str> = reference.split('/').collect();
    let invalid = || Error::InvalidReference {
        reference: reference.to_string(),
    };

    let (owner, name) = match segments.as_slice() {
        [name] => (default_owner, *name),
        [owner, name] => (*owner, *name),
        [_, _, _, ..] => return Err(invalid()),
        [] => {
            // `str::split` always yields at least one segment.
            debug_assert!(false, "split produced no segments for {reference:?}");
            log::error!("Repository reference {reference:?} produced no segments");
            return Err(invalid());
        }
    };

    if owner.is_empty() || name.is_empty() {
        return Err(invalid());
    }

    let canonical_name = format!("{owner}/{name}");
    // The leading `./` keeps a segment such as `https:` from being read as a scheme.
    let clone_url = git_host
        .join(&format!("./{canonical_name}.git"))?
        .to_string();

    Ok(ResolvedRepository {
        canonical_name,
        clone_url,
        dir_name: name.to_string(),
    })
}

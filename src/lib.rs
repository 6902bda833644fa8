//! # mkvhost Library
//!
//! Provisions a development web site on an Apache host: a virtual-host
//! descriptor, a document root with access rules, a TLS certificate and,
//! on request, a WordPress install with its database, plugins and source
//! checkouts. The library orchestrates existing tools (`a2ensite`,
//! `certbot`, `mysql`, `wp`, `git`, `yarn`, `composer`, `chown`); it does
//! not serve, store or encrypt anything itself.
//!
//! ## Quick Example
//!
//! ```no_run
//! use mkvhost::config::ProvisionConfig;
//! use mkvhost::site::SiteRequest;
//! use mkvhost::stages::orchestrator::Provisioner;
//!
//! let request = SiteRequest::new("demo")?.with_application(true);
//! let report = Provisioner::new(ProvisionConfig::default()).run(&request)?;
//! println!("{} recorded problem(s)", report.failure_count());
//! # Ok::<(), mkvhost::error::Error>(())
//! ```
//!
//! ## Core Concepts
//!
//! - **Site identity (`site`)**: the only gate on operator input. A site
//!   name must be ASCII alphanumeric before anything else happens.
//! - **Configuration (`config`)**: immutable host layout handed to the
//!   provisioner.
//! - **Commands (`runner`)**: every external tool runs through the
//!   `CommandRunner` trait and is judged by its output, not its exit code.
//! - **Repositories (`repository`, `classify`)**: short-form references are
//!   resolved to clone URLs and each clone's stderr is classified.
//! - **Stages (`stages`)**: the linear pipeline and its per-stage reports.
//! - **Manifest (`manifest`)**: the JSON record of an application site.

pub mod classify;
pub mod config;
pub mod credentials;
pub mod defaults;
pub mod error;
pub mod manifest;
pub mod output;
pub mod repository;
pub mod runner;
pub mod site;
pub mod stages;
pub mod template;

#[cfg(test)]
mod site_proptest;

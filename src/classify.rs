//! # Clone Outcome Classification
//!
//! `git clone` is run without looking at its exit status. Whether a clone
//! worked is decided from the shape of its stderr alone, by an ordered list
//! of rules where the first rule that matches wins:
//!
//! 1. **prerequisite-missing**: the clone target directory does not exist and
//!    stderr mentions `No such file or directory`. The application is not
//!    installed yet, so the rest of the batch is abandoned too.
//! 2. **succeeded**: stderr is exactly one line, `Cloning into '<dir>'...`.
//!    Repositories whose directory name contains the organization marker
//!    are flagged for a dependency install.
//! 3. **failed**: anything else. Every stderr line is kept as diagnostic.
//!
//! The order is part of the contract. Rule 3 matches everything, and rule 1
//! must run before rule 2 can misread a path error.

use crate::runner::CommandOutput;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic recorded when a clone batch stops for a missing application.
pub const PREREQUISITE_MISSING_MESSAGE: &str =
    "No git repos have been cloned since this site does not have WordPress installed yet!";

/// Everything a rule may look at for one clone attempt.
#[derive(Debug, Clone, Copy)]
pub struct CloneAttempt<'a> {
    /// Canonical `owner/name` of the repository.
    pub canonical_name: &'a str,
    /// Directory `git clone` announces it is cloning into.
    pub dir_name: &'a str,
    pub stderr: &'a str,
    /// Whether the directory the clone runs in existed beforehand.
    pub target_exists: bool,
    pub organization_marker: &'a str,
}

/// The verdict of the first matching rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Succeeded { install_dependencies: bool },
    Failed { diagnostic: Vec<String> },
    PrerequisiteMissing,
}

type Rule = fn(&CloneAttempt<'_>) -> Option<Classification>;

/// Rules in evaluation order.
pub const RULES: &[(&str, Rule)] = &[
    ("prerequisite-missing", prerequisite_missing),
    ("succeeded", succeeded),
    ("failed", failed),
];

/// Classify one clone attempt.
pub fn classify(attempt: &CloneAttempt<'_>) -> Classification {
    for (name, rule) in RULES {
        if let Some(classification) = rule(attempt) {
            log::debug!(
                "Clone of {} classified by rule '{}'",
                attempt.canonical_name,
                name
            );
            return classification;
        }
    }
    // `failed` accepts every attempt.
    unreachable!("the last classification rule always matches")
}

fn prerequisite_missing(attempt: &CloneAttempt<'_>) -> Option<Classification> {
    (!attempt.target_exists && attempt.stderr.contains("No such file or directory"))
        .then_some(Classification::PrerequisiteMissing)
}

fn succeeded(attempt: &CloneAttempt<'_>) -> Option<Classification> {
    let announcement = format!("Cloning into '{}'...", attempt.dir_name);
    let lines: Vec<&str> = attempt.stderr.lines().collect();
    match lines.as_slice() {
        [only] if *only == announcement => Some(Classification::Succeeded {
            install_dependencies: attempt.dir_name.contains(attempt.organization_marker),
        }),
        _ => None,
    }
}

fn failed(attempt: &CloneAttempt<'_>) -> Option<Classification> {
    Some(Classification::Failed {
        diagnostic: attempt.stderr.lines().map(str::to_string).collect(),
    })
}

/// Outputs of the package-manager installs run in a fresh clone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyInstall {
    pub yarn: CommandOutput,
    pub composer: CommandOutput,
}

/// Result of one repository reference in a clone batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CloneOutcome {
    Succeeded {
        repository: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dependencies: Option<DependencyInstall>,
    },
    Failed {
        /// Canonical name, or the raw reference when it never resolved.
        repository: String,
        diagnostic: Vec<String>,
    },
    PrerequisiteMissing { diagnostic: String },
}

impl CloneOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CloneOutcome::Succeeded { .. })
    }
}

impl fmt::Display for CloneOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloneOutcome::Succeeded {
                repository,
                dependencies: Some(_),
            } => write!(f, "cloned {repository} (dependencies installed)"),
            CloneOutcome::Succeeded { repository, .. } => write!(f, "cloned {repository}"),
            CloneOutcome::Failed {
                repository,
                diagnostic,
            } => write!(f, "failed {repository}: {}", diagnostic.join(" | ")),
            CloneOutcome::PrerequisiteMissing { diagnostic } => f.write_str(diagnostic),
        }
    }
}

/// Successes and failures of one clone batch, in attempt order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneResultSet {
    #[serde(rename = "successful")]
    pub successes: Vec<CloneOutcome>,
    #[serde(rename = "failed")]
    pub failures: Vec<CloneOutcome>,
}

impl CloneResultSet {
    /// File an outcome under successes or failures.
    pub fn record(&mut self, outcome: CloneOutcome) {
        if outcome.is_success() {
            self.successes.push(outcome);
        } else {
            self.failures.push(outcome);
        }
    }

    /// Whether the batch was cut short by a missing prerequisite.
    pub fn prerequisite_missing(&self) -> bool {
        self.failures
            .iter()
            .any(|outcome| matches!(outcome, CloneOutcome::PrerequisiteMissing { .. }))
    }
}

//! Status records produced by the sync executor

use std::path::{Path, PathBuf};

/// Outcome kind of one completed sync attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The sync attempt failed; the record carries the cause
    Error,
    /// A fresh working copy was cloned
    Cloned,
    /// New commits were fast-forwarded into an existing working copy
    Fetched,
    /// The existing working copy already matched the remote
    UpToDate,
}

impl Outcome {
    /// Returns the colored symbol for this outcome
    pub fn symbol(&self) -> &str {
        match self {
            Outcome::Error => "\u{1b}[31m✘\u{1b}[0m",
            Outcome::Cloned => "\u{1b}[36m✚\u{1b}[0m",
            Outcome::Fetched => "\u{1b}[33m↓\u{1b}[0m",
            Outcome::UpToDate => "\u{1b}[32m✔\u{1b}[0m",
        }
    }

    /// Returns the text representation of this outcome
    pub fn text(&self) -> &str {
        match self {
            Outcome::Error => "error",
            Outcome::Cloned => "cloned",
            Outcome::Fetched => "fetched",
            Outcome::UpToDate => "up to date",
        }
    }
}

/// One emission on the status stream.
///
/// Each project yields exactly two records: a "started" record (location
/// only, no outcome) before any I/O, then a completed record. Records are
/// immutable once produced.
#[derive(Clone, Debug)]
pub struct StatusRecord {
    /// Local destination the record is about
    pub location: PathBuf,
    /// `None` on the initial "started" emission
    pub outcome: Option<Outcome>,
    /// Free-form operation output (clone/pull progress text)
    pub output: String,
    /// Underlying cause when the outcome is an error
    pub error: Option<String>,
}

impl StatusRecord {
    /// The in-flight marker emitted before any sync I/O happens
    pub fn started(location: &Path) -> Self {
        Self {
            location: location.to_path_buf(),
            outcome: None,
            output: String::new(),
            error: None,
        }
    }

    pub fn completed(location: &Path, outcome: Outcome, output: String) -> Self {
        Self {
            location: location.to_path_buf(),
            outcome: Some(outcome),
            output,
            error: None,
        }
    }

    pub fn failed(location: &Path, output: String, error: String) -> Self {
        Self {
            location: location.to_path_buf(),
            outcome: Some(Outcome::Error),
            output,
            error: Some(error),
        }
    }

    /// Whether this is a completed record (as opposed to a "started" marker)
    pub fn is_completed(&self) -> bool {
        self.outcome.is_some()
    }
}

//! Remote directory provider abstraction
//!
//! The traversal engine only ever sees this interface: given a group node,
//! a provider returns that node's child groups and child projects. Providers
//! are pure data-fetchers and never mutate remote state.

pub mod gitlab;

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

// Re-export the concrete provider for convenience
pub use gitlab::GitLabProvider;

/// A container node in the remote hierarchy.
///
/// Created on demand when its parent is expanded and discarded once its own
/// children have been enumerated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupNode {
    /// Full hierarchical path of the group, e.g. `"teamA/backend"`
    pub full_path: String,
    /// Local destination directory for this group's subtree
    pub location: PathBuf,
}

impl GroupNode {
    pub fn new(full_path: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        Self {
            full_path: full_path.into(),
            location: location.into(),
        }
    }
}

/// A leaf node representing one remote repository to synchronize locally.
///
/// Consumed exactly once by the sync executor, producing one completed
/// status record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectNode {
    /// HTTPS clone URL of the remote repository
    pub clone_url: String,
    /// Local working-copy destination
    pub location: PathBuf,
    /// Per-project credential override; `None` means anonymous access
    pub token: Option<String>,
    /// The only branch the sync executor will fast-forward
    pub default_branch: String,
}

impl ProjectNode {
    pub fn new(clone_url: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        Self {
            clone_url: clone_url.into(),
            location: location.into(),
            token: None,
            default_branch: "main".to_string(),
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn with_default_branch(mut self, branch: impl Into<String>) -> Self {
        self.default_branch = branch.into();
        self
    }
}

/// The children of one expanded group: sub-groups and leaf projects.
#[derive(Debug, Default)]
pub struct GroupChildren {
    pub groups: Vec<GroupNode>,
    pub projects: Vec<ProjectNode>,
}

/// Errors from the directory provider.
///
/// Any of these is terminal for a run: the traversal cannot continue without
/// the provider, so no partial-tree degradation is attempted.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("authentication rejected for {path} (bad token?)")]
    Auth { path: String },

    #[error("group not found: {path}")]
    NotFound { path: String },

    #[error("unexpected response for {path}: {message}")]
    Response { path: String, message: String },
}

/// Read-only directory lookup for the remote hierarchy.
///
/// A transport or auth failure here is fatal to the whole run.
#[async_trait]
pub trait GroupProvider: Send + Sync {
    /// Returns the immediate children of `group`: sub-groups and projects.
    async fn children(&self, group: &GroupNode) -> Result<GroupChildren, ProviderError>;
}

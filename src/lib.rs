//! # grove-sync
//!
//! `grove-sync` discovers a GitLab group hierarchy through a read-only
//! directory provider and brings every discovered project's local working
//! copy up to date with its remote: clone if absent, fast-forward pull if
//! present, wrong branch is an error. It powers the `grove` CLI tool.
//!
//! ## Core pieces
//!
//! - **Traversal engine**: a dynamic fan-out crawler over a tree whose shape
//!   is unknown up front, with outstanding-work counters deciding when each
//!   queue may close.
//! - **Sync executor**: the open/clone/branch-check/pull state machine over
//!   the `git` CLI, one attempt per project per run.
//! - **Status aggregator**: a live one-line summary or structured log
//!   events, fed by the stream of per-project status records.
//!
//! ## Example
//!
//! ```rust,no_run
//! use grove_sync::core::{Aggregator, RenderMode, SyncEngine};
//! use grove_sync::git::GitSyncer;
//! use grove_sync::provider::{GitLabProvider, GroupNode};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let provider = Arc::new(GitLabProvider::new(None, None));
//!     let engine = SyncEngine::new(provider, Arc::new(GitSyncer));
//!     let seeds = vec![GroupNode::new("my-org", "/home/me/src/my-org")];
//!     let report = engine
//!         .run(seeds, Vec::new(), Aggregator::new(RenderMode::Verbose))
//!         .await
//!         .expect("provider reachable");
//!     println!("{} projects synced", report.completed());
//! }
//! ```

pub mod config;
pub mod core;
pub mod git;
pub mod provider;

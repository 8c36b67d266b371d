//! The open/clone/branch-check/pull state machine
//!
//! Per project the machine is: no working copy -> clone; working copy on a
//! non-default branch -> error (always, even when the fetch was clean);
//! default branch -> fast-forward pull, mapped to fetched / up-to-date.

use async_trait::async_trait;

use crate::core::engine::ProjectSyncer;
use crate::core::status::{Outcome, StatusRecord};
use crate::provider::ProjectNode;

use super::operations::{
    authenticated_url, clone_repo, current_branch, fetch, open_work_tree, pull_ff, OpenState,
    PullResult,
};

/// Runs the sync state machine for one project and returns its completed
/// status record. Exactly one record per call; failures are contained here
/// and never propagate.
pub async fn sync_project(project: &ProjectNode) -> StatusRecord {
    let location = &project.location;

    match open_work_tree(location).await {
        OpenState::NotFound => {
            let url = authenticated_url(&project.clone_url, project.token.as_deref());
            match clone_repo(&url, location).await {
                Ok(progress) => StatusRecord::completed(location, Outcome::Cloned, progress),
                Err(cause) => StatusRecord::failed(
                    location,
                    String::new(),
                    format!("unable to clone repo: {cause}"),
                ),
            }
        }
        OpenState::Failed(cause) => StatusRecord::failed(
            location,
            String::new(),
            format!("unable to open repo: {cause}"),
        ),
        OpenState::Opened => sync_opened(project).await,
    }
}

async fn sync_opened(project: &ProjectNode) -> StatusRecord {
    let location = &project.location;

    let branch = match current_branch(location).await {
        Ok(branch) => branch,
        Err(cause) => {
            return StatusRecord::failed(
                location,
                String::new(),
                format!("unable to get head: {cause}"),
            );
        }
    };

    if branch != project.default_branch {
        // A non-default branch is always an error outcome, even when the
        // fetch itself was clean or already up to date.
        return match fetch(location).await {
            Ok(progress) => StatusRecord::failed(
                location,
                progress,
                format!("not on {} branch but fetched", project.default_branch),
            ),
            Err(cause) => StatusRecord::failed(
                location,
                String::new(),
                format!("not on {} branch and: {cause}", project.default_branch),
            ),
        };
    }

    match pull_ff(location).await {
        PullResult::AlreadyUpToDate(output) => {
            StatusRecord::completed(location, Outcome::UpToDate, output)
        }
        PullResult::Updated(output) => StatusRecord::completed(location, Outcome::Fetched, output),
        PullResult::Failed(cause) => StatusRecord::failed(
            location,
            String::new(),
            format!("unable to pull {}: {cause}", project.default_branch),
        ),
    }
}

/// The production sync executor, backed by the `git` CLI.
pub struct GitSyncer;

#[async_trait]
impl ProjectSyncer for GitSyncer {
    async fn sync(&self, project: &ProjectNode) -> StatusRecord {
        sync_project(project).await
    }
}

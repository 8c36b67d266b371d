//! Fan-out traversal workers for the group tree

use async_channel::{Receiver, Sender};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::provider::{GroupNode, GroupProvider, ProjectNode, ProviderError};

use super::pending::{DiscoveryGate, WorkCounter};

/// State shared by every traversal worker.
pub(crate) struct TraversalShared {
    pub provider: Arc<dyn GroupProvider>,
    pub groups_tx: Sender<GroupNode>,
    pub projects_tx: Sender<ProjectNode>,
    pub group_work: Arc<WorkCounter>,
    pub project_work: Arc<WorkCounter>,
    pub discovery: Arc<DiscoveryGate>,
    pub fatal_tx: UnboundedSender<ProviderError>,
}

/// One traversal worker: dequeues a group, asks the provider for its
/// children, re-injects sub-groups and forwards leaf projects.
///
/// Exits cleanly when the group queue is closed and drained. A provider
/// error is terminal for the whole run: it is escalated to the orchestrator
/// and the worker stops without decrementing, freezing the counters.
pub(crate) async fn expand_groups(shared: Arc<TraversalShared>, groups: Receiver<GroupNode>) {
    while let Ok(group) = groups.recv().await {
        debug!(parent = %group.full_path, "expanding group");

        let children = match shared.provider.children(&group).await {
            Ok(children) => children,
            Err(error) => {
                let _ = shared.fatal_tx.send(error);
                return;
            }
        };

        for child in children.groups {
            shared.group_work.add(1);
            if shared.groups_tx.send(child).await.is_err() {
                return;
            }
        }

        for project in children.projects {
            shared.project_work.add(1);
            shared.discovery.fire();
            if shared.projects_tx.send(project).await.is_err() {
                return;
            }
        }

        // The decrement for this node happens-after every child increment
        // and enqueue above; the group counter can only hit zero once the
        // whole subtree has been registered.
        shared.group_work.done();
    }
}

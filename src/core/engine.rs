//! Orchestration of traversal, sync workers and completion detection
//!
//! The run is three coordinators over three queues:
//!
//! - the group coordinator seeds the group queue, waits for the group
//!   counter to hit zero and closes the queue;
//! - the project coordinator seeds explicitly configured projects, waits on
//!   the discovery gate, runs the sync pool and closes the project queue
//!   once the project counter hits zero;
//! - the aggregator consumes the status stream until it closes.
//!
//! A provider error anywhere in the traversal aborts the run with no
//! partial results.

use async_channel::Receiver;
use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::provider::{GroupNode, GroupProvider, ProjectNode, ProviderError};

use super::aggregator::{Aggregator, RunReport};
use super::config::{SYNC_POOL_SIZE, TRAVERSAL_POOL_SIZE};
use super::pending::{DiscoveryGate, WorkCounter};
use super::status::StatusRecord;
use super::traversal::{expand_groups, TraversalShared};

/// Executes the sync state machine for one project.
///
/// Implementations must contain their own failures: every call produces a
/// completed status record, never an error.
#[async_trait]
pub trait ProjectSyncer: Send + Sync {
    async fn sync(&self, project: &ProjectNode) -> StatusRecord;
}

/// The concurrent traversal-and-synchronization engine.
pub struct SyncEngine {
    provider: Arc<dyn GroupProvider>,
    syncer: Arc<dyn ProjectSyncer>,
    traversal_workers: usize,
    sync_workers: usize,
}

impl SyncEngine {
    pub fn new(provider: Arc<dyn GroupProvider>, syncer: Arc<dyn ProjectSyncer>) -> Self {
        Self {
            provider,
            syncer,
            traversal_workers: TRAVERSAL_POOL_SIZE,
            sync_workers: SYNC_POOL_SIZE,
        }
    }

    pub fn with_pool_sizes(mut self, traversal: usize, sync: usize) -> Self {
        self.traversal_workers = traversal.max(1);
        self.sync_workers = sync.max(1);
        self
    }

    /// Runs a full crawl-and-sync over the seeds and everything discovered
    /// beneath them. Returns the aggregated report, or the terminal provider
    /// error that stopped the traversal.
    pub async fn run(
        &self,
        seed_groups: Vec<GroupNode>,
        seed_projects: Vec<ProjectNode>,
        aggregator: Aggregator,
    ) -> Result<RunReport, ProviderError> {
        let (groups_tx, groups_rx) = async_channel::unbounded::<GroupNode>();
        let (projects_tx, projects_rx) = async_channel::unbounded::<ProjectNode>();
        let (status_tx, status_rx) = mpsc::unbounded_channel::<StatusRecord>();
        let (fatal_tx, mut fatal_rx) = mpsc::unbounded_channel::<ProviderError>();

        let group_work = Arc::new(WorkCounter::new());
        let project_work = Arc::new(WorkCounter::new());
        let discovery = Arc::new(DiscoveryGate::new());

        // Hold one project slot open until group expansion completes, so
        // the project zero-wait cannot observe a transient zero while
        // discovery is still running.
        project_work.add(1);

        let shared = Arc::new(TraversalShared {
            provider: Arc::clone(&self.provider),
            groups_tx: groups_tx.clone(),
            projects_tx: projects_tx.clone(),
            group_work: Arc::clone(&group_work),
            project_work: Arc::clone(&project_work),
            discovery: Arc::clone(&discovery),
            fatal_tx,
        });

        for _ in 0..self.traversal_workers {
            tokio::spawn(expand_groups(Arc::clone(&shared), groups_rx.clone()));
        }
        drop(shared);

        let group_coordinator = tokio::spawn({
            let group_work = Arc::clone(&group_work);
            let project_work = Arc::clone(&project_work);
            let discovery = Arc::clone(&discovery);
            let groups_rx = groups_rx.clone();
            async move {
                // All seed increments are issued before the zero-wait
                // starts, so it cannot observe a transient zero.
                for group in seed_groups {
                    group_work.add(1);
                    let _ = groups_tx.send(group).await;
                }
                group_work.wait_zero().await;
                groups_rx.close();

                // Release the held-open project slot, and open the gate in
                // case the seeds and the whole tree yielded no projects at
                // all - such a run terminates as an empty success.
                project_work.done();
                discovery.fire();
            }
        });

        let project_coordinator = tokio::spawn({
            let project_work = Arc::clone(&project_work);
            let discovery = Arc::clone(&discovery);
            let projects_rx = projects_rx.clone();
            let status_tx = status_tx.clone();
            let syncer = Arc::clone(&self.syncer);
            let sync_workers = self.sync_workers;
            async move {
                for project in seed_projects {
                    project_work.add(1);
                    discovery.fire();
                    let _ = projects_tx.send(project).await;
                }

                discovery.opened().await;

                let mut workers = Vec::with_capacity(sync_workers);
                for _ in 0..sync_workers {
                    workers.push(tokio::spawn(sync_project_worker(
                        projects_rx.clone(),
                        status_tx.clone(),
                        Arc::clone(&project_work),
                        Arc::clone(&syncer),
                    )));
                }

                project_work.wait_zero().await;
                projects_rx.close();
                join_all(workers).await;
            }
        });

        // The status stream closes once every worker and the project
        // coordinator have dropped their senders.
        drop(status_tx);
        drop(groups_rx);
        drop(projects_rx);

        let aggregation = tokio::spawn(aggregator.run(status_rx));

        tokio::select! {
            result = aggregation => {
                let report = result.expect("status aggregator task panicked");
                let _ = group_coordinator.await;
                let _ = project_coordinator.await;
                Ok(report)
            }
            Some(error) = fatal_rx.recv() => Err(error),
        }
    }
}

/// One sync worker: dequeues projects until the queue closes, emitting the
/// started marker before any I/O and the completed record after.
async fn sync_project_worker(
    projects: Receiver<ProjectNode>,
    status_tx: UnboundedSender<StatusRecord>,
    project_work: Arc<WorkCounter>,
    syncer: Arc<dyn ProjectSyncer>,
) {
    while let Ok(project) = projects.recv().await {
        let _ = status_tx.send(StatusRecord::started(&project.location));
        let record = syncer.sync(&project).await;
        let _ = status_tx.send(record);
        project_work.done();
    }
}

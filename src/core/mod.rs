//! Core traversal-and-synchronization engine

pub mod aggregator;
pub mod config;
pub mod engine;
pub mod pending;
pub mod status;

pub(crate) mod traversal;

// Re-export commonly used items
pub use aggregator::{Aggregator, RenderMode, RunReport};
pub use config::{SYNC_POOL_SIZE, TRAVERSAL_POOL_SIZE};
pub use engine::{ProjectSyncer, SyncEngine};
pub use pending::{DiscoveryGate, WorkCounter};
pub use status::{Outcome, StatusRecord};

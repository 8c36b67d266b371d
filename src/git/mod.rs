pub mod operations;
pub mod sync;

// Re-export commonly used items
pub use operations::*;
pub use sync::{sync_project, GitSyncer};

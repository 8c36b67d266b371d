//! Engine tuning constants

// Worker pool sizes are fixed at startup. Traversal is a burst of small
// metadata lookups; sync is the I/O-bound, latency-dominated phase and gets
// the larger pool.
pub const TRAVERSAL_POOL_SIZE: usize = 10;
pub const SYNC_POOL_SIZE: usize = 20;

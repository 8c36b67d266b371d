//! Common test utilities and helpers
#![allow(dead_code)]

pub mod fixtures;
pub mod git;

pub use self::fixtures::RemoteFixture;
pub use self::git::is_git_available;

//! Test fixtures and builders

use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::git::{create_test_commit, run_git, setup_git_repo};

/// A throwaway "remote" repository plus room for working copies, with
/// automatic cleanup. Clone URLs are `file://` paths, so no credentials or
/// network are involved.
pub struct RemoteFixture {
    pub temp_dir: TempDir,
    pub remote: PathBuf,
    pub branch: String,
}

impl RemoteFixture {
    /// Creates a remote repository on `branch` with one initial commit
    pub fn new(branch: &str) -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let remote = temp_dir.path().join("remote");
        std::fs::create_dir(&remote)?;
        setup_git_repo(&remote, branch)?;
        create_test_commit(&remote, "README.md", "# remote", "Initial commit")?;

        Ok(Self {
            temp_dir,
            remote,
            branch: branch.to_string(),
        })
    }

    /// The clone URL of the remote
    pub fn url(&self) -> String {
        format!("file://{}", self.remote.display())
    }

    /// A destination path inside the fixture that does not exist yet
    pub fn dest(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Adds a commit to the remote, advancing its branch
    pub fn advance_remote(&self, file_name: &str) -> Result<()> {
        create_test_commit(&self.remote, file_name, "more", "Advance remote")
    }

    /// Produces an existing working copy of the remote at `name`
    pub fn working_copy(&self, name: &str) -> Result<PathBuf> {
        let dest = self.dest(name);
        let dest_str = dest.to_string_lossy().to_string();
        let url = self.url();
        run_git(
            self.temp_dir.path(),
            &["clone", url.as_str(), dest_str.as_str()],
        )?;
        Ok(dest)
    }

    /// Checks out a new branch in an existing working copy
    pub fn checkout_new_branch(&self, copy: &Path, branch: &str) -> Result<()> {
        run_git(copy, &["checkout", "-b", branch])?;
        Ok(())
    }
}

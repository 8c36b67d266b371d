//! Git testing utilities

use anyhow::Result;
use std::path::Path;
use std::process::Command;

/// Checks if git is available in the system
pub fn is_git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Runs a git command, failing the test on a non-zero exit
pub fn run_git(path: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git").args(args).current_dir(path).output()?;
    if !output.status.success() {
        anyhow::bail!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Sets up a git repository checked out on `branch`, with user config
pub fn setup_git_repo(path: &Path, branch: &str) -> Result<()> {
    run_git(path, &["init"])?;
    // Pin the branch name regardless of the host's init.defaultBranch
    let head_ref = format!("refs/heads/{branch}");
    run_git(path, &["symbolic-ref", "HEAD", head_ref.as_str()])?;

    run_git(path, &["config", "user.name", "Test User"])?;
    run_git(path, &["config", "user.email", "test@example.com"])?;
    run_git(path, &["config", "commit.gpgsign", "false"])?;
    Ok(())
}

/// Creates a test commit in the repository
pub fn create_test_commit(path: &Path, file_name: &str, content: &str, message: &str) -> Result<()> {
    std::fs::write(path.join(file_name), content)?;
    run_git(path, &["add", file_name])?;
    run_git(path, &["commit", "-m", message])?;
    Ok(())
}

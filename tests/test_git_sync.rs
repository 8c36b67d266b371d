//! Integration tests for the sync executor state machine against real
//! repositories

mod common;

use common::git::setup_git_repo;
use common::{is_git_available, RemoteFixture};
use grove_sync::core::Outcome;
use grove_sync::git::{open_work_tree, sync_project, OpenState};
use grove_sync::provider::ProjectNode;

fn node(fixture: &RemoteFixture, dest: &std::path::Path) -> ProjectNode {
    ProjectNode::new(fixture.url(), dest).with_default_branch(fixture.branch.as_str())
}

#[tokio::test]
async fn test_missing_working_copy_is_cloned() {
    if !is_git_available() {
        eprintln!("Git not available, skipping test");
        return;
    }

    let fixture = RemoteFixture::new("main").expect("fixture");
    let dest = fixture.dest("copy");

    let record = sync_project(&node(&fixture, &dest)).await;

    assert_eq!(record.outcome, Some(Outcome::Cloned), "{:?}", record.error);
    assert!(record.error.is_none());
    assert!(dest.join("README.md").exists());
}

#[tokio::test]
async fn test_unchanged_remote_is_up_to_date() {
    if !is_git_available() {
        eprintln!("Git not available, skipping test");
        return;
    }

    let fixture = RemoteFixture::new("main").expect("fixture");
    let copy = fixture.working_copy("copy").expect("working copy");

    let record = sync_project(&node(&fixture, &copy)).await;

    assert_eq!(record.outcome, Some(Outcome::UpToDate), "{:?}", record.error);
}

#[tokio::test]
async fn test_advanced_remote_is_fetched() {
    if !is_git_available() {
        eprintln!("Git not available, skipping test");
        return;
    }

    let fixture = RemoteFixture::new("main").expect("fixture");
    let copy = fixture.working_copy("copy").expect("working copy");
    fixture.advance_remote("new-file.txt").expect("advance");

    let record = sync_project(&node(&fixture, &copy)).await;

    assert_eq!(record.outcome, Some(Outcome::Fetched), "{:?}", record.error);
    assert!(copy.join("new-file.txt").exists());
}

#[tokio::test]
async fn test_non_default_branch_is_always_an_error() {
    if !is_git_available() {
        eprintln!("Git not available, skipping test");
        return;
    }

    // Even though the remote is unchanged and a pull would have reported
    // "already up to date", a working copy on feature-x must come back as
    // an error naming the branch mismatch.
    let fixture = RemoteFixture::new("main").expect("fixture");
    let copy = fixture.working_copy("copy").expect("working copy");
    fixture
        .checkout_new_branch(&copy, "feature-x")
        .expect("checkout");

    let record = sync_project(&node(&fixture, &copy)).await;

    assert_eq!(record.outcome, Some(Outcome::Error));
    let error = record.error.expect("carries a cause");
    assert!(
        error.contains("not on main branch"),
        "unexpected message: {error}"
    );
}

#[tokio::test]
async fn test_non_default_branch_with_unreachable_remote_reports_both() {
    if !is_git_available() {
        eprintln!("Git not available, skipping test");
        return;
    }

    // Wrong branch AND a fetch failure: the record must carry both causes.
    let fixture = RemoteFixture::new("main").expect("fixture");
    let copy = fixture.working_copy("copy").expect("working copy");
    fixture
        .checkout_new_branch(&copy, "feature-x")
        .expect("checkout");
    std::fs::remove_dir_all(&fixture.remote).expect("remove remote");

    let record = sync_project(&node(&fixture, &copy)).await;

    assert_eq!(record.outcome, Some(Outcome::Error));
    let error = record.error.expect("carries a cause");
    assert!(
        error.contains("not on main branch and:"),
        "unexpected message: {error}"
    );
}

#[tokio::test]
async fn test_empty_destination_inside_outer_repository_is_cloned() {
    if !is_git_available() {
        eprintln!("Git not available, skipping test");
        return;
    }

    // The destination exists but holds no repository of its own; it merely
    // sits inside an unrelated outer repository. That outer working copy
    // must never be touched - the project is cloned into the destination.
    let fixture = RemoteFixture::new("main").expect("fixture");
    let outer = fixture.dest("outer");
    std::fs::create_dir(&outer).expect("outer dir");
    setup_git_repo(&outer, "main").expect("outer repo");
    let dest = outer.join("projects").join("thing");
    std::fs::create_dir_all(&dest).expect("nested dir");

    assert_eq!(open_work_tree(&dest).await, OpenState::NotFound);

    let record = sync_project(&node(&fixture, &dest)).await;

    assert_eq!(record.outcome, Some(Outcome::Cloned), "{:?}", record.error);
    assert!(dest.join("README.md").exists());
}

#[tokio::test]
async fn test_unusable_destination_is_an_open_error() {
    if !is_git_available() {
        eprintln!("Git not available, skipping test");
        return;
    }

    let fixture = RemoteFixture::new("main").expect("fixture");
    let dest = fixture.dest("blocker");
    std::fs::write(&dest, "a file, not a directory").expect("write blocker");

    let record = sync_project(&node(&fixture, &dest)).await;

    assert_eq!(record.outcome, Some(Outcome::Error));
    let error = record.error.expect("carries a cause");
    assert!(error.contains("unable to open repo"), "got: {error}");
}

#[tokio::test]
async fn test_failed_clone_is_an_error() {
    if !is_git_available() {
        eprintln!("Git not available, skipping test");
        return;
    }

    let fixture = RemoteFixture::new("main").expect("fixture");
    let dest = fixture.dest("copy");
    let project = ProjectNode::new(
        format!("file://{}/does-not-exist", fixture.temp_dir.path().display()),
        &dest,
    );

    let record = sync_project(&project).await;

    assert_eq!(record.outcome, Some(Outcome::Error));
    let error = record.error.expect("carries a cause");
    assert!(error.contains("unable to clone repo"), "got: {error}");
}

#[tokio::test]
async fn test_custom_default_branch_is_honored() {
    if !is_git_available() {
        eprintln!("Git not available, skipping test");
        return;
    }

    let fixture = RemoteFixture::new("trunk").expect("fixture");
    let copy = fixture.working_copy("copy").expect("working copy");

    let record = sync_project(&node(&fixture, &copy)).await;

    assert_eq!(record.outcome, Some(Outcome::UpToDate), "{:?}", record.error);
}

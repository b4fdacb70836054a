//! CHANGE_REQUEST mode: baseline lookup and the reversibility check.

mod common;

use std::sync::Arc;

use ferry_core::{Authoring, MessageKind, RecordingConsole, WorkflowMode};
use ferry_transform::{FnTransform, Replace};
use ferry_workflow::{RunOptions, WorkflowError};
use tempfile::TempDir;

use common::*;

/// Change 0 names destination revision 42; change 1 (the head) names none.
fn labelled_origin() -> Arc<MemoryOrigin> {
    let origin = MemoryOrigin::new();
    origin
        .add_simple_change_with_message(0, &format!("One Change\n{DESTINATION_LABEL}=42"))
        .add_simple_change_with_message(1, "Second Change");
    origin
}

#[test]
fn baseline_comes_from_nearest_labelled_ancestor() {
    let workdir = TempDir::new().expect("tempdir");
    let origin = labelled_origin();
    let destination = RecordingDestination::new();
    let workflow = workflow(&origin, &destination)
        .mode(WorkflowMode::ChangeRequest)
        .build()
        .expect("build");
    let console = RecordingConsole::new();

    workflow
        .run(workdir.path(), Some(origin.head().as_str()), &RunOptions::default(), &console)
        .expect("run");

    let processed = destination.processed();
    assert_eq!(processed.len(), 1);
    assert_eq!(processed[0].baseline.as_deref(), Some("42"));
    assert_eq!(processed[0].message, "Second Change");
    assert_eq!(content(&processed[0], "file.txt"), format!("{PREFIX}1"));
    assert_eq!(
        console.times_in_log(MessageKind::Progress, "Checking that the transformations can be reverted"),
        1
    );
}

#[test]
fn explicit_baseline_overrides_labels() {
    let workdir = TempDir::new().expect("tempdir");
    let origin = labelled_origin();
    let destination = RecordingDestination::new();
    let workflow = workflow(&origin, &destination)
        .mode(WorkflowMode::ChangeRequest)
        .build()
        .expect("build");
    let options = RunOptions {
        change_baseline: Some("24".into()),
        ..RunOptions::default()
    };

    workflow
        .run(workdir.path(), Some(origin.head().as_str()), &options, &RecordingConsole::new())
        .expect("run");

    assert_eq!(destination.processed()[0].baseline.as_deref(), Some("24"));
}

#[test]
fn no_label_means_no_baseline() {
    let workdir = TempDir::new().expect("tempdir");
    let origin = MemoryOrigin::new();
    origin.add_simple_change(0).add_simple_change(1);
    let destination = RecordingDestination::new();
    let workflow = workflow(&origin, &destination)
        .mode(WorkflowMode::ChangeRequest)
        .build()
        .expect("build");

    workflow
        .run(workdir.path(), Some("1"), &RunOptions::default(), &RecordingConsole::new())
        .expect("run");

    assert_eq!(destination.processed()[0].baseline, None);
}

// ---------------------------------------------------------------------------
// Authoring
// ---------------------------------------------------------------------------

#[test]
fn pass_thru_authoring_keeps_the_origin_author() {
    let workdir = TempDir::new().expect("tempdir");
    let origin = MemoryOrigin::new();
    origin
        .set_author(not_whitelisted_author())
        .add_simple_change_with_message(0, &format!("One Change\n{DESTINATION_LABEL}=42"));
    let destination = RecordingDestination::new();
    let workflow = workflow(&origin, &destination)
        .mode(WorkflowMode::ChangeRequest)
        .authoring(Authoring::pass_thru(default_author()))
        .build()
        .expect("build");

    workflow
        .run(workdir.path(), Some("0"), &RunOptions::default(), &RecordingConsole::new())
        .expect("run");

    assert_eq!(destination.processed()[0].author, not_whitelisted_author());
}

#[test]
fn whitelisted_authoring_replaces_unknown_authors() {
    let workdir = TempDir::new().expect("tempdir");
    let origin = MemoryOrigin::new();
    origin
        .set_author(not_whitelisted_author())
        .add_simple_change_with_message(0, &format!("One Change\n{DESTINATION_LABEL}=42"));
    let destination = RecordingDestination::new();
    let workflow = workflow(&origin, &destination)
        .mode(WorkflowMode::ChangeRequest)
        .authoring(whitelisted())
        .build()
        .expect("build");

    workflow
        .run(workdir.path(), Some("0"), &RunOptions::default(), &RecordingConsole::new())
        .expect("run");

    assert_eq!(destination.processed()[0].author, default_author());
}

// ---------------------------------------------------------------------------
// Reversibility
// ---------------------------------------------------------------------------

#[test]
fn irreversible_step_is_rejected_before_writing() {
    let workdir = TempDir::new().expect("tempdir");
    let origin = labelled_origin();
    let destination = RecordingDestination::new();
    let workflow = workflow(&origin, &destination)
        .mode(WorkflowMode::ChangeRequest)
        .transformation(Arc::new(FnTransform::new("touch files", |_| Ok(()))))
        .build()
        .expect("build");
    let console = RecordingConsole::new();

    let err = workflow
        .run(workdir.path(), Some(origin.head().as_str()), &RunOptions::default(), &console)
        .unwrap_err();

    assert!(matches!(err, WorkflowError::Validation(_)));
    assert_eq!(err.to_string(), "Workflow 'default' is not reversible");
    assert!(destination.processed().is_empty());
    assert_eq!(console.times_in_log(MessageKind::Error, "is not reversible"), 1);
}

#[test]
fn reverse_that_does_not_restore_the_checkout_is_rejected() {
    let workdir = TempDir::new().expect("tempdir");
    let origin = MemoryOrigin::new();
    origin.single_file_change(0, "mixed", "file.txt", "aaa bbb\n");
    let destination = RecordingDestination::new();
    // Reverses syntactically, but also turns the pre-existing "bbb" into "aaa".
    let workflow = bare_workflow(&origin, &destination)
        .mode(WorkflowMode::ChangeRequest)
        .transformation(Arc::new(Replace::literal("aaa", "bbb").expect("replace")))
        .build()
        .expect("build");
    let console = RecordingConsole::new();

    let err = workflow
        .run(workdir.path(), Some("0"), &RunOptions::default(), &console)
        .unwrap_err();

    assert_eq!(err.to_string(), "Workflow 'default' is not reversible");
    assert!(destination.processed().is_empty());
    assert_eq!(console.times_in_log(MessageKind::Error, "Non reversible transformations"), 1);
    assert!(console
        .texts(MessageKind::Error)
        .iter()
        .any(|text| text.contains("-aaa bbb") && text.contains("+aaa aaa")));
}

#[test]
fn message_transforms_run_for_the_single_change() {
    let workdir = TempDir::new().expect("tempdir");
    let origin = message_origin();
    let destination = RecordingDestination::new();
    let mut builder = bare_workflow(&origin, &destination)
        .mode(WorkflowMode::ChangeRequest)
        .authoring(Authoring::pass_thru(default_author()));
    for step in message_transforms(false) {
        builder = builder.transformation(Arc::new(step));
    }
    let workflow = builder.build().expect("build");
    let options = RunOptions {
        change_baseline: Some("1".into()),
        ..RunOptions::default()
    };

    workflow
        .run(workdir.path(), Some("2"), &options, &RecordingConsole::new())
        .expect("run");

    let processed = destination.processed();
    assert_eq!(processed.len(), 1);
    assert_eq!(processed[0].baseline.as_deref(), Some("1"));
    assert_eq!(
        processed[0].message,
        "CHANGE: third commit (2) by Foo Baz\n\nBAR = foo\n"
    );
    assert_eq!(processed[0].author.to_string(), "Someone <someone@somewhere.com>");
}

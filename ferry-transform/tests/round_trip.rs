//! Forward-then-reverse pipelines over real checkouts.

use std::collections::BTreeMap;
use std::sync::Arc;

use ferry_core::config::TransformConfig;
use ferry_core::{tree, Author, MessageKind, RecordingConsole};
use ferry_transform::{build, Changes, MigrationContext, Move, Sequence, Transformation};
use tempfile::TempDir;

fn context<'a>(dir: &std::path::Path, console: &'a RecordingConsole) -> MigrationContext<'a> {
    MigrationContext::new(
        dir,
        "message",
        Author::new("Foo Bar", "foo@bar.com"),
        Changes::default(),
        console,
    )
}

fn seed(dir: &std::path::Path) -> tree::FileTree {
    let mut files = tree::FileTree::new();
    files.insert("foo".into(), b"1\n42\n".to_vec());
    files.insert("src/main.txt".into(), b"acme ships 7 rockets".to_vec());
    files.insert("src/blob.bin".into(), vec![0, 159, 146, 150]);
    tree::write_tree(dir, &files).expect("seed");
    files
}

#[test]
fn reversible_pipeline_restores_checkout_byte_for_byte() {
    let dir = TempDir::new().expect("tempdir");
    let original = seed(dir.path());

    let configs = vec![
        TransformConfig::Replace {
            before: "${linestart}${number}".into(),
            after: "${linestart}TRANSFORMED${number}".into(),
            regex_groups: BTreeMap::from([
                ("number".to_string(), "[0-9]+".to_string()),
                ("linestart".to_string(), "^".to_string()),
            ]),
            multiline: true,
            paths: None,
        },
        TransformConfig::Sequence {
            steps: vec![
                TransformConfig::Replace {
                    before: "acme".into(),
                    after: "example".into(),
                    regex_groups: BTreeMap::new(),
                    multiline: false,
                    paths: None,
                },
                TransformConfig::Move {
                    before: "src".into(),
                    after: "lib/src".into(),
                },
            ],
            reversal: None,
        },
    ];
    let forward = build::pipeline(&configs).expect("build");
    let backward = forward.reverse().expect("reversible");

    let console = RecordingConsole::new();
    forward.transform(&mut context(dir.path(), &console)).expect("forward");
    let transformed = tree::read_tree(dir.path()).expect("read");
    assert_ne!(transformed, original);
    assert!(transformed.contains_key(std::path::Path::new("lib/src/main.txt")));

    backward.transform(&mut context(dir.path(), &console)).expect("reverse");
    assert_eq!(tree::read_tree(dir.path()).expect("read"), original);
}

#[test]
fn nested_moves_report_flattened_progress() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("foo"), "").expect("write");
    std::fs::write(dir.path().join("bar"), "").expect("write");

    let inner: Arc<dyn Transformation> = Arc::new(Sequence::new(vec![
        Arc::new(Move::new("foo", "folder/foo").expect("valid")) as Arc<dyn Transformation>,
        Arc::new(Move::new("bar", "folder/bar").expect("valid")),
    ]));
    let pipeline = Sequence::new(vec![inner]);

    let console = RecordingConsole::new();
    pipeline.transform(&mut context(dir.path(), &console)).expect("transform");

    assert_eq!(console.times_in_log(MessageKind::Progress, "[ 1/2] Transform Moving foo"), 1);
    assert_eq!(console.times_in_log(MessageKind::Progress, "[ 2/2] Transform Moving bar"), 1);
    assert_eq!(console.texts(MessageKind::Progress).len(), 2);
}

use tempfile::TempDir;
use termbrain_core::{DirectiveOutcome, FileDirectiveExtractor};

fn extractor(temp: &TempDir) -> FileDirectiveExtractor {
    FileDirectiveExtractor::new(temp.path())
}

#[test]
fn n_wellformed_directives_write_n_files() {
    let temp = TempDir::new().unwrap();
    let response = "\
Sure, here are both files.
SAVE_FILE: app.py
```python
print('app')
```
END_SAVE
And the config:
SAVE_FILE: config.toml
```toml
key = \"value\"
```
END_SAVE
Done!";

    let outcomes = extractor(&temp).materialize(response);
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes
        .iter()
        .all(|o| matches!(o, DirectiveOutcome::Written { .. })));

    // fenced markup stripped from both bodies
    assert_eq!(
        std::fs::read_to_string(temp.path().join("app.py")).unwrap(),
        "print('app')"
    );
    assert_eq!(
        std::fs::read_to_string(temp.path().join("config.toml")).unwrap(),
        "key = \"value\""
    );
}

#[test]
fn traversal_filename_rejected_others_still_written() {
    let temp = TempDir::new().unwrap();
    let response = "\
SAVE_FILE: ..
owned
END_SAVE
SAVE_FILE: safe.txt
fine
END_SAVE";

    let outcomes = extractor(&temp).materialize(response);
    assert_eq!(outcomes.len(), 2);
    assert!(matches!(
        &outcomes[0],
        DirectiveOutcome::Rejected { filename, .. } if filename == ".."
    ));
    assert!(matches!(&outcomes[1], DirectiveOutcome::Written { .. }));
    assert_eq!(
        std::fs::read_to_string(temp.path().join("safe.txt")).unwrap(),
        "fine"
    );
}

#[test]
fn slash_in_filename_never_parses_and_writes_nothing_outside_root() {
    let temp = TempDir::new().unwrap();
    let response = "\
SAVE_FILE: ../escape.txt
nope
END_SAVE
SAVE_FILE: ok.txt
yes
END_SAVE";

    let outcomes = extractor(&temp).materialize(response);
    // the traversal attempt is not even a well-formed directive
    assert_eq!(outcomes.len(), 1);
    assert!(matches!(&outcomes[0], DirectiveOutcome::Written { .. }));
    assert!(!temp.path().parent().unwrap().join("escape.txt").exists());
    assert!(temp.path().join("ok.txt").exists());
}

#[test]
fn empty_body_after_stripping_is_skipped() {
    let temp = TempDir::new().unwrap();
    let response = "SAVE_FILE: blank.txt\n```\n```\nEND_SAVE";

    let outcomes = extractor(&temp).materialize(response);
    assert_eq!(outcomes.len(), 1);
    assert!(matches!(
        &outcomes[0],
        DirectiveOutcome::Skipped { filename } if filename == "blank.txt"
    ));
    assert!(!temp.path().join("blank.txt").exists());
}

#[test]
fn writes_are_overwrite_not_merge() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("main.rs"), "old contents").unwrap();

    extractor(&temp).materialize("SAVE_FILE: main.rs\nnew contents\nEND_SAVE");
    assert_eq!(
        std::fs::read_to_string(temp.path().join("main.rs")).unwrap(),
        "new contents"
    );
}

#[test]
fn back_to_back_markers_truncate_first_body() {
    // Known limitation, kept deliberately: without a terminator between
    // them, the second marker ends the first body even if the model
    // meant it as literal text.
    let temp = TempDir::new().unwrap();
    let response = "SAVE_FILE: a.txt\nuse SAVE_FILE: b.txt\nrest of a\nEND_SAVE";

    let outcomes = extractor(&temp).materialize(response);
    assert_eq!(outcomes.len(), 2);
    assert_eq!(
        std::fs::read_to_string(temp.path().join("a.txt")).unwrap(),
        "use"
    );
    assert_eq!(
        std::fs::read_to_string(temp.path().join("b.txt")).unwrap(),
        "rest of a"
    );
}

#[test]
fn response_without_directives_yields_nothing() {
    let temp = TempDir::new().unwrap();
    let outcomes = extractor(&temp).materialize("Just a normal answer, no files here.");
    assert!(outcomes.is_empty());
}

mod common;

use common::{build_docx, docx_with_body, paragraph, part_text, rendered_paragraphs};
use docx_redline::{
    CommentDraft, DocumentRegistry, DocxEditor, Task, TaskOutcome, TaskRequest, StyleCategory,
};

#[test]
fn roundtrip_preserves_untouched_parts() {
    let document = common::document_xml(&paragraph(&["Hello world"]));
    let styles = common::styles_xml();
    let rels = common::rels_xml();
    let font_table = "<?xml version=\"1.0\"?><fonts>opaque bytes</fonts>";
    let bytes = build_docx(&[
        ("word/document.xml", document.as_str()),
        ("word/styles.xml", styles.as_str()),
        ("word/_rels/document.xml.rels", rels.as_str()),
        ("word/fontTable.xml", font_table),
    ]);

    let mut editor = DocxEditor::from_bytes(&bytes).unwrap();
    editor.insert(0, 0, "!", false).unwrap();

    let out = editor.to_bytes().unwrap();
    assert_eq!(part_text(&out, "word/fontTable.xml"), font_table);
    assert_eq!(part_text(&out, "word/styles.xml"), styles);
}

#[test]
fn rewritten_parts_carry_xml_declarations() {
    let mut editor = DocxEditor::from_bytes(&docx_with_body(&paragraph(&["Hello"]))).unwrap();
    editor.insert(0, 5, "!", false).unwrap();
    editor
        .add_comment(0, 0, 5, CommentDraft::new("note"))
        .unwrap();

    let out = editor.to_bytes().unwrap();
    for part in [
        "word/document.xml",
        "word/comments.xml",
        "word/commentsExtended.xml",
        "word/styles.xml",
        "word/_rels/document.xml.rels",
    ] {
        assert!(
            part_text(&out, part).starts_with("<?xml"),
            "{part} lost its declaration"
        );
    }
}

#[test]
fn save_persists_edits_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.docx");
    std::fs::write(&path, docx_with_body(&paragraph(&["ABCDE"]))).unwrap();

    let mut editor = DocxEditor::open(&path).unwrap();
    editor.insert(0, 2, "XY", false).unwrap();
    editor.save().unwrap();

    let reread = std::fs::read(&path).unwrap();
    assert_eq!(rendered_paragraphs(&reread), vec!["ABXYCDE"]);
}

#[test]
fn save_as_leaves_the_original_alone() {
    let dir = tempfile::tempdir().unwrap();
    let original = dir.path().join("in.docx");
    let revised = dir.path().join("out.docx");
    std::fs::write(&original, docx_with_body(&paragraph(&["ABCDE"]))).unwrap();

    let mut editor = DocxEditor::open(&original).unwrap();
    editor.delete(0, 0, 2, false).unwrap();
    editor.save_as(&revised).unwrap();

    let untouched = std::fs::read(&original).unwrap();
    assert_eq!(rendered_paragraphs(&untouched), vec!["ABCDE"]);
    let edited = std::fs::read(&revised).unwrap();
    assert_eq!(rendered_paragraphs(&edited), vec!["CDE"]);
}

#[test]
fn registry_hands_out_one_editor_per_canonical_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.docx");
    std::fs::write(&path, docx_with_body(&paragraph(&["ABCDE"]))).unwrap();

    let mut registry = DocumentRegistry::new();
    registry.open(&path).unwrap().insert(0, 0, ">", false).unwrap();

    // a second borrow sees the first borrow's in-memory state without a save
    let texts = registry.open(&path).unwrap().paragraphs().unwrap();
    assert_eq!(texts, vec![">ABCDE"]);
    assert!(registry.is_open(&path));

    let editor = registry.close(&path).expect("editor was open");
    editor.save().unwrap();
    assert!(!registry.is_open(&path));

    let reread = std::fs::read(&path).unwrap();
    assert_eq!(rendered_paragraphs(&reread), vec![">ABCDE"]);
}

#[test]
fn task_batch_records_outcomes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.docx");
    std::fs::write(&path, docx_with_body(&paragraph(&["Hello world"]))).unwrap();

    let mut tasks = vec![
        Task::new(TaskRequest::Insert {
            paragraph: 0,
            offset: 11,
            text: "!".to_string(),
            tracked: false,
        }),
        Task::new(TaskRequest::CheckStyle {
            paragraph: 0,
            template: StyleCategory::Body.template(),
        }),
        Task::new(TaskRequest::ApplyStyle {
            paragraph: 0,
            template: StyleCategory::Body.template(),
            tracked: false,
        }),
        Task::new(TaskRequest::Delete {
            paragraph: 9,
            start: 0,
            end: 1,
            tracked: false,
        }),
    ];
    docx_redline::run_tasks_on(&path, &mut tasks).unwrap();

    assert_eq!(tasks[0].outcome, TaskOutcome::Success);
    // unstyled paragraph does not match the body template
    assert_eq!(tasks[1].outcome, TaskOutcome::StyleChecked(false));
    assert!(matches!(tasks[2].outcome, TaskOutcome::StyleApplied(_)));
    assert!(tasks[2].succeeded());
    // a bad paragraph index fails its task without sinking the batch
    assert_eq!(tasks[3].outcome, TaskOutcome::Failed);

    let reread = std::fs::read(&path).unwrap();
    assert_eq!(rendered_paragraphs(&reread), vec!["Hello world!"]);
}

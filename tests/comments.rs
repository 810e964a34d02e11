mod common;

use common::{
    docx_with_body, has_part, paragraph, part_text, rendered_paragraphs, W14_NS, W15_NS, W_NS,
};
use docx_redline::{CommentDraft, DocxEditor, Error, DEFAULT_AUTHOR};

fn editor(body: &str) -> DocxEditor {
    DocxEditor::from_bytes(&docx_with_body(body)).unwrap()
}

/// Text bracketed by the anchor pair with the given id, reading the
/// paragraph children in document order.
fn anchored_text(document: &str, id: &str) -> String {
    let doc = roxmltree::Document::parse(document).unwrap();
    let mut inside = false;
    let mut out = String::new();
    for node in doc.descendants() {
        match node.tag_name().name() {
            "commentRangeStart" if node.attribute((W_NS, "id")) == Some(id) => inside = true,
            "commentRangeEnd" if node.attribute((W_NS, "id")) == Some(id) => break,
            "t" if inside => out.push_str(node.text().unwrap_or("")),
            _ => {}
        }
    }
    out
}

#[test]
fn comment_brackets_exactly_the_span() {
    let mut editor = editor(&paragraph(&["Hello world"]));
    let id = editor
        .add_comment(0, 0, 5, CommentDraft::new("greeting"))
        .unwrap();
    assert_eq!(id, 1);

    let bytes = editor.to_bytes().unwrap();
    assert_eq!(
        rendered_paragraphs(&bytes),
        vec!["Hello world"],
        "anchoring must not change rendered text"
    );
    let document = part_text(&bytes, "word/document.xml");
    assert_eq!(anchored_text(&document, "1"), "Hello");

    let doc = roxmltree::Document::parse(&document).unwrap();
    let reference = doc
        .descendants()
        .find(|n| n.tag_name().name() == "commentReference")
        .expect("reference leaf after anchor end");
    assert_eq!(reference.attribute((W_NS, "id")), Some("1"));
    assert_eq!(reference.parent().unwrap().tag_name().name(), "r");
}

#[test]
fn comment_across_runs_brackets_inner_text() {
    let mut editor = editor(&paragraph(&["Hello ", "world"]));
    editor
        .add_comment(0, 3, 8, CommentDraft::new("middle"))
        .unwrap();

    let bytes = editor.to_bytes().unwrap();
    assert_eq!(rendered_paragraphs(&bytes), vec!["Hello world"]);
    let document = part_text(&bytes, "word/document.xml");
    assert_eq!(anchored_text(&document, "1"), "lo wo");
}

#[test]
fn comment_registers_body_and_extended_record() {
    let mut editor = editor(&paragraph(&["Hello world"]));
    editor
        .add_comment(0, 0, 5, CommentDraft::new("needs citation"))
        .unwrap();

    let bytes = editor.to_bytes().unwrap();
    let comments = part_text(&bytes, "word/comments.xml");
    assert!(comments.starts_with("<?xml"), "bootstrapped part carries a declaration");
    let doc = roxmltree::Document::parse(&comments).unwrap();
    let comment = doc
        .descendants()
        .find(|n| n.tag_name().name() == "comment")
        .unwrap();
    assert_eq!(comment.attribute((W_NS, "id")), Some("1"));
    assert_eq!(comment.attribute((W_NS, "author")), Some(DEFAULT_AUTHOR));
    let body_text: String = comment
        .descendants()
        .filter(|n| n.tag_name().name() == "t")
        .filter_map(|n| n.text())
        .collect();
    assert_eq!(body_text, "needs citation");

    // the body paragraph and the extended record share the anchor id
    let para_id = comment
        .descendants()
        .find(|n| n.tag_name().name() == "p")
        .and_then(|p| p.attribute((W14_NS, "paraId")))
        .expect("comment body carries an anchor paragraph id")
        .to_string();

    let extended = part_text(&bytes, "word/commentsExtended.xml");
    let doc = roxmltree::Document::parse(&extended).unwrap();
    let entry = doc
        .descendants()
        .find(|n| n.tag_name().name() == "commentEx")
        .unwrap();
    assert_eq!(entry.attribute((W15_NS, "paraId")), Some(para_id.as_str()));
    assert_eq!(entry.attribute((W15_NS, "done")), Some("0"));
}

#[test]
fn comment_ids_are_sequential() {
    let mut editor = editor(&paragraph(&["Hello world"]));
    let first = editor
        .add_comment(0, 0, 5, CommentDraft::new("one"))
        .unwrap();
    let second = editor
        .add_comment(0, 6, 11, CommentDraft::new("two"))
        .unwrap();
    assert_eq!((first, second), (1, 2));

    let bytes = editor.to_bytes().unwrap();
    let comments = part_text(&bytes, "word/comments.xml");
    let doc = roxmltree::Document::parse(&comments).unwrap();
    assert_eq!(
        doc.descendants()
            .filter(|n| n.tag_name().name() == "comment")
            .count(),
        2
    );

    // distinct anchor paragraph ids per comment
    let para_ids: Vec<&str> = doc
        .descendants()
        .filter(|n| n.tag_name().name() == "p")
        .filter_map(|p| p.attribute((W14_NS, "paraId")))
        .collect();
    assert_eq!(para_ids.len(), 2);
    assert_ne!(para_ids[0], para_ids[1]);
}

#[test]
fn comment_relationships_created_once() {
    let mut editor = editor(&paragraph(&["Hello world"]));
    editor.add_comment(0, 0, 5, CommentDraft::new("one")).unwrap();
    editor.add_comment(0, 6, 11, CommentDraft::new("two")).unwrap();

    let bytes = editor.to_bytes().unwrap();
    let rels = part_text(&bytes, "word/_rels/document.xml.rels");
    let doc = roxmltree::Document::parse(&rels).unwrap();
    let of_type = |needle: &str| {
        doc.descendants()
            .filter(|n| n.tag_name().name() == "Relationship")
            .filter(|n| n.attribute("Type").is_some_and(|t| t.ends_with(needle)))
            .count()
    };
    assert_eq!(of_type("relationships/comments"), 1);
    assert_eq!(of_type("relationships/commentsExtended"), 1);

    // next free ids after the pre-existing rId1
    let ids: Vec<&str> = doc
        .descendants()
        .filter(|n| n.tag_name().name() == "Relationship")
        .filter_map(|n| n.attribute("Id"))
        .collect();
    assert!(ids.contains(&"rId2") && ids.contains(&"rId3"), "ids: {ids:?}");
}

#[test]
fn annotation_style_created_once() {
    let mut editor = editor(&paragraph(&["Hello world"]));
    editor.add_comment(0, 0, 5, CommentDraft::new("one")).unwrap();
    editor.add_comment(0, 6, 11, CommentDraft::new("two")).unwrap();

    let bytes = editor.to_bytes().unwrap();
    let styles = part_text(&bytes, "word/styles.xml");
    let doc = roxmltree::Document::parse(&styles).unwrap();
    let annotation_styles = doc
        .descendants()
        .filter(|n| n.tag_name().name() == "name")
        .filter(|n| n.attribute((W_NS, "val")) == Some("annotation text"))
        .count();
    assert_eq!(annotation_styles, 1);
}

#[test]
fn unresolved_span_aborts_before_any_side_effect() {
    let mut editor = editor(&paragraph(&["Hello world"]));
    let err = editor
        .add_comment(0, 0, 99, CommentDraft::new("too far"))
        .unwrap_err();
    assert!(matches!(err, Error::UnresolvedSpan { .. }));

    let bytes = editor.to_bytes().unwrap();
    assert!(!has_part(&bytes, "word/comments.xml"), "no part bootstrap on failure");
    assert_eq!(rendered_paragraphs(&bytes), vec!["Hello world"]);
}

#[test]
fn missing_styles_part_is_fatal() {
    let document = common::document_xml(&paragraph(&["Hello world"]));
    let rels = common::rels_xml();
    let bytes = common::build_docx(&[
        ("word/document.xml", document.as_str()),
        ("word/_rels/document.xml.rels", rels.as_str()),
    ]);
    let mut editor = DocxEditor::from_bytes(&bytes).unwrap();
    let err = editor
        .add_comment(0, 0, 5, CommentDraft::new("x"))
        .unwrap_err();
    assert!(matches!(err, Error::MissingPart(ref p) if p.contains("styles")));
}

#[test]
fn missing_relationships_part_is_fatal() {
    let document = common::document_xml(&paragraph(&["Hello world"]));
    let styles = common::styles_xml();
    let bytes = common::build_docx(&[
        ("word/document.xml", document.as_str()),
        ("word/styles.xml", styles.as_str()),
    ]);
    let mut editor = DocxEditor::from_bytes(&bytes).unwrap();
    let err = editor
        .add_comment(0, 0, 5, CommentDraft::new("x"))
        .unwrap_err();
    assert!(matches!(err, Error::MissingPart(ref p) if p.contains("rels")));
    // the document tree itself was never touched
    assert_eq!(
        rendered_paragraphs(&editor.to_bytes().unwrap()),
        vec!["Hello world"]
    );
}

#[test]
fn custom_author_is_recorded() {
    let mut editor = editor(&paragraph(&["Hello world"]));
    let mut draft = CommentDraft::new("signed");
    draft.author = Some("Reviewer Two".to_string());
    editor.add_comment(0, 0, 5, draft).unwrap();

    let comments = part_text(&editor.to_bytes().unwrap(), "word/comments.xml");
    let doc = roxmltree::Document::parse(&comments).unwrap();
    let comment = doc
        .descendants()
        .find(|n| n.tag_name().name() == "comment")
        .unwrap();
    assert_eq!(comment.attribute((W_NS, "author")), Some("Reviewer Two"));
}

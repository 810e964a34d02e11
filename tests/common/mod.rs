//! In-memory DOCX fixtures for integration tests.
//!
//! Packages are assembled from raw part strings so each test controls the
//! exact markup it starts from, and inspected by unzipping the editor's
//! output and re-parsing the parts with roxmltree.

#![allow(dead_code)]

use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub const W14_NS: &str = "http://schemas.microsoft.com/office/word/2010/wordml";
pub const W15_NS: &str = "http://schemas.microsoft.com/office/word/2012/wordml";
pub const RELS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// `<w:p>` with a single run per string.
pub fn paragraph(runs: &[&str]) -> String {
    let mut out = String::from("<w:p>");
    for text in runs {
        out.push_str(&format!(
            "<w:r><w:t xml:space=\"preserve\">{text}</w:t></w:r>"
        ));
    }
    out.push_str("</w:p>");
    out
}

/// Main document part wrapping pre-built body markup.
pub fn document_xml(body: &str) -> String {
    format!(
        concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n",
            "<w:document xmlns:w=\"{w}\" xmlns:w14=\"{w14}\">",
            "<w:body>{body}</w:body></w:document>"
        ),
        w = W_NS,
        w14 = W14_NS,
        body = body,
    )
}

/// Minimal styles part with one unrelated style.
pub fn styles_xml() -> String {
    format!(
        concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n",
            "<w:styles xmlns:w=\"{w}\">",
            "<w:style w:type=\"paragraph\" w:styleId=\"Normal\">",
            "<w:name w:val=\"Normal\"/></w:style>",
            "</w:styles>"
        ),
        w = W_NS,
    )
}

/// Document relationships with a single styles relationship.
pub fn rels_xml() -> String {
    format!(
        concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n",
            "<Relationships xmlns=\"{rels}\">",
            "<Relationship Id=\"rId1\" ",
            "Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles\" ",
            "Target=\"styles.xml\"/>",
            "</Relationships>"
        ),
        rels = RELS_NS,
    )
}

pub fn build_docx(parts: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, content) in parts {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Package with the given body plus the styles and relationships parts every
/// operation may rely on.
pub fn docx_with_body(body: &str) -> Vec<u8> {
    let document = document_xml(body);
    let styles = styles_xml();
    let rels = rels_xml();
    build_docx(&[
        ("word/document.xml", document.as_str()),
        ("word/styles.xml", styles.as_str()),
        ("word/_rels/document.xml.rels", rels.as_str()),
    ])
}

pub fn part_text(bytes: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut out = String::new();
    entry.read_to_string(&mut out).unwrap();
    out
}

pub fn has_part(bytes: &[u8], name: &str) -> bool {
    let mut archive = ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
    archive.by_name(name).is_ok()
}

/// Rendered text of each body paragraph: every `w:t` under the paragraph,
/// concatenated. Tracked deletions hold `w:delText` and do not render.
pub fn rendered_paragraphs(bytes: &[u8]) -> Vec<String> {
    let document = part_text(bytes, "word/document.xml");
    let doc = roxmltree::Document::parse(&document).unwrap();
    let body = doc
        .root_element()
        .children()
        .find(|n| n.tag_name().name() == "body")
        .unwrap();
    body.children()
        .filter(|n| n.tag_name().name() == "p")
        .map(|p| {
            p.descendants()
                .filter(|n| n.tag_name().name() == "t")
                .filter_map(|n| n.text())
                .collect::<String>()
        })
        .collect()
}

/// Concatenated `w:delText` of a paragraph, in order.
pub fn struck_text(bytes: &[u8], paragraph: usize) -> String {
    let document = part_text(bytes, "word/document.xml");
    let doc = roxmltree::Document::parse(&document).unwrap();
    let body = doc
        .root_element()
        .children()
        .find(|n| n.tag_name().name() == "body")
        .unwrap();
    let p = body
        .children()
        .filter(|n| n.tag_name().name() == "p")
        .nth(paragraph)
        .unwrap();
    p.descendants()
        .filter(|n| n.tag_name().name() == "delText")
        .filter_map(|n| n.text())
        .collect()
}

//! Review comments: body registration, extended metadata, and the package
//! plumbing they require (part bootstrap, relationships, annotation style).
//!
//! The structural side — bracketing the commented span with
//! `w:commentRangeStart`/`w:commentRangeEnd` and a reference run — lives in
//! the editor; this module owns everything keyed by the comment id.

use indextree::NodeId;

use crate::error::Error;
use crate::package::{self, Package};
use crate::xml::{XmlTree, ns};

pub const REL_TYPE_COMMENTS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/comments";
pub const REL_TYPE_COMMENTS_EXTENDED: &str =
    "http://schemas.microsoft.com/office/2011/relationships/commentsExtended";

/// Style id referenced by comment body paragraphs; the style's display name
/// is the host word processor's "annotation text".
pub const COMMENT_STYLE_ID: &str = "CommentStyle";
pub const COMMENT_STYLE_NAME: &str = "annotation text";

/// Seeds for parts that may be absent from a package that never carried
/// comments. Written before the first comment is registered.
const COMMENTS_TEMPLATE: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n",
    "<w:comments",
    " xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"",
    " xmlns:w14=\"http://schemas.microsoft.com/office/word/2010/wordml\"",
    " xmlns:mc=\"http://schemas.openxmlformats.org/markup-compatibility/2006\"",
    " mc:Ignorable=\"w14\"/>\n",
);

const COMMENTS_EXTENDED_TEMPLATE: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n",
    "<w15:commentsEx",
    " xmlns:w15=\"http://schemas.microsoft.com/office/word/2012/wordml\"",
    " xmlns:mc=\"http://schemas.openxmlformats.org/markup-compatibility/2006\"",
    " mc:Ignorable=\"w15\"/>\n",
);

/// A comment as supplied by the caller, before registration has assigned it
/// an id and an anchor paragraph id.
#[derive(Debug, Clone)]
pub struct CommentDraft {
    pub text: String,
    pub author: Option<String>,
    pub initials: Option<String>,
}

impl CommentDraft {
    pub fn new(text: impl Into<String>) -> Self {
        CommentDraft {
            text: text.into(),
            author: None,
            initials: None,
        }
    }
}

/// A comment with every identifier assigned. Only this type can be turned
/// into markup, so a body without an anchor id cannot be serialized.
pub(crate) struct RegisteredComment {
    pub id: u32,
    pub para_id: String,
    pub author: String,
    pub initials: String,
    pub text: String,
    pub date: String,
}

impl RegisteredComment {
    pub fn new(
        draft: CommentDraft,
        id: u32,
        para_id: String,
        default_author: &str,
        date: String,
    ) -> Self {
        RegisteredComment {
            id,
            para_id,
            author: draft.author.unwrap_or_else(|| default_author.to_string()),
            initials: draft.initials.unwrap_or_else(|| "RA".to_string()),
            text: draft.text,
            date,
        }
    }

    /// Body element for the comments part: a single paragraph in the
    /// annotation style, keyed by the anchor paragraph id.
    pub fn to_element(&self, tree: &mut XmlTree) -> NodeId {
        let comment = tree.new_element(Some(ns::W), "comment");
        tree.set_attr(comment, Some(ns::W), "id", &self.id.to_string());
        tree.set_attr(comment, Some(ns::W), "author", &self.author);
        tree.set_attr(comment, Some(ns::W), "date", &self.date);
        tree.set_attr(comment, Some(ns::W), "initials", &self.initials);

        let p = tree.new_element(Some(ns::W), "p");
        tree.set_attr(p, Some(ns::W14), "paraId", &self.para_id);
        tree.append(comment, p);

        let ppr = tree.new_element(Some(ns::W), "pPr");
        tree.append(p, ppr);
        let pstyle = tree.new_element(Some(ns::W), "pStyle");
        tree.set_attr(pstyle, Some(ns::W), "val", COMMENT_STYLE_ID);
        tree.append(ppr, pstyle);

        let run = tree.new_element(Some(ns::W), "r");
        tree.append(p, run);
        let t = tree.new_element(Some(ns::W), "t");
        tree.set_attr(t, Some(ns::XML), "space", "preserve");
        let content = tree.new_text(&self.text);
        tree.append(t, content);
        tree.append(run, t);

        comment
    }
}

/// Write the comments/extended-comments seed parts when absent. Idempotent.
pub(crate) fn bootstrap_comment_parts(package: &mut Package) {
    if !package.has_part(package::COMMENTS) {
        log::debug!("bootstrapping comments part");
        package.put_part(package::COMMENTS, COMMENTS_TEMPLATE.as_bytes().to_vec());
    }
    if !package.has_part(package::COMMENTS_EXTENDED) {
        log::debug!("bootstrapping extended comments part");
        package.put_part(
            package::COMMENTS_EXTENDED,
            COMMENTS_EXTENDED_TEMPLATE.as_bytes().to_vec(),
        );
    }
}

/// Count of comment bodies already registered; the next comment id is this
/// plus one.
pub(crate) fn comment_count(package: &Package) -> Result<usize, Error> {
    let comments = package.xml_part(package::COMMENTS)?;
    Ok(comments
        .descendants_named(comments.root(), Some(ns::W), "comment")
        .len())
}

pub(crate) fn append_comment_body(
    package: &mut Package,
    registered: &RegisteredComment,
) -> Result<(), Error> {
    let mut comments = package.xml_part(package::COMMENTS)?;
    let body = registered.to_element(&mut comments);
    let root = comments.root();
    comments.append(root, body);
    package.put_xml_part(package::COMMENTS, &comments);

    let mut extended = package.xml_part(package::COMMENTS_EXTENDED)?;
    let entry = extended.new_element(Some(ns::W15), "commentEx");
    extended.set_attr(entry, Some(ns::W15), "paraId", &registered.para_id);
    extended.set_attr(entry, Some(ns::W15), "done", "0");
    let root = extended.root();
    extended.append(root, entry);
    package.put_xml_part(package::COMMENTS_EXTENDED, &extended);

    log::debug!(
        "registered comment {} (anchor {})",
        registered.id,
        registered.para_id
    );
    Ok(())
}

/// Ensure the annotation-text paragraph style exists in the styles part.
/// An absent styles part is fatal; an existing style is left untouched.
pub(crate) fn ensure_annotation_style(package: &mut Package) -> Result<(), Error> {
    let mut styles = package.xml_part(package::STYLES)?;
    let root = styles.root();
    for style in styles.descendants_named(root, Some(ns::W), "style") {
        let name = styles
            .find_child(style, Some(ns::W), "name")
            .and_then(|n| styles.attr(n, Some(ns::W), "val"));
        if name == Some(COMMENT_STYLE_NAME) {
            return Ok(());
        }
    }

    let style = styles.new_element(Some(ns::W), "style");
    styles.set_attr(style, Some(ns::W), "type", "paragraph");
    styles.set_attr(style, Some(ns::W), "styleId", COMMENT_STYLE_ID);
    let name = styles.new_element(Some(ns::W), "name");
    styles.set_attr(name, Some(ns::W), "val", COMMENT_STYLE_NAME);
    styles.append(style, name);
    let based_on = styles.new_element(Some(ns::W), "basedOn");
    styles.set_attr(based_on, Some(ns::W), "val", "1");
    styles.append(style, based_on);
    let priority = styles.new_element(Some(ns::W), "uiPriority");
    styles.set_attr(priority, Some(ns::W), "val", "0");
    styles.append(style, priority);
    let ppr = styles.new_element(Some(ns::W), "pPr");
    let jc = styles.new_element(Some(ns::W), "jc");
    styles.set_attr(jc, Some(ns::W), "val", "left");
    styles.append(ppr, jc);
    styles.append(style, ppr);
    styles.append(root, style);

    package.put_xml_part(package::STYLES, &styles);
    log::debug!("created '{COMMENT_STYLE_NAME}' paragraph style");
    Ok(())
}

/// Ensure the comments and commentsExtended relationships exist in the
/// document relationships part. Missing entries take the next free numeric
/// id; an absent relationships part is fatal.
pub(crate) fn ensure_comment_relationships(package: &mut Package) -> Result<(), Error> {
    let mut rels = package.xml_part(package::DOCUMENT_RELS)?;
    let root = rels.root();

    let mut has_comments = false;
    let mut has_extended = false;
    let mut max_id = 0u32;
    for rel in rels.descendants_named(root, Some(ns::PKG_RELS), "Relationship") {
        match rels.attr(rel, None, "Type") {
            Some(REL_TYPE_COMMENTS) => has_comments = true,
            Some(REL_TYPE_COMMENTS_EXTENDED) => has_extended = true,
            _ => {}
        }
        if let Some(id) = rels.attr(rel, None, "Id") {
            if let Some(n) = id.strip_prefix("rId").and_then(|v| v.parse::<u32>().ok()) {
                max_id = max_id.max(n);
            }
        }
    }

    let mut next_id = max_id + 1;
    let add = |rels: &mut XmlTree, rel_type: &str, target: &str, next_id: &mut u32| {
        let rel = rels.new_element(Some(ns::PKG_RELS), "Relationship");
        rels.set_attr(rel, None, "Id", &format!("rId{next_id}"));
        rels.set_attr(rel, None, "Type", rel_type);
        rels.set_attr(rel, None, "Target", target);
        rels.append(root, rel);
        log::debug!("added {target} relationship as rId{next_id}");
        *next_id += 1;
    };
    let mut changed = false;
    if !has_comments {
        add(&mut rels, REL_TYPE_COMMENTS, "comments.xml", &mut next_id);
        changed = true;
    }
    if !has_extended {
        add(
            &mut rels,
            REL_TYPE_COMMENTS_EXTENDED,
            "commentsExtended.xml",
            &mut next_id,
        );
        changed = true;
    }
    if changed {
        package.put_xml_part(package::DOCUMENT_RELS, &rels);
    }
    Ok(())
}

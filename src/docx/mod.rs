//! The editing engine.
//!
//! Every mutating operation follows the same shape: re-parse the document
//! part from the package store, mutate the tree in memory, serialize the
//! whole part back. The ZIP container is only rewritten by an explicit
//! `save`/`save_as`, so a crashed operation can at worst leave the
//! in-memory store inconsistent, never a half-written file on disk.

mod comment;
mod numbering;
mod para_id;
mod revision;
mod span;
pub mod styles;

use std::path::{Path, PathBuf};

use indextree::NodeId;

pub use comment::CommentDraft;

use crate::error::Error;
use crate::package::{self, Package};
use crate::xml::{XmlTree, ns};

use numbering::Numbering;
use para_id::ParaIdGenerator;
use styles::{ParagraphStyle, SectionProperties};

pub const DEFAULT_AUTHOR: &str = "Document Review Assistant";

pub struct DocxEditor {
    package: Package,
    path: Option<PathBuf>,
    tree: XmlTree,
    author: String,
    para_ids: ParaIdGenerator,
    numbering: Numbering,
}

impl DocxEditor {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let package = Package::from_path(path)?;
        let mut editor = Self::from_package(package)?;
        editor.path = Some(path.to_path_buf());
        log::debug!("opened {}", path.display());
        Ok(editor)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Self::from_package(Package::from_bytes(bytes)?)
    }

    fn from_package(package: Package) -> Result<Self, Error> {
        let tree = package.xml_part(package::DOCUMENT)?;
        let para_ids = ParaIdGenerator::seed(&package);
        let numbering = Numbering::parse(&package)?;
        Ok(DocxEditor {
            package,
            path: None,
            tree,
            author: DEFAULT_AUTHOR.to_string(),
            para_ids,
            numbering,
        })
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.author = author.into();
    }

    /// Rewrite the container over the file this editor was opened from.
    pub fn save(&self) -> Result<(), Error> {
        let path = self.path.as_deref().ok_or(Error::NoBackingPath)?;
        self.package.write_to(path)
    }

    pub fn save_as(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        self.package.write_to(path.as_ref())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        self.package.to_bytes()
    }

    /// Re-parse the document part from the part store. Called at the top of
    /// every operation so edits always start from persisted state.
    fn refresh(&mut self) -> Result<(), Error> {
        self.tree = self.package.xml_part(package::DOCUMENT)?;
        Ok(())
    }

    fn persist(&mut self) {
        self.package.put_xml_part(package::DOCUMENT, &self.tree);
    }

    /// First-level body paragraphs with rendered text; tables are opaque and
    /// empty paragraphs are not addressable.
    fn main_paragraphs(&self) -> Result<Vec<NodeId>, Error> {
        let body = self
            .tree
            .find_child(self.tree.root(), Some(ns::W), "body")
            .ok_or(Error::NodeNotFound("w:body"))?;
        Ok(self
            .tree
            .children(body)
            .into_iter()
            .filter(|&child| {
                self.tree.is_named(child, Some(ns::W), "p")
                    && !span::paragraph_text(&self.tree, child).is_empty()
            })
            .collect())
    }

    fn paragraph_at(&self, index: usize) -> Result<NodeId, Error> {
        let paragraphs = self.main_paragraphs()?;
        paragraphs
            .get(index)
            .copied()
            .ok_or(Error::ParagraphOutOfRange {
                index,
                count: paragraphs.len(),
            })
    }

    /// Rendered text of every addressable paragraph.
    pub fn paragraphs(&mut self) -> Result<Vec<String>, Error> {
        self.refresh()?;
        Ok(self
            .main_paragraphs()?
            .iter()
            .map(|&p| span::paragraph_text(&self.tree, p))
            .collect())
    }

    /// Rendered text with autonumber labels. Advances the per-(list, level)
    /// counters: calling this twice yields successive labels.
    pub fn numbered_paragraphs(&mut self) -> Result<Vec<String>, Error> {
        self.refresh()?;
        let mut out = Vec::new();
        for p in self.main_paragraphs()? {
            let text = span::paragraph_text(&self.tree, p);
            let label = Numbering::paragraph_reference(&self.tree, p)
                .and_then(|(num_id, level)| self.numbering.advance(&num_id, level));
            match label {
                Some(label) if !label.is_empty() => out.push(format!("{label} {text}")),
                _ => out.push(text),
            }
        }
        Ok(out)
    }

    /// Insert `text` at a character offset, optionally as a tracked
    /// insertion. The new run copies the formatting of the run it lands in.
    pub fn insert(
        &mut self,
        paragraph: usize,
        offset: usize,
        text: &str,
        tracked: bool,
    ) -> Result<(), Error> {
        self.refresh()?;
        let para = self.paragraph_at(paragraph)?;
        let point = span::resolve_point(&self.tree, para, offset).ok_or(Error::UnresolvedSpan {
            start: offset,
            end: offset,
        })?;

        let (before, after) = span::split_run(&mut self.tree, point.leaf, point.offset);

        let new_run = self.tree.new_element(Some(ns::W), "r");
        if let Some(rpr) = self.tree.find_child(point.leaf, Some(ns::W), "rPr") {
            let copy = self.tree.deep_copy(rpr);
            self.tree.append(new_run, copy);
        }
        let t = span::text_element(&mut self.tree, text, true);
        self.tree.append(new_run, t);

        let inserted = if tracked {
            let id = revision::next_revision_id(&self.tree, "ins");
            let mark = revision::revision_mark(&mut self.tree, "ins", id, &self.author, &timestamp());
            self.tree.append(mark, new_run);
            mark
        } else {
            new_run
        };

        self.tree.insert_after(point.leaf, before);
        self.tree.insert_after(before, inserted);
        self.tree.insert_after(inserted, after);
        self.tree.detach(point.leaf);

        span::normalize_paragraph(&mut self.tree, para);
        self.persist();
        log::debug!("inserted {} chars at paragraph {paragraph} offset {offset}", text.chars().count());
        Ok(())
    }

    /// Delete `[start, end)`, destructively or as a tracked deletion that
    /// keeps the struck text inside a `w:del` marker. Deleting content that
    /// sits inside an insertion marker removes it outright either way.
    pub fn delete(
        &mut self,
        paragraph: usize,
        start: usize,
        end: usize,
        tracked: bool,
    ) -> Result<(), Error> {
        self.refresh()?;
        let para = self.paragraph_at(paragraph)?;
        let (start_point, end_point) = span::resolve_span(&self.tree, para, start, end)
            .ok_or(Error::UnresolvedSpan { start, end })?;

        let leaves = span::leaves_in_effect(&self.tree, para);
        let start_idx = leaves
            .iter()
            .position(|&l| l == start_point.leaf)
            .ok_or(Error::NodeNotFound("span start leaf"))?;
        let end_idx = leaves
            .iter()
            .position(|&l| l == end_point.leaf)
            .ok_or(Error::NodeNotFound("span end leaf"))?;

        let mut doomed = Vec::new();
        if start_idx == end_idx {
            let leaf = start_point.leaf;
            let (before, rest) = span::split_run(&mut self.tree, leaf, start_point.offset);
            let (middle, after) =
                span::split_run(&mut self.tree, rest, end_point.offset - start_point.offset);
            self.tree.insert_after(leaf, before);
            self.tree.insert_after(before, middle);
            self.tree.insert_after(middle, after);
            self.tree.detach(leaf);
            doomed.push(middle);
        } else {
            let (before, cut_head) =
                span::split_run(&mut self.tree, start_point.leaf, start_point.offset);
            let (cut_tail, after) =
                span::split_run(&mut self.tree, end_point.leaf, end_point.offset);

            self.tree.insert_after(start_point.leaf, before);
            self.tree.insert_after(before, cut_head);
            self.tree.detach(start_point.leaf);

            self.tree.insert_after(end_point.leaf, cut_tail);
            self.tree.insert_after(cut_tail, after);
            self.tree.detach(end_point.leaf);

            doomed.push(cut_head);
            doomed.extend(&leaves[start_idx + 1..end_idx]);
            doomed.push(cut_tail);
        }

        for run in doomed {
            if !tracked || revision::is_inside_insertion(&self.tree, run) {
                // insert-then-delete leaves no trace
                self.tree.detach(run);
                continue;
            }
            let id = revision::next_revision_id(&self.tree, "del");
            let mark =
                revision::revision_mark(&mut self.tree, "del", id, &self.author, &timestamp());
            let struck = revision::deleted_copy(&mut self.tree, run);
            self.tree.append(mark, struck);
            self.tree.insert_after(run, mark);
            self.tree.detach(run);
        }

        if tracked {
            revision::merge_anchors_into_deletions(&mut self.tree, para);
        } else {
            revision::drop_empty_anchor_pairs(&mut self.tree, para);
        }

        span::normalize_paragraph(&mut self.tree, para);
        self.persist();
        log::debug!("deleted {start}..{end} in paragraph {paragraph} (tracked: {tracked})");
        Ok(())
    }

    /// Anchor a comment to `[start, end)`. Registers the body and extended
    /// metadata, ensures the required relationships and annotation style,
    /// then brackets the span. Returns the comment id.
    pub fn add_comment(
        &mut self,
        paragraph: usize,
        start: usize,
        end: usize,
        draft: CommentDraft,
    ) -> Result<u32, Error> {
        self.refresh()?;
        let para = self.paragraph_at(paragraph)?;
        // both boundaries must resolve before any part is touched
        let (start_point, end_point) = span::resolve_span(&self.tree, para, start, end)
            .ok_or(Error::UnresolvedSpan { start, end })?;

        let comment_id = self.register_comment(draft)?;

        let id_str = comment_id.to_string();
        let anchor_start = self
            .tree
            .new_element(Some(ns::W), "commentRangeStart");
        self.tree.set_attr(anchor_start, Some(ns::W), "id", &id_str);
        let anchor_end = self.tree.new_element(Some(ns::W), "commentRangeEnd");
        self.tree.set_attr(anchor_end, Some(ns::W), "id", &id_str);
        let reference_run = self.tree.new_element(Some(ns::W), "r");
        let reference = self.tree.new_element(Some(ns::W), "commentReference");
        self.tree.set_attr(reference, Some(ns::W), "id", &id_str);
        self.tree.append(reference_run, reference);

        if start_point.leaf == end_point.leaf {
            let leaf = start_point.leaf;
            let (before, rest) = span::split_run(&mut self.tree, leaf, start_point.offset);
            let (commented, after) =
                span::split_run(&mut self.tree, rest, end_point.offset - start_point.offset);
            self.tree.insert_after(leaf, before);
            self.tree.insert_after(before, commented);
            self.tree.insert_after(commented, after);
            self.tree.detach(leaf);

            self.tree.insert_after(before, anchor_start);
            self.tree.insert_after(commented, anchor_end);
            self.tree.insert_after(anchor_end, reference_run);
        } else {
            let (before, commented_head) =
                span::split_run(&mut self.tree, start_point.leaf, start_point.offset);
            let (commented_tail, after) =
                span::split_run(&mut self.tree, end_point.leaf, end_point.offset);

            self.tree.insert_after(start_point.leaf, before);
            self.tree.insert_after(before, commented_head);
            self.tree.detach(start_point.leaf);

            self.tree.insert_after(end_point.leaf, commented_tail);
            self.tree.insert_after(commented_tail, after);
            self.tree.detach(end_point.leaf);

            self.tree.insert_after(before, anchor_start);
            self.tree.insert_after(commented_tail, anchor_end);
            self.tree.insert_after(anchor_end, reference_run);
        }

        span::normalize_paragraph(&mut self.tree, para);
        self.persist();
        log::debug!("anchored comment {comment_id} to {start}..{end} in paragraph {paragraph}");
        Ok(comment_id)
    }

    fn register_comment(&mut self, draft: CommentDraft) -> Result<u32, Error> {
        comment::bootstrap_comment_parts(&mut self.package);
        comment::ensure_annotation_style(&mut self.package)?;

        let id = comment::comment_count(&self.package)? as u32 + 1;
        let para_id = self.para_ids.next_id();
        let registered =
            comment::RegisteredComment::new(draft, id, para_id, &self.author, timestamp());
        comment::append_comment_body(&mut self.package, &registered)?;

        comment::ensure_comment_relationships(&mut self.package)?;
        Ok(id)
    }

    /// Merge a style template into a paragraph, optionally recording the
    /// prior formatting as a change record. Returns the resulting snapshot.
    pub fn apply_style(
        &mut self,
        paragraph: usize,
        template: &ParagraphStyle,
        tracked: bool,
    ) -> Result<ParagraphStyle, Error> {
        self.refresh()?;
        let para = self.paragraph_at(paragraph)?;
        let author = self.author.clone();
        let result = styles::apply_to_paragraph(
            &mut self.tree,
            para,
            template,
            tracked,
            &author,
            &timestamp(),
        )?;
        self.persist();
        log::debug!("applied {:?} style to paragraph {paragraph}", template.category);
        Ok(result)
    }

    /// Verify a paragraph against a style template without mutating.
    pub fn check_style(
        &mut self,
        paragraph: usize,
        template: &ParagraphStyle,
    ) -> Result<bool, Error> {
        self.refresh()?;
        let para = self.paragraph_at(paragraph)?;
        Ok(styles::check_paragraph(&self.tree, para, template))
    }

    /// Merge a section-properties template into every section of the
    /// document.
    pub fn apply_page_format(&mut self, section: &SectionProperties) -> Result<(), Error> {
        self.refresh()?;
        styles::apply_page_format(&mut self.tree, section);
        self.persist();
        log::debug!("applied page format to all sections");
        Ok(())
    }
}

fn timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

//! Paragraph style templates, merge strategies, and style verification.
//!
//! A template is a sparse set of paragraph- and run-level properties keyed
//! by a named category. Applying one merges it into the paragraph's `w:pPr`
//! and each content run's `w:rPr` — template-defined properties win, absent
//! ones are untouched — optionally recording the pre-merge state in a
//! `w:pPrChange`/`w:rPrChange`. Checking replays the same comparison
//! without mutating.

use indextree::NodeId;

use crate::error::Error;
use crate::xml::{XmlTree, ns};

use super::revision::{next_revision_id, revision_mark};
use super::span::{leaves_in_effect, run_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    fn as_str(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "left" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" => Some(Alignment::Right),
            "justify" => Some(Alignment::Justify),
            _ => None,
        }
    }
}

/// The fixed set of style categories the review pipeline addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleCategory {
    Title,
    SubtitleCentered,
    SubtitleLeft,
    SectionHeadingCentered,
    SectionHeadingLeft,
    SubsectionHeadingLeft,
    Body,
    Salutation,
    SignatureRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MergeStrategy {
    Default,
    Body,
    Heading,
}

impl StyleCategory {
    pub(crate) fn merge_strategy(self) -> MergeStrategy {
        match self {
            StyleCategory::Body | StyleCategory::Salutation => MergeStrategy::Body,
            StyleCategory::Title | StyleCategory::SignatureRight => MergeStrategy::Default,
            StyleCategory::SubtitleCentered
            | StyleCategory::SubtitleLeft
            | StyleCategory::SectionHeadingCentered
            | StyleCategory::SectionHeadingLeft
            | StyleCategory::SubsectionHeadingLeft => MergeStrategy::Heading,
        }
    }

    /// Whether checking also verifies first-line indentation.
    fn checks_indentation(self) -> bool {
        self.merge_strategy() == MergeStrategy::Body
    }

    /// Built-in template for this category.
    pub fn template(self) -> ParagraphStyle {
        match self {
            StyleCategory::Title => ParagraphStyle {
                alignment: Some(Alignment::Center),
                widow_control: Some(true),
                snap_to_grid: Some(false),
                run: Some(CharacterStyle {
                    font: Some(FontSet {
                        ascii: "FZXiaoBiaoSong-B05S".into(),
                        h_ansi: "SimSun".into(),
                        east_asia: "FZXiaoBiaoSong-B05S".into(),
                        hint: None,
                    }),
                    size: Some(44),
                    size_cs: Some(44),
                    ..CharacterStyle::default()
                }),
                ..ParagraphStyle::new(self)
            },
            StyleCategory::SubtitleCentered => centered_heading(self, "SimHei"),
            StyleCategory::SubtitleLeft => indented_heading(self, "SimHei", 640),
            StyleCategory::SectionHeadingCentered => centered_heading(self, "KaiTi"),
            StyleCategory::SectionHeadingLeft => indented_heading(self, "KaiTi", 640),
            StyleCategory::SubsectionHeadingLeft => indented_heading(self, "FangSong", 643),
            StyleCategory::Body => indented_heading(self, "FangSong", 640),
            StyleCategory::Salutation => ParagraphStyle {
                alignment: Some(Alignment::Left),
                run: Some(cjk_run("FangSong", 32)),
                ..ParagraphStyle::new(self)
            },
            StyleCategory::SignatureRight => ParagraphStyle {
                alignment: Some(Alignment::Right),
                run: Some(cjk_run("FangSong", 32)),
                ..ParagraphStyle::new(self)
            },
        }
    }
}

fn cjk_run(face: &str, size: u32) -> CharacterStyle {
    CharacterStyle {
        font: Some(FontSet {
            ascii: face.into(),
            h_ansi: face.into(),
            east_asia: face.into(),
            hint: None,
        }),
        size: Some(size),
        size_cs: Some(size),
        ..CharacterStyle::default()
    }
}

fn centered_heading(category: StyleCategory, face: &str) -> ParagraphStyle {
    ParagraphStyle {
        alignment: Some(Alignment::Center),
        run: Some(cjk_run(face, 32)),
        ..ParagraphStyle::new(category)
    }
}

fn indented_heading(category: StyleCategory, face: &str, indent: u32) -> ParagraphStyle {
    ParagraphStyle {
        alignment: Some(Alignment::Left),
        first_line_indent: Some(indent),
        first_line_chars: Some(200),
        run: Some(cjk_run(face, 32)),
        ..ParagraphStyle::new(category)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontSet {
    pub ascii: String,
    pub h_ansi: String,
    pub east_asia: String,
    pub hint: Option<String>,
}

/// Run-level properties. Sizes are in half-points, spacing values in
/// twentieths of a point, matching the raw attribute units.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterStyle {
    pub font: Option<FontSet>,
    pub size: Option<u32>,
    pub size_cs: Option<u32>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub italic_cs: Option<bool>,
    pub color: Option<String>,
    pub highlight: Option<String>,
    pub kern: Option<u32>,
    pub spacing: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberingRef {
    pub num_id: String,
    pub level: u8,
}

/// Paragraph-level template/snapshot. Indentation is carried in both twips
/// (`first_line_indent`) and hundredths of a character (`first_line_chars`)
/// because the format stores — and checking verifies — both units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphStyle {
    pub category: StyleCategory,
    pub alignment: Option<Alignment>,
    pub snap_to_grid: Option<bool>,
    pub first_line_indent: Option<u32>,
    pub first_line_chars: Option<u32>,
    pub space_before: Option<u32>,
    pub space_before_lines: Option<u32>,
    pub space_before_autospacing: Option<bool>,
    pub space_after: Option<u32>,
    pub space_after_lines: Option<u32>,
    pub space_after_autospacing: Option<bool>,
    pub line: Option<u32>,
    pub line_rule: Option<String>,
    pub widow_control: Option<bool>,
    pub numbering: Option<NumberingRef>,
    pub run: Option<CharacterStyle>,
}

impl ParagraphStyle {
    pub fn new(category: StyleCategory) -> Self {
        ParagraphStyle {
            category,
            alignment: None,
            snap_to_grid: None,
            first_line_indent: None,
            first_line_chars: None,
            space_before: None,
            space_before_lines: None,
            space_before_autospacing: None,
            space_after: None,
            space_after_lines: None,
            space_after_autospacing: None,
            line: None,
            line_rule: None,
            widow_control: None,
            numbering: None,
            run: None,
        }
    }

    /// Build the `w:pPr` this template describes, detached.
    pub(crate) fn to_ppr(&self, tree: &mut XmlTree) -> NodeId {
        let ppr = tree.new_element(Some(ns::W), "pPr");

        if let Some(alignment) = self.alignment {
            let jc = tree.new_element(Some(ns::W), "jc");
            tree.set_attr(jc, Some(ns::W), "val", alignment.as_str());
            tree.append(ppr, jc);
        }
        if self.first_line_indent.is_some() || self.first_line_chars.is_some() {
            let ind = tree.new_element(Some(ns::W), "ind");
            if let Some(v) = self.first_line_indent {
                tree.set_attr(ind, Some(ns::W), "firstLine", &v.to_string());
            }
            if let Some(v) = self.first_line_chars {
                tree.set_attr(ind, Some(ns::W), "firstLineChars", &v.to_string());
            }
            tree.append(ppr, ind);
        }
        if let Some(snap) = self.snap_to_grid {
            let el = tree.new_element(Some(ns::W), "snapToGrid");
            tree.set_attr(el, Some(ns::W), "val", bool_val(snap));
            tree.append(ppr, el);
        }
        if self.space_before.is_some()
            || self.space_before_lines.is_some()
            || self.space_before_autospacing.is_some()
            || self.space_after.is_some()
            || self.space_after_lines.is_some()
            || self.space_after_autospacing.is_some()
            || self.line.is_some()
            || self.line_rule.is_some()
        {
            let spacing = tree.new_element(Some(ns::W), "spacing");
            if let Some(v) = self.space_before {
                tree.set_attr(spacing, Some(ns::W), "before", &v.to_string());
            }
            if let Some(v) = self.space_before_lines {
                tree.set_attr(spacing, Some(ns::W), "beforeLines", &v.to_string());
            }
            if let Some(v) = self.space_before_autospacing {
                tree.set_attr(spacing, Some(ns::W), "beforeAutospacing", bool_val(v));
            }
            if let Some(v) = self.space_after {
                tree.set_attr(spacing, Some(ns::W), "after", &v.to_string());
            }
            if let Some(v) = self.space_after_lines {
                tree.set_attr(spacing, Some(ns::W), "afterLines", &v.to_string());
            }
            if let Some(v) = self.space_after_autospacing {
                tree.set_attr(spacing, Some(ns::W), "afterAutospacing", bool_val(v));
            }
            if let Some(v) = self.line {
                tree.set_attr(spacing, Some(ns::W), "line", &v.to_string());
            }
            if let Some(v) = &self.line_rule {
                tree.set_attr(spacing, Some(ns::W), "lineRule", v);
            }
            tree.append(ppr, spacing);
        }
        if let Some(numbering) = &self.numbering {
            let num_pr = tree.new_element(Some(ns::W), "numPr");
            let ilvl = tree.new_element(Some(ns::W), "ilvl");
            tree.set_attr(ilvl, Some(ns::W), "val", &numbering.level.to_string());
            tree.append(num_pr, ilvl);
            let num_id = tree.new_element(Some(ns::W), "numId");
            tree.set_attr(num_id, Some(ns::W), "val", &numbering.num_id);
            tree.append(num_pr, num_id);
            tree.append(ppr, num_pr);
        }
        if self.widow_control == Some(true) {
            let el = tree.new_element(Some(ns::W), "widowControl");
            tree.append(ppr, el);
        }
        if let Some(run) = &self.run {
            let rpr = run.to_rpr(tree);
            tree.append(ppr, rpr);
        }
        ppr
    }

    /// Read a paragraph style back out of an existing `w:pPr`.
    pub(crate) fn from_ppr(tree: &XmlTree, ppr: NodeId, category: StyleCategory) -> Self {
        let mut style = ParagraphStyle::new(category);

        if let Some(jc) = tree.find_child(ppr, Some(ns::W), "jc") {
            style.alignment = tree.attr(jc, Some(ns::W), "val").and_then(Alignment::parse);
        }
        if let Some(ind) = tree.find_child(ppr, Some(ns::W), "ind") {
            style.first_line_indent = tree
                .attr(ind, Some(ns::W), "firstLine")
                .and_then(|v| v.parse().ok());
            style.first_line_chars = tree
                .attr(ind, Some(ns::W), "firstLineChars")
                .and_then(|v| v.parse().ok());
        }
        if let Some(snap) = tree.find_child(ppr, Some(ns::W), "snapToGrid") {
            style.snap_to_grid = Some(tree.attr(snap, Some(ns::W), "val") != Some("0"));
        }
        if let Some(spacing) = tree.find_child(ppr, Some(ns::W), "spacing") {
            let num = |name: &str| {
                tree.attr(spacing, Some(ns::W), name)
                    .and_then(|v| v.parse::<u32>().ok())
            };
            style.space_before = num("before");
            style.space_before_lines = num("beforeLines");
            style.space_after = num("after");
            style.space_after_lines = num("afterLines");
            style.line = num("line");
            style.space_before_autospacing = tree
                .attr(spacing, Some(ns::W), "beforeAutospacing")
                .map(|v| v == "1");
            style.space_after_autospacing = tree
                .attr(spacing, Some(ns::W), "afterAutospacing")
                .map(|v| v == "1");
            style.line_rule = tree
                .attr(spacing, Some(ns::W), "lineRule")
                .map(str::to_string);
        }
        if tree.find_child(ppr, Some(ns::W), "widowControl").is_some() {
            style.widow_control = Some(true);
        }
        if let Some(num_pr) = tree.find_child(ppr, Some(ns::W), "numPr") {
            let num_id = tree
                .find_child(num_pr, Some(ns::W), "numId")
                .and_then(|n| tree.attr(n, Some(ns::W), "val"))
                .map(str::to_string);
            let level = tree
                .find_child(num_pr, Some(ns::W), "ilvl")
                .and_then(|n| tree.attr(n, Some(ns::W), "val"))
                .and_then(|v| v.parse().ok());
            if let (Some(num_id), Some(level)) = (num_id, level) {
                style.numbering = Some(NumberingRef { num_id, level });
            }
        }
        if let Some(rpr) = tree.find_child(ppr, Some(ns::W), "rPr") {
            style.run = Some(CharacterStyle::from_rpr(tree, rpr));
        }
        style
    }

    /// One-line human-readable summary for review reports.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(run) = &self.run {
            if let Some(font) = &run.font {
                let face = if font.east_asia.is_empty() {
                    &font.ascii
                } else {
                    &font.east_asia
                };
                parts.push(format!("font {face}"));
            }
            if let Some(size) = run.size {
                // sizes are half-points
                if size % 2 == 0 {
                    parts.push(format!("{}pt", size / 2));
                } else {
                    parts.push(format!("{:.1}pt", size as f32 / 2.0));
                }
            }
            if run.bold == Some(true) {
                parts.push("bold".to_string());
            }
            if run.italic == Some(true) {
                parts.push("italic".to_string());
            }
        }
        if let Some(alignment) = self.alignment {
            parts.push(format!("{}-aligned", alignment.as_str()));
        }
        if parts.is_empty() {
            "default formatting".to_string()
        } else {
            parts.join(", ")
        }
    }
}

fn bool_val(v: bool) -> &'static str {
    if v { "1" } else { "0" }
}

impl CharacterStyle {
    pub(crate) fn to_rpr(&self, tree: &mut XmlTree) -> NodeId {
        let rpr = tree.new_element(Some(ns::W), "rPr");
        if let Some(font) = &self.font {
            let fonts = tree.new_element(Some(ns::W), "rFonts");
            tree.set_attr(fonts, Some(ns::W), "ascii", &font.ascii);
            tree.set_attr(fonts, Some(ns::W), "hAnsi", &font.h_ansi);
            tree.set_attr(fonts, Some(ns::W), "eastAsia", &font.east_asia);
            if let Some(hint) = &font.hint {
                tree.set_attr(fonts, Some(ns::W), "hint", hint);
            }
            tree.append(rpr, fonts);
        }
        if let Some(size) = self.size {
            let sz = tree.new_element(Some(ns::W), "sz");
            tree.set_attr(sz, Some(ns::W), "val", &size.to_string());
            tree.append(rpr, sz);
        }
        if let Some(size_cs) = self.size_cs {
            let sz_cs = tree.new_element(Some(ns::W), "szCs");
            tree.set_attr(sz_cs, Some(ns::W), "val", &size_cs.to_string());
            tree.append(rpr, sz_cs);
        }
        if self.bold == Some(true) {
            let b = tree.new_element(Some(ns::W), "b");
            tree.append(rpr, b);
        }
        if self.italic == Some(true) {
            let i = tree.new_element(Some(ns::W), "i");
            tree.append(rpr, i);
        }
        if self.italic_cs == Some(true) {
            let i_cs = tree.new_element(Some(ns::W), "iCs");
            tree.append(rpr, i_cs);
        }
        if let Some(color) = &self.color {
            let el = tree.new_element(Some(ns::W), "color");
            tree.set_attr(el, Some(ns::W), "val", color);
            tree.append(rpr, el);
        }
        if let Some(highlight) = &self.highlight {
            let el = tree.new_element(Some(ns::W), "highlight");
            tree.set_attr(el, Some(ns::W), "val", highlight);
            tree.append(rpr, el);
        }
        if let Some(kern) = self.kern {
            let el = tree.new_element(Some(ns::W), "kern");
            tree.set_attr(el, Some(ns::W), "val", &kern.to_string());
            tree.append(rpr, el);
        }
        if let Some(spacing) = self.spacing {
            let el = tree.new_element(Some(ns::W), "spacing");
            tree.set_attr(el, Some(ns::W), "val", &spacing.to_string());
            tree.append(rpr, el);
        }
        rpr
    }

    pub(crate) fn from_rpr(tree: &XmlTree, rpr: NodeId) -> Self {
        let mut style = CharacterStyle::default();
        if let Some(fonts) = tree.find_child(rpr, Some(ns::W), "rFonts") {
            style.font = Some(FontSet {
                ascii: tree
                    .attr(fonts, Some(ns::W), "ascii")
                    .unwrap_or_default()
                    .to_string(),
                h_ansi: tree
                    .attr(fonts, Some(ns::W), "hAnsi")
                    .unwrap_or_default()
                    .to_string(),
                east_asia: tree
                    .attr(fonts, Some(ns::W), "eastAsia")
                    .unwrap_or_default()
                    .to_string(),
                hint: tree.attr(fonts, Some(ns::W), "hint").map(str::to_string),
            });
        }
        let toggle = |name: &str| {
            tree.find_child(rpr, Some(ns::W), name).map(|el| {
                !matches!(tree.attr(el, Some(ns::W), "val"), Some("0") | Some("false"))
            })
        };
        style.bold = toggle("b");
        style.italic = toggle("i");
        style.italic_cs = toggle("iCs");
        let val_of = |name: &str| {
            tree.find_child(rpr, Some(ns::W), name)
                .and_then(|el| tree.attr(el, Some(ns::W), "val"))
        };
        style.size = val_of("sz").and_then(|v| v.parse().ok());
        style.size_cs = val_of("szCs").and_then(|v| v.parse().ok());
        style.color = val_of("color").map(str::to_string);
        style.highlight = val_of("highlight").map(str::to_string);
        style.kern = val_of("kern").and_then(|v| v.parse().ok());
        style.spacing = val_of("spacing").and_then(|v| v.parse().ok());
        style
    }
}

/// Template-wins merge: every template-defined child replaces the existing
/// child of the same name; children the template leaves out survive.
pub(crate) fn merge_properties(tree: &mut XmlTree, pr: NodeId, template_pr: NodeId) {
    for t_child in tree.child_elements(template_pr) {
        let Some(name) = tree.name(t_child).cloned() else {
            continue;
        };
        if let Some(existing) = tree.find_child(pr, name.ns.as_deref(), &name.local) {
            tree.detach(existing);
        }
        let copy = tree.deep_copy(t_child);
        tree.append(pr, copy);
    }
}

/// Strip leading spaces (never tabs) from the paragraph's leading leaves
/// until one retains content. A leaf inside a revision marker is never
/// touched; reaching a non-empty one stops the pass.
fn strip_leading_spaces(tree: &mut XmlTree, paragraph: NodeId) {
    for leaf in leaves_in_effect(tree, paragraph) {
        let in_revision = tree.ancestor_named(leaf, Some(ns::W), "ins").is_some()
            || tree.ancestor_named(leaf, Some(ns::W), "del").is_some();
        if in_revision {
            if !run_text(tree, leaf).is_empty() {
                break;
            }
            continue;
        }
        let mut retained = false;
        for t in tree.descendants_named(leaf, Some(ns::W), "t") {
            let text = tree.text_content(t);
            let stripped = text.trim_start_matches(' ').to_string();
            if stripped.len() != text.len() {
                tree.set_element_text(t, &stripped);
            }
            if !stripped.is_empty() {
                retained = true;
                break;
            }
        }
        if retained {
            break;
        }
    }
}

/// Merge `style` into `paragraph`, returning the post-merge snapshot.
pub(crate) fn apply_to_paragraph(
    tree: &mut XmlTree,
    paragraph: NodeId,
    style: &ParagraphStyle,
    tracked: bool,
    author: &str,
    date: &str,
) -> Result<ParagraphStyle, Error> {
    let mut template = style.clone();
    match style.category.merge_strategy() {
        MergeStrategy::Default => {}
        MergeStrategy::Body => strip_leading_spaces(tree, paragraph),
        MergeStrategy::Heading => {
            // numbered headings are labelled by the autonumber, not indented
            if template.numbering.is_some() {
                template.first_line_indent = None;
                template.first_line_chars = None;
            } else {
                strip_leading_spaces(tree, paragraph);
            }
        }
    }

    let template_ppr = template.to_ppr(tree);
    match tree.find_child(paragraph, Some(ns::W), "pPr") {
        Some(ppr) => {
            let snapshot = snapshot_ppr(tree, ppr);
            merge_properties(tree, ppr, template_ppr);
            if tracked && tree.find_child(ppr, Some(ns::W), "pPrChange").is_none() {
                let id = next_revision_id(tree, "pPrChange");
                let change = revision_mark(tree, "pPrChange", id, author, date);
                tree.append(change, snapshot);
                tree.append(ppr, change);
            }
        }
        None => {
            tree.prepend(paragraph, template_ppr);
        }
    }

    if let Some(run_style) = &template.run {
        for leaf in leaves_in_effect(tree, paragraph) {
            if run_text(tree, leaf).is_empty() {
                continue;
            }
            let template_rpr = run_style.to_rpr(tree);
            match tree.find_child(leaf, Some(ns::W), "rPr") {
                Some(rpr) => {
                    let snapshot = tree.deep_copy(rpr);
                    merge_properties(tree, rpr, template_rpr);
                    if tracked && tree.find_child(rpr, Some(ns::W), "rPrChange").is_none() {
                        let id = next_revision_id(tree, "rPrChange");
                        let change = revision_mark(tree, "rPrChange", id, author, date);
                        tree.append(change, snapshot);
                        tree.append(rpr, change);
                    }
                }
                None => {
                    tree.prepend(leaf, template_rpr);
                }
            }
        }
    }

    let ppr = tree
        .find_child(paragraph, Some(ns::W), "pPr")
        .ok_or(Error::NodeNotFound("w:pPr"))?;
    Ok(ParagraphStyle::from_ppr(tree, ppr, style.category))
}

/// Pre-merge paragraph snapshot for a change record: the `w:pPr` minus its
/// nested run-formatting subtree.
fn snapshot_ppr(tree: &mut XmlTree, ppr: NodeId) -> NodeId {
    let copy = tree.deep_copy(ppr);
    if let Some(rpr) = tree.find_child(copy, Some(ns::W), "rPr") {
        tree.detach(rpr);
    }
    copy
}

/// Property-by-property comparison against the template, short-circuiting
/// on the first missing or mismatched required property.
pub(crate) fn check_paragraph(tree: &XmlTree, paragraph: NodeId, style: &ParagraphStyle) -> bool {
    let Some(ppr) = tree.find_child(paragraph, Some(ns::W), "pPr") else {
        log::debug!("style check: paragraph has no properties");
        return false;
    };

    if style.category.checks_indentation() {
        let Some(ind) = tree.find_child(ppr, Some(ns::W), "ind") else {
            log::debug!("style check: no indentation properties");
            return false;
        };
        let attr_matches = |name: &str, expected: Option<u32>| -> bool {
            match (tree.attr(ind, Some(ns::W), name), expected) {
                (Some(value), Some(expected)) => value.parse::<u32>().ok() == Some(expected),
                _ => true,
            }
        };
        if !attr_matches("firstLine", style.first_line_indent) {
            log::debug!("style check: first-line indent mismatch");
            return false;
        }
        if !attr_matches("firstLineChars", style.first_line_chars) {
            log::debug!("style check: first-line chars mismatch");
            return false;
        }
    }

    let Some(para_rpr) = tree.find_child(ppr, Some(ns::W), "rPr") else {
        log::debug!("style check: paragraph has no run properties");
        return false;
    };
    if !check_rpr(tree, para_rpr, style) {
        return false;
    }

    for leaf in leaves_in_effect(tree, paragraph) {
        if run_text(tree, leaf).is_empty() {
            continue;
        }
        let Some(rpr) = tree.find_child(leaf, Some(ns::W), "rPr") else {
            log::debug!("style check: run has no properties");
            return false;
        };
        if !check_rpr(tree, rpr, style) {
            return false;
        }
    }
    true
}

fn check_rpr(tree: &XmlTree, rpr: NodeId, style: &ParagraphStyle) -> bool {
    let Some(run) = &style.run else {
        return true;
    };

    if let Some(font) = &run.font {
        let Some(fonts) = tree.find_child(rpr, Some(ns::W), "rFonts") else {
            log::debug!("style check: no font properties");
            return false;
        };
        if tree.attr(fonts, Some(ns::W), "eastAsia") != Some(font.east_asia.as_str()) {
            log::debug!("style check: font family mismatch");
            return false;
        }
    }

    if let Some(expected) = run.size {
        let Some(sz) = tree.find_child(rpr, Some(ns::W), "sz") else {
            log::debug!("style check: no font size");
            return false;
        };
        if let Some(value) = tree.attr(sz, Some(ns::W), "val") {
            if value.parse::<u32>().ok() != Some(expected) {
                log::debug!("style check: font size mismatch");
                return false;
            }
        }
    }
    true
}

/// Page layout for a `w:sectPr`: size, margins, columns and document grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionProperties {
    pub page_width: u32,
    pub page_height: u32,
    pub margin_top: u32,
    pub margin_right: u32,
    pub margin_bottom: u32,
    pub margin_left: u32,
    pub header_space: u32,
    pub footer_space: u32,
    pub gutter: u32,
    pub cols_space: u32,
    pub cols_num: u32,
    pub grid_type: String,
    pub grid_line_pitch: u32,
    pub grid_char_space: u32,
}

impl SectionProperties {
    /// A4 layout used for official documents, line grid at 312 twips.
    pub fn official_document() -> Self {
        SectionProperties {
            page_width: 11906,
            page_height: 16838,
            margin_top: 1440,
            margin_right: 1800,
            margin_bottom: 1440,
            margin_left: 1800,
            header_space: 851,
            footer_space: 992,
            gutter: 0,
            cols_space: 425,
            cols_num: 1,
            grid_type: "lines".to_string(),
            grid_line_pitch: 312,
            grid_char_space: 0,
        }
    }

    pub(crate) fn to_sect_pr(&self, tree: &mut XmlTree) -> NodeId {
        let sect_pr = tree.new_element(Some(ns::W), "sectPr");
        let pg_sz = tree.new_element(Some(ns::W), "pgSz");
        tree.set_attr(pg_sz, Some(ns::W), "w", &self.page_width.to_string());
        tree.set_attr(pg_sz, Some(ns::W), "h", &self.page_height.to_string());
        tree.append(sect_pr, pg_sz);
        let pg_mar = tree.new_element(Some(ns::W), "pgMar");
        tree.set_attr(pg_mar, Some(ns::W), "top", &self.margin_top.to_string());
        tree.set_attr(pg_mar, Some(ns::W), "right", &self.margin_right.to_string());
        tree.set_attr(pg_mar, Some(ns::W), "bottom", &self.margin_bottom.to_string());
        tree.set_attr(pg_mar, Some(ns::W), "left", &self.margin_left.to_string());
        tree.set_attr(pg_mar, Some(ns::W), "header", &self.header_space.to_string());
        tree.set_attr(pg_mar, Some(ns::W), "footer", &self.footer_space.to_string());
        tree.set_attr(pg_mar, Some(ns::W), "gutter", &self.gutter.to_string());
        tree.append(sect_pr, pg_mar);
        let cols = tree.new_element(Some(ns::W), "cols");
        tree.set_attr(cols, Some(ns::W), "space", &self.cols_space.to_string());
        tree.set_attr(cols, Some(ns::W), "num", &self.cols_num.to_string());
        tree.append(sect_pr, cols);
        let grid = tree.new_element(Some(ns::W), "docGrid");
        tree.set_attr(grid, Some(ns::W), "type", &self.grid_type);
        tree.set_attr(
            grid,
            Some(ns::W),
            "linePitch",
            &self.grid_line_pitch.to_string(),
        );
        tree.set_attr(
            grid,
            Some(ns::W),
            "charSpace",
            &self.grid_char_space.to_string(),
        );
        tree.append(sect_pr, grid);
        sect_pr
    }
}

/// Merge the section template into every `w:sectPr` in the document.
pub(crate) fn apply_page_format(tree: &mut XmlTree, section: &SectionProperties) {
    let template = section.to_sect_pr(tree);
    for sect_pr in tree.descendants_named(tree.root(), Some(ns::W), "sectPr") {
        merge_properties(tree, sect_pr, template);
    }
}

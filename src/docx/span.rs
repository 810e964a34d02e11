//! Offset resolution and run splitting.
//!
//! All edit operations address paragraph content by zero-based character
//! offsets into the paragraph's rendered text: the concatenation of its
//! in-effect leaf texts in document order. A leaf is a `w:r` child of the
//! paragraph or a `w:r` nested in a `w:ins` child; `w:del` content holds
//! `w:delText` and never contributes to offset accounting.

use indextree::NodeId;

use crate::xml::{XmlTree, ns};

/// A resolved offset: the leaf it falls in and the offset local to that leaf.
#[derive(Debug, Clone, Copy)]
pub struct SpanPoint {
    pub leaf: NodeId,
    pub offset: usize,
}

pub fn leaves_in_effect(tree: &XmlTree, paragraph: NodeId) -> Vec<NodeId> {
    let mut leaves = Vec::new();
    for child in tree.children(paragraph) {
        if tree.is_named(child, Some(ns::W), "r") {
            leaves.push(child);
        } else if tree.is_named(child, Some(ns::W), "ins") {
            for inner in tree.children(child) {
                if tree.is_named(inner, Some(ns::W), "r") {
                    leaves.push(inner);
                }
            }
        }
    }
    leaves
}

pub fn run_text(tree: &XmlTree, run: NodeId) -> String {
    let mut out = String::new();
    for t in tree.descendants_named(run, Some(ns::W), "t") {
        out.push_str(&tree.text_content(t));
    }
    out
}

pub fn paragraph_text(tree: &XmlTree, paragraph: NodeId) -> String {
    let mut out = String::new();
    for t in tree.descendants_named(paragraph, Some(ns::W), "t") {
        out.push_str(&tree.text_content(t));
    }
    out
}

/// Resolve a single offset to the first leaf whose cumulative length reaches
/// it. `None` when the paragraph's rendered text is shorter than `offset`.
pub fn resolve_point(tree: &XmlTree, paragraph: NodeId, offset: usize) -> Option<SpanPoint> {
    let mut before = 0usize;
    for leaf in leaves_in_effect(tree, paragraph) {
        let len = run_text(tree, leaf).chars().count();
        if before + len >= offset {
            return Some(SpanPoint {
                leaf,
                offset: offset - before,
            });
        }
        before += len;
    }
    None
}

/// Resolve both boundaries of a half-open range in one walk. Both must land
/// in a leaf; a partially resolved range is no resolution at all.
pub fn resolve_span(
    tree: &XmlTree,
    paragraph: NodeId,
    start: usize,
    end: usize,
) -> Option<(SpanPoint, SpanPoint)> {
    let mut before = 0usize;
    let mut start_point = None;
    let mut end_point = None;
    for leaf in leaves_in_effect(tree, paragraph) {
        let len = run_text(tree, leaf).chars().count();
        let reached = before + len;
        if reached >= start && start_point.is_none() {
            start_point = Some(SpanPoint {
                leaf,
                offset: start - before,
            });
        }
        if reached >= end && end_point.is_none() {
            end_point = Some(SpanPoint {
                leaf,
                offset: end - before,
            });
            break;
        }
        before = reached;
    }
    Some((start_point?, end_point?))
}

/// Build a `w:t` element. Split fragments always mark their whitespace as
/// significant; the container format drops edge whitespace otherwise.
pub fn text_element(tree: &mut XmlTree, text: &str, preserve: bool) -> NodeId {
    let t = tree.new_element(Some(ns::W), "t");
    if preserve {
        tree.set_attr(t, Some(ns::XML), "space", "preserve");
    }
    if !text.is_empty() {
        let content = tree.new_text(text);
        tree.append(t, content);
    }
    t
}

/// Split a run at a local character offset into two fresh detached runs,
/// each with its own copy of the source formatting. Text nodes wholly before
/// the offset move left verbatim, the straddling node is divided, the rest
/// move right. An empty left half keeps an explicit empty `w:t`; an empty
/// right half is left bare for normalization to prune.
pub fn split_run(tree: &mut XmlTree, run: NodeId, at: usize) -> (NodeId, NodeId) {
    let left = tree.new_element(Some(ns::W), "r");
    let right = tree.new_element(Some(ns::W), "r");
    if let Some(rpr) = tree.find_child(run, Some(ns::W), "rPr") {
        let left_rpr = tree.deep_copy(rpr);
        tree.append(left, left_rpr);
        let right_rpr = tree.deep_copy(rpr);
        tree.append(right, right_rpr);
    }

    let mut before = 0usize;
    let mut split_done = false;
    for t in tree.descendants_named(run, Some(ns::W), "t") {
        if split_done {
            let copy = tree.deep_copy(t);
            tree.append(right, copy);
            continue;
        }
        let text = tree.text_content(t);
        let len = text.chars().count();
        if before + len >= at {
            let local = at - before;
            let byte = text
                .char_indices()
                .nth(local)
                .map(|(i, _)| i)
                .unwrap_or(text.len());
            let (head, tail) = text.split_at(byte);
            if !head.is_empty() {
                let node = text_element(tree, head, true);
                tree.append(left, node);
            }
            if !tail.is_empty() {
                let node = text_element(tree, tail, true);
                tree.append(right, node);
            }
            split_done = true;
        } else {
            let copy = tree.deep_copy(t);
            tree.append(left, copy);
        }
        before += len;
    }

    if tree.find_child(left, Some(ns::W), "t").is_none() {
        let empty = text_element(tree, "", false);
        tree.append(left, empty);
    }
    (left, right)
}

/// Prune empty text nodes, content-less runs and revision wrappers that lost
/// every run. Runs carrying a comment reference are content and survive.
pub fn normalize_paragraph(tree: &mut XmlTree, paragraph: NodeId) {
    for t in tree.descendants_named(paragraph, Some(ns::W), "t") {
        if tree.text_content(t).is_empty() {
            tree.detach(t);
        }
    }
    for run in tree.descendants_named(paragraph, Some(ns::W), "r") {
        let children = tree.children(run);
        if children
            .iter()
            .all(|&c| tree.is_named(c, Some(ns::W), "rPr"))
        {
            tree.detach(run);
        }
    }
    for wrapper in ["ins", "del"] {
        for marker in tree.descendants_named(paragraph, Some(ns::W), wrapper) {
            if tree.children(marker).is_empty() {
                tree.detach(marker);
            }
        }
    }
}

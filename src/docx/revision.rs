//! Track-changes markup: `w:ins`/`w:del` wrappers, change-record ids, and
//! the interaction between deletion markers and comment anchors.

use indextree::NodeId;

use crate::xml::{XmlTree, ns};

/// Next free id for one kind of revision element (`ins`, `del`, `pPrChange`,
/// `rPrChange`). Ids are scoped per kind; the whole tree is rescanned on
/// every allocation so ids stay unique however the document was produced.
pub fn next_revision_id(tree: &XmlTree, kind: &str) -> u32 {
    tree.descendants_named(tree.root(), Some(ns::W), kind)
        .iter()
        .filter_map(|&n| tree.attr(n, Some(ns::W), "id"))
        .filter_map(|v| v.parse::<u32>().ok())
        .max()
        .unwrap_or(0)
        + 1
}

pub fn revision_mark(
    tree: &mut XmlTree,
    kind: &str,
    id: u32,
    author: &str,
    date: &str,
) -> NodeId {
    let mark = tree.new_element(Some(ns::W), kind);
    tree.set_attr(mark, Some(ns::W), "id", &id.to_string());
    tree.set_attr(mark, Some(ns::W), "author", author);
    tree.set_attr(mark, Some(ns::W), "date", date);
    mark
}

/// Copy of `run` with every `w:t` converted to `w:delText`, for placement
/// inside a deletion marker. Formatting is duplicated, not shared.
pub fn deleted_copy(tree: &mut XmlTree, run: NodeId) -> NodeId {
    let copy = tree.new_element(Some(ns::W), "r");
    if let Some(rpr) = tree.find_child(run, Some(ns::W), "rPr") {
        let rpr_copy = tree.deep_copy(rpr);
        tree.append(copy, rpr_copy);
    }
    for t in tree.descendants_named(run, Some(ns::W), "t") {
        let text = tree.text_content(t);
        let del_text = tree.new_element(Some(ns::W), "delText");
        tree.set_attr(del_text, Some(ns::XML), "space", "preserve");
        if !text.is_empty() {
            let content = tree.new_text(&text);
            tree.append(del_text, content);
        }
        tree.append(copy, del_text);
    }
    copy
}

pub fn is_inside_insertion(tree: &XmlTree, run: NodeId) -> bool {
    tree.ancestor_named(run, Some(ns::W), "ins").is_some()
}

/// After a tracked deletion, pull anchor markers into the adjacent deletion
/// marker so the anchored span keeps covering the struck text: an
/// anchor-start immediately before a `w:del` moves to its front, an
/// anchor-end immediately after one moves to its back.
pub fn merge_anchors_into_deletions(tree: &mut XmlTree, paragraph: NodeId) {
    for start in tree.descendants_named(paragraph, Some(ns::W), "commentRangeStart") {
        if let Some(next) = tree.next_sibling(start) {
            if tree.is_named(next, Some(ns::W), "del") {
                tree.detach(start);
                tree.prepend(next, start);
            }
        }
    }
    for end in tree.descendants_named(paragraph, Some(ns::W), "commentRangeEnd") {
        if let Some(prev) = tree.prev_sibling(end) {
            if tree.is_named(prev, Some(ns::W), "del") {
                tree.detach(end);
                tree.append(prev, end);
            }
        }
    }
}

/// After a destructive deletion, drop anchor pairs whose span collapsed to
/// nothing: a start immediately followed by its matching end.
pub fn drop_empty_anchor_pairs(tree: &mut XmlTree, paragraph: NodeId) {
    for start in tree.descendants_named(paragraph, Some(ns::W), "commentRangeStart") {
        let Some(id) = tree.attr(start, Some(ns::W), "id").map(str::to_string) else {
            continue;
        };
        let Some(next) = tree.next_sibling(start) else {
            continue;
        };
        if tree.is_named(next, Some(ns::W), "commentRangeEnd")
            && tree.attr(next, Some(ns::W), "id") == Some(id.as_str())
        {
            log::debug!("removing collapsed comment anchor {id}");
            tree.detach(start);
            tree.detach(next);
        }
    }
}

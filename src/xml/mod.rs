//! Mutable XML tree for WordprocessingML parts.
//!
//! Parts are parsed with `roxmltree` and loaded into an `indextree` arena so
//! that edits get O(1) parent and sibling access instead of recursive
//! identity searches. Serialization re-emits the namespace declarations seen
//! on the parsed root and adds any that new nodes require.

pub mod ns;

use indextree::{Arena, NodeId};

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QName {
    pub ns: Option<String>,
    pub local: String,
}

impl QName {
    pub fn new(ns: Option<&str>, local: &str) -> Self {
        QName {
            ns: ns.map(str::to_string),
            local: local.to_string(),
        }
    }

    pub fn is(&self, ns: Option<&str>, local: &str) -> bool {
        self.local == local && self.ns.as_deref() == ns
    }
}

#[derive(Debug, Clone)]
pub struct Attr {
    pub name: QName,
    pub value: String,
}

#[derive(Debug, Clone)]
pub enum XmlNode {
    Element { name: QName, attrs: Vec<Attr> },
    Text(String),
}

pub struct XmlTree {
    arena: Arena<XmlNode>,
    root: NodeId,
    /// (prefix, uri) declarations captured from the parsed root element.
    /// The empty prefix is the default namespace.
    decls: Vec<(String, String)>,
}

impl XmlTree {
    pub fn parse(text: &str) -> Result<Self, Error> {
        let doc = roxmltree::Document::parse(text)?;
        let src_root = doc.root_element();

        let mut arena = Arena::new();
        let root = convert(&mut arena, src_root);

        let decls = src_root
            .namespaces()
            .filter(|n| n.uri() != ns::XML)
            .map(|n| (n.name().unwrap_or("").to_string(), n.uri().to_string()))
            .collect();

        Ok(XmlTree { arena, root, decls })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn new_element(&mut self, ns_uri: Option<&str>, local: &str) -> NodeId {
        self.arena.new_node(XmlNode::Element {
            name: QName::new(ns_uri, local),
            attrs: Vec::new(),
        })
    }

    pub fn new_text(&mut self, text: &str) -> NodeId {
        self.arena.new_node(XmlNode::Text(text.to_string()))
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.arena[id].get(), XmlNode::Element { .. })
    }

    pub fn is_named(&self, id: NodeId, ns_uri: Option<&str>, local: &str) -> bool {
        match self.arena[id].get() {
            XmlNode::Element { name, .. } => name.is(ns_uri, local),
            XmlNode::Text(_) => false,
        }
    }

    pub fn name(&self, id: NodeId) -> Option<&QName> {
        match self.arena[id].get() {
            XmlNode::Element { name, .. } => Some(name),
            XmlNode::Text(_) => None,
        }
    }

    pub fn attr(&self, id: NodeId, ns_uri: Option<&str>, local: &str) -> Option<&str> {
        match self.arena[id].get() {
            XmlNode::Element { attrs, .. } => attrs
                .iter()
                .find(|a| a.name.is(ns_uri, local))
                .map(|a| a.value.as_str()),
            XmlNode::Text(_) => None,
        }
    }

    pub fn set_attr(&mut self, id: NodeId, ns_uri: Option<&str>, local: &str, value: &str) {
        if let XmlNode::Element { attrs, .. } = self.arena[id].get_mut() {
            if let Some(a) = attrs.iter_mut().find(|a| a.name.is(ns_uri, local)) {
                a.value = value.to_string();
            } else {
                attrs.push(Attr {
                    name: QName::new(ns_uri, local),
                    value: value.to_string(),
                });
            }
        }
    }

    pub fn node_text(&self, id: NodeId) -> Option<&str> {
        match self.arena[id].get() {
            XmlNode::Text(t) => Some(t),
            XmlNode::Element { .. } => None,
        }
    }

    /// Replace the text content of an element with a single text node.
    pub fn set_element_text(&mut self, id: NodeId, text: &str) {
        for child in self.children(id) {
            if self.node_text(child).is_some() {
                self.detach(child);
            }
        }
        if !text.is_empty() {
            let t = self.new_text(text);
            self.append(id, t);
        }
    }

    /// Concatenated text of every text node under `id`, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for n in id.descendants(&self.arena) {
            if let XmlNode::Text(t) = self.arena[n].get() {
                out.push_str(t);
            }
        }
        out
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].parent()
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].next_sibling()
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].previous_sibling()
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        id.children(&self.arena).collect()
    }

    pub fn child_elements(&self, id: NodeId) -> Vec<NodeId> {
        id.children(&self.arena)
            .filter(|&c| self.is_element(c))
            .collect()
    }

    /// First direct child element with the given name.
    pub fn find_child(&self, id: NodeId, ns_uri: Option<&str>, local: &str) -> Option<NodeId> {
        id.children(&self.arena)
            .find(|&c| self.is_named(c, ns_uri, local))
    }

    /// Every element with the given name under `id` (excluding `id`), in
    /// document order.
    pub fn descendants_named(
        &self,
        id: NodeId,
        ns_uri: Option<&str>,
        local: &str,
    ) -> Vec<NodeId> {
        id.descendants(&self.arena)
            .skip(1)
            .filter(|&n| self.is_named(n, ns_uri, local))
            .collect()
    }

    /// Nearest strict ancestor with the given name.
    pub fn ancestor_named(&self, id: NodeId, ns_uri: Option<&str>, local: &str) -> Option<NodeId> {
        id.ancestors(&self.arena)
            .skip(1)
            .find(|&n| self.is_named(n, ns_uri, local))
    }

    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        parent.append(child, &mut self.arena);
    }

    pub fn prepend(&mut self, parent: NodeId, child: NodeId) {
        parent.prepend(child, &mut self.arena);
    }

    pub fn insert_after(&mut self, anchor: NodeId, node: NodeId) {
        anchor.insert_after(node, &mut self.arena);
    }

    /// Detach `id` (with its subtree) from its parent. The subtree stays in
    /// the arena and can be re-inserted elsewhere.
    pub fn detach(&mut self, id: NodeId) {
        id.detach(&mut self.arena);
    }

    pub fn deep_copy(&mut self, id: NodeId) -> NodeId {
        let data = self.arena[id].get().clone();
        let copy = self.arena.new_node(data);
        let children: Vec<NodeId> = id.children(&self.arena).collect();
        for child in children {
            let child_copy = self.deep_copy(child);
            copy.append(child_copy, &mut self.arena);
        }
        copy
    }

    pub fn to_xml_string(&self) -> String {
        let mut decls = self.decls.clone();
        for uri in self.used_namespaces() {
            if uri == ns::XML || decls.iter().any(|(_, u)| *u == uri) {
                continue;
            }
            let prefix = ns::prefix_for(&uri).unwrap_or("x");
            decls.push((prefix.to_string(), uri));
        }

        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n");
        self.write_node(self.root, &decls, true, &mut out);
        out
    }

    fn used_namespaces(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for n in self.root.descendants(&self.arena) {
            if let XmlNode::Element { name, attrs } = self.arena[n].get() {
                if let Some(u) = &name.ns {
                    if !seen.contains(u) {
                        seen.push(u.clone());
                    }
                }
                for a in attrs {
                    if let Some(u) = &a.name.ns {
                        if !seen.contains(u) {
                            seen.push(u.clone());
                        }
                    }
                }
            }
        }
        seen
    }

    fn prefixed(&self, name: &QName, decls: &[(String, String)]) -> String {
        let Some(uri) = &name.ns else {
            return name.local.clone();
        };
        if uri == ns::XML {
            return format!("xml:{}", name.local);
        }
        let prefix = decls
            .iter()
            .find(|(_, u)| u == uri)
            .map(|(p, _)| p.as_str())
            .or_else(|| ns::prefix_for(uri))
            .unwrap_or("x");
        if prefix.is_empty() {
            name.local.clone()
        } else {
            format!("{}:{}", prefix, name.local)
        }
    }

    fn write_node(&self, id: NodeId, decls: &[(String, String)], is_root: bool, out: &mut String) {
        match self.arena[id].get() {
            XmlNode::Text(t) => escape_text(t, out),
            XmlNode::Element { name, attrs } => {
                let tag = self.prefixed(name, decls);
                out.push('<');
                out.push_str(&tag);
                if is_root {
                    for (prefix, uri) in decls {
                        if prefix.is_empty() {
                            out.push_str(" xmlns=\"");
                        } else {
                            out.push_str(" xmlns:");
                            out.push_str(prefix);
                            out.push_str("=\"");
                        }
                        escape_attr(uri, out);
                        out.push('"');
                    }
                }
                for a in attrs {
                    out.push(' ');
                    out.push_str(&self.prefixed(&a.name, decls));
                    out.push_str("=\"");
                    escape_attr(&a.value, out);
                    out.push('"');
                }
                let children: Vec<NodeId> = id.children(&self.arena).collect();
                if children.is_empty() {
                    out.push_str("/>");
                } else {
                    out.push('>');
                    for child in children {
                        self.write_node(child, decls, false, out);
                    }
                    out.push_str("</");
                    out.push_str(&tag);
                    out.push('>');
                }
            }
        }
    }
}

fn convert(arena: &mut Arena<XmlNode>, src: roxmltree::Node) -> NodeId {
    let name = QName::new(src.tag_name().namespace(), src.tag_name().name());
    let attrs = src
        .attributes()
        .map(|a| Attr {
            name: QName::new(a.namespace(), a.name()),
            value: a.value().to_string(),
        })
        .collect();
    let id = arena.new_node(XmlNode::Element { name, attrs });

    let preserve = src.attribute((ns::XML, "space")) == Some("preserve");
    for child in src.children() {
        if child.is_element() {
            let child_id = convert(arena, child);
            id.append(child_id, arena);
        } else if child.is_text() {
            let text = child.text().unwrap_or("");
            // Inter-element indentation is insignificant unless the element
            // opted into whitespace preservation.
            if preserve || !text.trim().is_empty() {
                let t = arena.new_node(XmlNode::Text(text.to_string()));
                id.append(t, arena);
            }
        }
    }
    id
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn escape_attr(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#10;"),
            '\t' => out.push_str("&#9;"),
            _ => out.push(c),
        }
    }
}

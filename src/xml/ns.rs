//! Namespace URIs used by WordprocessingML parts, and the canonical prefixes
//! the host word processor expects when they are serialized.

pub const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub const W14: &str = "http://schemas.microsoft.com/office/word/2010/wordml";
pub const W15: &str = "http://schemas.microsoft.com/office/word/2012/wordml";
pub const R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub const MC: &str = "http://schemas.openxmlformats.org/markup-compatibility/2006";
pub const PKG_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
pub const XML: &str = "http://www.w3.org/XML/1998/namespace";

/// Canonical prefix for a namespace URI. The `xml` prefix is implicit and is
/// never re-declared on a root element.
pub fn prefix_for(uri: &str) -> Option<&'static str> {
    match uri {
        W => Some("w"),
        W14 => Some("w14"),
        W15 => Some("w15"),
        R => Some("r"),
        MC => Some("mc"),
        PKG_RELS => Some(""),
        XML => Some("xml"),
        _ => None,
    }
}

//! Paragraph id allocation.
//!
//! Comment bodies carry a `w14:paraId` that must not collide with any
//! paragraph id anywhere in the package. The generator seeds itself from
//! every part that can contain paragraphs and then issues ids disjoint from
//! the seed set and from everything issued earlier in the session.

use std::collections::HashSet;

use crate::package::{self, Package};
use crate::xml::ns;

pub struct ParaIdGenerator {
    seen: HashSet<String>,
    next: u32,
}

impl ParaIdGenerator {
    pub fn seed(package: &Package) -> Self {
        let mut parts: Vec<String> = vec![
            package::DOCUMENT.to_string(),
            package::COMMENTS.to_string(),
            package::FOOTNOTES.to_string(),
        ];
        parts.extend(package.word_parts_with_prefix("header"));
        parts.extend(package.word_parts_with_prefix("footer"));

        let mut seen = HashSet::new();
        for name in parts {
            let Ok(text) = package.part_str(&name) else {
                continue;
            };
            let Ok(doc) = roxmltree::Document::parse(text) else {
                log::warn!("could not parse {name} while seeding paragraph ids");
                continue;
            };
            for node in doc.descendants() {
                if node.tag_name().name() == "p" && node.tag_name().namespace() == Some(ns::W) {
                    if let Some(id) = node.attribute((ns::W14, "paraId")) {
                        seen.insert(id.to_ascii_uppercase());
                    }
                }
            }
        }
        log::debug!("seeded {} existing paragraph ids", seen.len());
        ParaIdGenerator { seen, next: 1 }
    }

    /// Issue a fresh 8-digit hex id. Issued ids join the seed set so a
    /// generator never repeats itself either.
    pub fn next_id(&mut self) -> String {
        loop {
            let candidate = format!("{:08X}", self.next);
            self.next = self.next.wrapping_add(1);
            if self.seen.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

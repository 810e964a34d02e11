//! Autonumber rendering for list paragraphs.
//!
//! The numbering part maps abstract definitions to (list id, level) entries:
//! a format family, a level-text template with a `%<level+1>` placeholder,
//! and a start value. Counters advance on every render, so reading a label
//! is deliberately not idempotent — the operation is named accordingly.

use std::collections::HashMap;

use indextree::NodeId;

use crate::error::Error;
use crate::package::{self, Package};
use crate::xml::{XmlTree, ns};

struct LevelDef {
    num_fmt: String,
    lvl_text: String,
    start: u32,
}

pub struct Numbering {
    abstract_nums: HashMap<String, HashMap<u8, LevelDef>>,
    num_to_abstract: HashMap<String, String>,
    counters: HashMap<(String, u8), u32>,
}

fn wml<'a>(node: roxmltree::Node<'a, 'a>, name: &str) -> Option<roxmltree::Node<'a, 'a>> {
    node.children()
        .find(|n| n.tag_name().name() == name && n.tag_name().namespace() == Some(ns::W))
}

fn wml_val<'a>(node: roxmltree::Node<'a, 'a>, child: &str) -> Option<&'a str> {
    wml(node, child).and_then(|n| n.attribute((ns::W, "val")))
}

impl Numbering {
    pub fn parse(package: &Package) -> Result<Self, Error> {
        let mut numbering = Numbering {
            abstract_nums: HashMap::new(),
            num_to_abstract: HashMap::new(),
            counters: HashMap::new(),
        };
        if !package.has_part(package::NUMBERING) {
            log::debug!("no numbering part; autonumber labels disabled");
            return Ok(numbering);
        }
        let text = package.part_str(package::NUMBERING)?;
        let doc = roxmltree::Document::parse(text)?;
        let root = doc.root_element();

        for abstract_num in root
            .children()
            .filter(|n| n.tag_name().name() == "abstractNum" && n.tag_name().namespace() == Some(ns::W))
        {
            let Some(abstract_id) = abstract_num.attribute((ns::W, "abstractNumId")) else {
                continue;
            };
            let mut levels = HashMap::new();
            for lvl in abstract_num
                .children()
                .filter(|n| n.tag_name().name() == "lvl" && n.tag_name().namespace() == Some(ns::W))
            {
                let Some(ilvl) = lvl
                    .attribute((ns::W, "ilvl"))
                    .and_then(|v| v.parse::<u8>().ok())
                else {
                    continue;
                };
                let (Some(num_fmt), Some(lvl_text)) = (wml_val(lvl, "numFmt"), wml_val(lvl, "lvlText"))
                else {
                    continue;
                };
                let start = wml_val(lvl, "start")
                    .and_then(|v| v.parse::<u32>().ok())
                    .unwrap_or(1);
                levels.insert(
                    ilvl,
                    LevelDef {
                        num_fmt: num_fmt.to_string(),
                        lvl_text: lvl_text.to_string(),
                        start,
                    },
                );
            }
            if !levels.is_empty() {
                numbering
                    .abstract_nums
                    .insert(abstract_id.to_string(), levels);
            }
        }

        for num in root
            .children()
            .filter(|n| n.tag_name().name() == "num" && n.tag_name().namespace() == Some(ns::W))
        {
            let Some(num_id) = num.attribute((ns::W, "numId")) else {
                continue;
            };
            if let Some(abstract_id) = wml_val(num, "abstractNumId") {
                numbering
                    .num_to_abstract
                    .insert(num_id.to_string(), abstract_id.to_string());
            }
        }

        // counters begin at each level's declared start
        for (num_id, abstract_id) in &numbering.num_to_abstract {
            if let Some(levels) = numbering.abstract_nums.get(abstract_id) {
                for (&ilvl, def) in levels {
                    numbering.counters.insert((num_id.clone(), ilvl), def.start);
                }
            }
        }
        log::debug!(
            "parsed numbering: {} lists over {} abstract definitions",
            numbering.num_to_abstract.len(),
            numbering.abstract_nums.len()
        );
        Ok(numbering)
    }

    /// The (list id, level) reference of a paragraph, if it is numbered.
    pub fn paragraph_reference(tree: &XmlTree, paragraph: NodeId) -> Option<(String, u8)> {
        let ppr = tree.find_child(paragraph, Some(ns::W), "pPr")?;
        let num_pr = tree.find_child(ppr, Some(ns::W), "numPr")?;
        let num_id = tree
            .find_child(num_pr, Some(ns::W), "numId")
            .and_then(|n| tree.attr(n, Some(ns::W), "val"))?
            .to_string();
        let ilvl = tree
            .find_child(num_pr, Some(ns::W), "ilvl")
            .and_then(|n| tree.attr(n, Some(ns::W), "val"))
            .and_then(|v| v.parse::<u8>().ok())?;
        Some((num_id, ilvl))
    }

    /// Render the next label for (list, level) and advance that counter.
    /// `None` when the list or level has no definition.
    pub fn advance(&mut self, num_id: &str, level: u8) -> Option<String> {
        let abstract_id = self.num_to_abstract.get(num_id)?;
        let def = self.abstract_nums.get(abstract_id)?.get(&level)?;
        let counter = self
            .counters
            .entry((num_id.to_string(), level))
            .or_insert(def.start);
        let ordinal = render_ordinal(&def.num_fmt, *counter);
        let placeholder = format!("%{}", level + 1);
        let label = def.lvl_text.replace(&placeholder, &ordinal);
        *counter += 1;
        Some(label)
    }

}

const CJK_COUNTING: [&str; 21] = [
    "零", "一", "二", "三", "四", "五", "六", "七", "八", "九", "十", "十一", "十二", "十三",
    "十四", "十五", "十六", "十七", "十八", "十九", "二十",
];

const CIRCLED_CJK: [&str; 20] = [
    "①", "②", "③", "④", "⑤", "⑥", "⑦", "⑧", "⑨", "⑩", "⑪", "⑫", "⑬", "⑭", "⑮", "⑯", "⑰",
    "⑱", "⑲", "⑳",
];

const LOWER_ROMAN: [&str; 21] = [
    "", "i", "ii", "iii", "iv", "v", "vi", "vii", "viii", "ix", "x", "xi", "xii", "xiii", "xiv",
    "xv", "xvi", "xvii", "xviii", "xix", "xx",
];

/// Render `n` (1-based) in a numbering format family. Values past a family's
/// table and unknown families fall back to decimal.
fn render_ordinal(num_fmt: &str, n: u32) -> String {
    match num_fmt {
        "lowerLetter" if (1..=26).contains(&n) => {
            char::from(b'a' + (n as u8 - 1)).to_string()
        }
        "lowerRoman" if (1..21).contains(&n) => LOWER_ROMAN[n as usize].to_string(),
        "chineseCounting" | "chineseCountingThousand" | "japaneseCounting"
            if (1..=20).contains(&n) =>
        {
            CJK_COUNTING[n as usize].to_string()
        }
        "decimalEnclosedCircleChinese" if (1..=20).contains(&n) => {
            CIRCLED_CJK[(n - 1) as usize].to_string()
        }
        _ => n.to_string(),
    }
}

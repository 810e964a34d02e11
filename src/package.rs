//! In-memory DOCX package: the ZIP container unpacked into a part store.
//!
//! The engine mutates parts through parse/serialize round-trips against this
//! store; the container itself is only rewritten by an explicit save.

use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::Error;
use crate::xml::XmlTree;

pub const DOCUMENT: &str = "word/document.xml";
pub const COMMENTS: &str = "word/comments.xml";
pub const COMMENTS_EXTENDED: &str = "word/commentsExtended.xml";
pub const STYLES: &str = "word/styles.xml";
pub const NUMBERING: &str = "word/numbering.xml";
pub const FOOTNOTES: &str = "word/footnotes.xml";
pub const DOCUMENT_RELS: &str = "word/_rels/document.xml.rels";

pub struct Package {
    parts: BTreeMap<String, Vec<u8>>,
}

impl Package {
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut parts = BTreeMap::new();
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            if entry.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut data)?;
            parts.insert(entry.name().to_string(), data);
        }
        log::debug!("loaded package with {} parts", parts.len());
        Ok(Package { parts })
    }

    pub fn has_part(&self, name: &str) -> bool {
        self.parts.contains_key(name)
    }

    pub fn part_str(&self, name: &str) -> Result<&str, Error> {
        let bytes = self
            .parts
            .get(name)
            .ok_or_else(|| Error::MissingPart(name.to_string()))?;
        std::str::from_utf8(bytes).map_err(|_| Error::PartEncoding(name.to_string()))
    }

    /// Parse a part into a mutable tree. Absent part is an error; callers
    /// that bootstrap a part must put it first.
    pub fn xml_part(&self, name: &str) -> Result<XmlTree, Error> {
        XmlTree::parse(self.part_str(name)?)
    }

    pub fn put_part(&mut self, name: &str, data: Vec<u8>) {
        self.parts.insert(name.to_string(), data);
    }

    pub fn put_xml_part(&mut self, name: &str, tree: &XmlTree) {
        self.parts
            .insert(name.to_string(), tree.to_xml_string().into_bytes());
    }

    /// Part names in the `word/` directory matching a filename prefix, e.g.
    /// every `header<n>.xml`.
    pub fn word_parts_with_prefix(&self, prefix: &str) -> Vec<String> {
        let full = format!("word/{prefix}");
        self.parts
            .keys()
            .filter(|name| name.starts_with(&full) && name.ends_with(".xml"))
            .cloned()
            .collect()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for (name, data) in &self.parts {
            writer.start_file(name.as_str(), options)?;
            writer.write_all(data)?;
        }
        let cursor = writer.finish()?;
        Ok(cursor.into_inner())
    }

    pub fn write_to(&self, path: &Path) -> Result<(), Error> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        log::debug!("wrote package to {}", path.display());
        Ok(())
    }
}

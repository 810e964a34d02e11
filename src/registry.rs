//! One editor per document.
//!
//! Concurrent edits against the same file race last-writer-wins, so callers
//! that touch a document from more than one place must share a single
//! editor. The registry owns editors keyed by canonical path and hands out
//! exclusive borrows; two live handles to one document cannot exist.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::docx::DocxEditor;
use crate::error::Error;

#[derive(Default)]
pub struct DocumentRegistry {
    open: HashMap<PathBuf, DocxEditor>,
}

impl DocumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the editor for `path`, opening it on first use. Repeated calls
    /// with any spelling of the same canonical path yield the same editor.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<&mut DocxEditor, Error> {
        let canonical = std::fs::canonicalize(path.as_ref())?;
        match self.open.entry(canonical) {
            std::collections::hash_map::Entry::Occupied(entry) => Ok(entry.into_mut()),
            std::collections::hash_map::Entry::Vacant(entry) => {
                let editor = DocxEditor::open(entry.key())?;
                Ok(entry.insert(editor))
            }
        }
    }

    pub fn is_open(&self, path: impl AsRef<Path>) -> bool {
        std::fs::canonicalize(path.as_ref())
            .map(|p| self.open.contains_key(&p))
            .unwrap_or(false)
    }

    /// Drop the editor for `path`, returning it so the caller can decide to
    /// save pending work first.
    pub fn close(&mut self, path: impl AsRef<Path>) -> Option<DocxEditor> {
        let canonical = std::fs::canonicalize(path.as_ref()).ok()?;
        self.open.remove(&canonical)
    }
}

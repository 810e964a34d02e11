mod docx;
mod error;
mod package;
mod registry;
mod task;
mod xml;

pub use docx::styles::{
    Alignment, CharacterStyle, FontSet, NumberingRef, ParagraphStyle, SectionProperties,
    StyleCategory,
};
pub use docx::{CommentDraft, DEFAULT_AUTHOR, DocxEditor};
pub use error::Error;
pub use registry::DocumentRegistry;
pub use task::{Task, TaskOutcome, TaskRequest};

use std::path::Path;
use std::time::Instant;

/// Run a batch of review edits against a document and write it back in
/// place. Convenience wrapper for pipeline callers that do not need to keep
/// the editor around.
pub fn run_tasks_on(path: &Path, tasks: &mut [Task]) -> Result<(), Error> {
    let t0 = Instant::now();

    let mut editor = DocxEditor::open(path)?;
    editor.run_tasks(tasks);
    editor.save()?;

    let done = tasks.iter().filter(|t| t.succeeded()).count();
    log::info!(
        "Applied {done}/{} tasks to {} in {:.1}ms",
        tasks.len(),
        path.display(),
        t0.elapsed().as_secs_f64() * 1000.0,
    );

    Ok(())
}

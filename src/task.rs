//! Edit requests as data.
//!
//! The review pipeline computes edits against plain paragraph text and hands
//! them over as tasks; the dispatcher routes each variant to its engine
//! operation and records the outcome in place. Failures are recorded, never
//! panicked, so one bad edit does not sink a batch.

use crate::docx::styles::ParagraphStyle;
use crate::docx::{CommentDraft, DocxEditor};
use crate::error::Error;

#[derive(Debug, Clone)]
pub enum TaskRequest {
    Delete {
        paragraph: usize,
        start: usize,
        end: usize,
        tracked: bool,
    },
    Insert {
        paragraph: usize,
        offset: usize,
        text: String,
        tracked: bool,
    },
    AddComment {
        paragraph: usize,
        start: usize,
        end: usize,
        comment: CommentDraft,
    },
    ApplyStyle {
        paragraph: usize,
        template: ParagraphStyle,
        tracked: bool,
    },
    CheckStyle {
        paragraph: usize,
        template: ParagraphStyle,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    Pending,
    Success,
    Failed,
    /// Apply-style also reports the resulting paragraph snapshot.
    StyleApplied(ParagraphStyle),
    StyleChecked(bool),
}

#[derive(Debug, Clone)]
pub struct Task {
    pub request: TaskRequest,
    pub outcome: TaskOutcome,
}

impl Task {
    pub fn new(request: TaskRequest) -> Self {
        Task {
            request,
            outcome: TaskOutcome::Pending,
        }
    }

    pub fn succeeded(&self) -> bool {
        matches!(
            self.outcome,
            TaskOutcome::Success | TaskOutcome::StyleApplied(_) | TaskOutcome::StyleChecked(true)
        )
    }
}

impl DocxEditor {
    /// Run one task, recording its outcome. Errors become `Failed`.
    pub fn run_task(&mut self, task: &mut Task) {
        let result: Result<TaskOutcome, Error> = match &task.request {
            TaskRequest::Delete {
                paragraph,
                start,
                end,
                tracked,
            } => self
                .delete(*paragraph, *start, *end, *tracked)
                .map(|()| TaskOutcome::Success),
            TaskRequest::Insert {
                paragraph,
                offset,
                text,
                tracked,
            } => {
                let text = text.clone();
                self.insert(*paragraph, *offset, &text, *tracked)
                    .map(|()| TaskOutcome::Success)
            }
            TaskRequest::AddComment {
                paragraph,
                start,
                end,
                comment,
            } => {
                let comment = comment.clone();
                self.add_comment(*paragraph, *start, *end, comment)
                    .map(|_| TaskOutcome::Success)
            }
            TaskRequest::ApplyStyle {
                paragraph,
                template,
                tracked,
            } => {
                let template = template.clone();
                self.apply_style(*paragraph, &template, *tracked)
                    .map(TaskOutcome::StyleApplied)
            }
            TaskRequest::CheckStyle {
                paragraph,
                template,
            } => {
                let template = template.clone();
                self.check_style(*paragraph, &template)
                    .map(TaskOutcome::StyleChecked)
            }
        };
        task.outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                log::warn!("task failed: {e}");
                TaskOutcome::Failed
            }
        };
    }

    pub fn run_tasks(&mut self, tasks: &mut [Task]) {
        for task in tasks {
            self.run_task(task);
        }
    }
}

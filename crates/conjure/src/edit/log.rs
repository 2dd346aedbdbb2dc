//! Append-only record of applied edits.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::question::QuestionSet;

use super::operation::EditOperation;

/// One applied operation.
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Position in the log, starting at 1.
    pub sequence: usize,
    /// When the operation was applied.
    pub applied_at: DateTime<Utc>,
    pub operation: EditOperation,
}

/// Ordered sequence of successfully applied operations.
///
/// Replaying the log against the set it started from reproduces the
/// current set exactly.
#[derive(Debug, Clone, Default)]
pub struct EditLog {
    entries: Vec<LogEntry>,
}

impl EditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an operation that has already been applied.
    pub(crate) fn push(&mut self, operation: EditOperation) {
        self.entries.push(LogEntry {
            sequence: self.entries.len() + 1,
            applied_at: Utc::now(),
            operation,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Operations in the order they were applied.
    pub fn operations(&self) -> impl Iterator<Item = &EditOperation> {
        self.entries.iter().map(|e| &e.operation)
    }

    /// Human-readable descriptions, one per entry.
    pub fn descriptions(&self) -> Vec<String> {
        self.operations().map(EditOperation::description).collect()
    }

    /// Re-apply every operation, in order, to a copy of `base`.
    pub fn replay(&self, base: &QuestionSet) -> Result<QuestionSet> {
        let mut questions = base.clone();
        for operation in self.operations() {
            questions.apply(operation)?;
        }
        Ok(questions)
    }
}

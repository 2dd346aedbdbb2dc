//! The editable working state between inference and materialization.

use std::fmt;
use std::sync::Arc;

use crate::edit::{EditFunction, EditLog, EditOperation, QuestionEditing};
use crate::error::Result;
use crate::input::SourceMetadata;
use crate::materialize::{Materializer, Results, ResultsOptions, Survey};
use crate::question::QuestionSet;

/// A question set under edit, with the log of how it got there.
///
/// Editing methods come from [`QuestionEditing`]: the `with_*` forms (and
/// [`QuestionEditing::drop`]) return a new session and leave this one alone;
/// the others change this session and return it for chaining. Cloning copies
/// the questions and the log; the inferred baseline, source metadata and
/// materializer are read-only and shared.
#[derive(Clone)]
pub struct ConjureSession {
    source: Option<Arc<SourceMetadata>>,
    inferred: Arc<QuestionSet>,
    questions: QuestionSet,
    log: EditLog,
    materializer: Arc<dyn Materializer>,
}

impl ConjureSession {
    /// Start a session from an inferred question set.
    pub fn new(questions: QuestionSet, materializer: Arc<dyn Materializer>) -> Self {
        Self {
            source: None,
            inferred: Arc::new(questions.clone()),
            questions,
            log: EditLog::new(),
            materializer,
        }
    }

    /// Start a session and immediately apply `edits`.
    ///
    /// The edits are logged exactly as a later
    /// [`QuestionEditing::apply_question_edits`] call would be.
    pub fn with_hook(
        questions: QuestionSet,
        materializer: Arc<dyn Materializer>,
        edits: EditFunction,
    ) -> Result<Self> {
        let mut session = Self::new(questions, materializer);
        session.apply_question_edits(edits)?;
        Ok(session)
    }

    pub fn with_source(mut self, source: SourceMetadata) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    pub fn source(&self) -> Option<&SourceMetadata> {
        self.source.as_deref()
    }

    /// The question set as inferred, before any edit.
    pub fn inferred(&self) -> &QuestionSet {
        &self.inferred
    }

    pub fn log(&self) -> &EditLog {
        &self.log
    }

    /// Rebuild the current questions from the inferred set and the log.
    pub fn replay(&self) -> Result<QuestionSet> {
        self.log.replay(&self.inferred)
    }

    /// Build the survey and results from the current questions.
    pub fn materialize(&self) -> Result<(Survey, Results)> {
        self.materializer.materialize(&self.questions)
    }

    pub fn to_survey(&self) -> Result<Survey> {
        Ok(self.materialize()?.0)
    }

    pub fn to_results(&self) -> Result<Results> {
        Ok(self.materialize()?.1)
    }

    /// Results for a subset of respondents.
    pub fn to_results_with(&self, options: &ResultsOptions) -> Result<Results> {
        self.to_results()?.select(options)
    }
}

impl QuestionEditing for ConjureSession {
    fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    fn apply_operation(&mut self, operation: EditOperation) -> Result<&mut Self> {
        self.questions.apply(&operation)?;
        self.log.push(operation);
        Ok(self)
    }
}

impl fmt::Debug for ConjureSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConjureSession")
            .field("source", &self.source.as_ref().map(|s| s.file.as_str()))
            .field("questions", &self.questions.names())
            .field("edits", &self.log.len())
            .finish_non_exhaustive()
    }
}

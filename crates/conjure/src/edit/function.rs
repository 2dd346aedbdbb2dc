//! Reusable edit functions applied as a single composite operation.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::question::QuestionSet;

type InPlaceFn = dyn Fn(&mut QuestionSet) -> Result<()> + Send + Sync;
type DeriveFn = dyn Fn(QuestionSet) -> Result<QuestionSet> + Send + Sync;

#[derive(Clone)]
enum Body {
    InPlace(Arc<InPlaceFn>),
    Derive(Arc<DeriveFn>),
}

/// A user-supplied sequence of edits.
///
/// The function receives a [`QuestionSet`] handle, which offers the same
/// editing methods as a session. It may either mutate the handle
/// ([`EditFunction::in_place`]) or return a derived one
/// ([`EditFunction::derive`]); both run to the same resulting set.
///
/// ```
/// use conjure::{EditFunction, FieldUpdates, QuestionEditing};
///
/// let cleanup = EditFunction::derive(|qs| {
///     qs.with_edited_question("morning", FieldUpdates::new().options(1..=10), &[])?
///         .with_renamed_question("morning", "confidence_level")
/// });
/// assert!(cleanup.label().is_none());
/// ```
#[derive(Clone)]
pub struct EditFunction {
    label: Option<String>,
    body: Body,
}

impl EditFunction {
    /// Wrap a function that edits the handle in place.
    pub fn in_place<F>(f: F) -> Self
    where
        F: Fn(&mut QuestionSet) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            label: None,
            body: Body::InPlace(Arc::new(f)),
        }
    }

    /// Wrap a function that returns a transformed handle.
    pub fn derive<F>(f: F) -> Self
    where
        F: Fn(QuestionSet) -> Result<QuestionSet> + Send + Sync + 'static,
    {
        Self {
            label: None,
            body: Body::Derive(Arc::new(f)),
        }
    }

    /// Attach a label shown in edit-log descriptions.
    pub fn named(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Run against an owned copy of the current questions.
    pub(crate) fn run(&self, questions: QuestionSet) -> Result<QuestionSet> {
        match &self.body {
            Body::InPlace(f) => {
                let mut questions = questions;
                f(&mut questions)?;
                Ok(questions)
            }
            Body::Derive(f) => f(questions),
        }
    }
}

impl fmt::Debug for EditFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let style = match self.body {
            Body::InPlace(_) => "in_place",
            Body::Derive(_) => "derive",
        };
        f.debug_struct("EditFunction")
            .field("label", &self.label)
            .field("style", &style)
            .finish()
    }
}

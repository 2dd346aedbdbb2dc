//! The editing capability shared by question sets and sessions.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::question::{Field, QuestionSet};

use super::fields::FieldUpdates;
use super::function::EditFunction;
use super::operation::EditOperation;

/// Editing methods in two styles with one implementation.
///
/// Mutating methods (`edit_question`, `rename_question`, `rename_questions`,
/// `drop_questions`, `keep_questions`, `apply_question_edits`) change `self`
/// and hand back the same instance for chaining. Functional methods
/// (`with_edited_question`, `with_renamed_question`, `with_renamed_questions`,
/// `drop`, `keep`, `with_question_edits`) clone `self`, run the mutating
/// method on the clone and return it, leaving `self` untouched.
///
/// Implementors only provide [`QuestionEditing::questions`] and
/// [`QuestionEditing::apply_operation`].
pub trait QuestionEditing: Clone {
    /// The current questions.
    fn questions(&self) -> &QuestionSet;

    /// Apply one operation atomically.
    fn apply_operation(&mut self, operation: EditOperation) -> Result<&mut Self>;

    /// Overwrite fields of the question currently named `name`, then remove
    /// `pop_fields`.
    fn edit_question(
        &mut self,
        name: &str,
        updates: FieldUpdates,
        pop_fields: &[Field],
    ) -> Result<&mut Self> {
        let id = self.questions().resolve(name)?.clone();
        self.apply_operation(EditOperation::EditFields {
            id,
            updates,
            pop_fields: pop_fields.to_vec(),
        })
    }

    fn rename_question(&mut self, old_name: &str, new_name: &str) -> Result<&mut Self> {
        self.apply_operation(EditOperation::RenameQuestion {
            old_name: old_name.to_string(),
            new_name: new_name.to_string(),
        })
    }

    /// Rename several questions as one atomic step, in the given order.
    ///
    /// With `ignore_missing`, pairs whose old name is absent are skipped;
    /// otherwise they fail with `UnknownQuestion`.
    fn rename_questions<I, A, B>(&mut self, renames: I, ignore_missing: bool) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        let renames = renames
            .into_iter()
            .map(|(old, new)| (old.into(), new.into()))
            .collect();
        self.apply_operation(EditOperation::RenameQuestions {
            renames,
            ignore_missing,
        })
    }

    /// Drop questions by name; names that do not exist are ignored.
    ///
    /// Takes a collection of names, so a single question is dropped with
    /// `drop_questions(["last_name"])`.
    ///
    /// ```
    /// use conjure::{QuestionEditing, QuestionRecord, QuestionSet, QuestionType};
    ///
    /// let mut questions = QuestionSet::from_records([
    ///     QuestionRecord::new("q1", "first_name", QuestionType::FreeText, "First name"),
    ///     QuestionRecord::new("q2", "last_name", QuestionType::FreeText, "Last name"),
    /// ])?;
    /// questions.drop_questions(["last_name"])?;
    /// assert_eq!(questions.names(), vec!["first_name"]);
    /// # Ok::<(), conjure::ConjureError>(())
    /// ```
    fn drop_questions<I, S>(&mut self, names: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        self.apply_operation(EditOperation::DropQuestions { names })
    }

    /// Keep only the named questions, in their current order. Names that do
    /// not exist are ignored.
    fn keep_questions<I, S>(&mut self, names: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        self.apply_operation(EditOperation::KeepQuestions { names })
    }

    /// Run a composite edit function. If any step fails, nothing changes.
    fn apply_question_edits(&mut self, edits: EditFunction) -> Result<&mut Self> {
        self.apply_operation(EditOperation::ApplyFunction(edits))
    }

    fn with_edited_question(
        &self,
        name: &str,
        updates: FieldUpdates,
        pop_fields: &[Field],
    ) -> Result<Self> {
        let mut next = self.clone();
        next.edit_question(name, updates, pop_fields)?;
        Ok(next)
    }

    fn with_renamed_question(&self, old_name: &str, new_name: &str) -> Result<Self> {
        let mut next = self.clone();
        next.rename_question(old_name, new_name)?;
        Ok(next)
    }

    fn with_renamed_questions<I, A, B>(&self, renames: I, ignore_missing: bool) -> Result<Self>
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        let mut next = self.clone();
        next.rename_questions(renames, ignore_missing)?;
        Ok(next)
    }

    /// Functional counterpart of [`QuestionEditing::drop_questions`].
    fn drop<I, S>(&self, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut next = self.clone();
        next.drop_questions(names)?;
        Ok(next)
    }

    fn keep<I, S>(&self, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut next = self.clone();
        next.keep_questions(names)?;
        Ok(next)
    }

    fn with_question_edits(&self, edits: EditFunction) -> Result<Self> {
        let mut next = self.clone();
        next.apply_question_edits(edits)?;
        Ok(next)
    }
}

impl QuestionEditing for QuestionSet {
    fn questions(&self) -> &QuestionSet {
        self
    }

    fn apply_operation(&mut self, operation: EditOperation) -> Result<&mut Self> {
        self.apply(&operation)?;
        Ok(self)
    }
}

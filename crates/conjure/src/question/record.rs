//! A single question's editable attributes.

use serde::{Deserialize, Serialize};

use super::types::{OptionValue, QuestionId, QuestionType};

/// One inferred question.
///
/// Fields are only mutated by the edit engine, which keeps the set-level
/// invariants intact; outside the crate a record is read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// Stable identity (never changes).
    pub(crate) id: QuestionId,
    /// Current reference name, unique within a set.
    pub(crate) name: String,
    pub(crate) question_type: QuestionType,
    /// Prompt shown to respondents.
    pub(crate) question_text: String,
    /// Selectable options; `None` for types that forbid them.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub(crate) question_options: Option<Vec<OptionValue>>,
}

impl QuestionRecord {
    /// Create a record without options.
    pub fn new(
        id: impl Into<QuestionId>,
        name: impl Into<String>,
        question_type: QuestionType,
        question_text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            question_type,
            question_text: question_text.into(),
            question_options: None,
        }
    }

    /// Set the options (builder style, used while constructing sets).
    pub fn with_options<I, V>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<OptionValue>,
    {
        self.question_options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn question_type(&self) -> QuestionType {
        self.question_type
    }

    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    pub fn question_options(&self) -> Option<&[OptionValue]> {
        self.question_options.as_deref()
    }

    /// Check the type/options pairing of this record.
    pub(crate) fn consistency_error(&self) -> Option<String> {
        match (&self.question_options, self.question_type.is_choice()) {
            (Some(_), false) => Some(format!(
                "question '{}' is {} but has options",
                self.name, self.question_type
            )),
            (None, true) => Some(format!(
                "question '{}' is {} but has no options",
                self.name, self.question_type
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_builder() {
        let record = QuestionRecord::new("Q1", "morning", QuestionType::MultipleChoice, "How are you?")
            .with_options([1, 2, 3]);

        assert_eq!(record.id().as_str(), "Q1");
        assert_eq!(record.name(), "morning");
        assert_eq!(record.question_options().map(|o| o.len()), Some(3));
        assert!(record.consistency_error().is_none());
    }

    #[test]
    fn test_consistency_error() {
        let free = QuestionRecord::new("Q1", "notes", QuestionType::FreeText, "Notes")
            .with_options(["a"]);
        assert!(free.consistency_error().is_some());

        let choice = QuestionRecord::new("Q2", "pick", QuestionType::Checkbox, "Pick");
        assert!(choice.consistency_error().is_some());
    }

    #[test]
    fn test_options_skipped_when_absent() {
        let record = QuestionRecord::new("Q1", "notes", QuestionType::FreeText, "Notes");
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("question_options").is_none());
        assert_eq!(json["question_type"], "free_text");
    }
}

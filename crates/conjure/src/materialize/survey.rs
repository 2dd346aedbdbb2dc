//! The finalized survey definition.

use serde::Serialize;

use crate::question::{OptionValue, QuestionId, QuestionRecord, QuestionSet, QuestionType};

/// One finalized question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurveyQuestion {
    pub id: QuestionId,
    pub name: String,
    pub question_type: QuestionType,
    pub question_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_options: Option<Vec<OptionValue>>,
}

impl From<&QuestionRecord> for SurveyQuestion {
    fn from(record: &QuestionRecord) -> Self {
        Self {
            id: record.id().clone(),
            name: record.name().to_string(),
            question_type: record.question_type(),
            question_text: record.question_text().to_string(),
            question_options: record.question_options().map(<[OptionValue]>::to_vec),
        }
    }
}

/// Ordered questions, as they stood when the survey was built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Survey {
    questions: Vec<SurveyQuestion>,
}

impl Survey {
    pub fn from_questions(questions: &QuestionSet) -> Self {
        Self {
            questions: questions.iter().map(SurveyQuestion::from).collect(),
        }
    }

    pub fn questions(&self) -> &[SurveyQuestion] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn question(&self, name: &str) -> Option<&SurveyQuestion> {
        self.questions.iter().find(|q| q.name == name)
    }

    pub fn question_names(&self) -> Vec<&str> {
        self.questions.iter().map(|q| q.name.as_str()).collect()
    }

    /// The id behind a question name.
    pub fn id_for(&self, name: &str) -> Option<&QuestionId> {
        self.question(name).map(|q| &q.id)
    }
}

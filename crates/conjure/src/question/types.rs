//! Core type definitions for question representation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConjureError, Result};

/// Stable identity of a question, assigned at inference time from the
/// column it was read from. Never changes, never reused after a drop.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for QuestionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Kind of question, which decides whether options are meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// Pick exactly one option.
    MultipleChoice,
    /// Pick any number of options.
    Checkbox,
    /// Ordered numeric scale given as options.
    LinearScale,
    /// Open text answer.
    FreeText,
    /// Open numeric answer.
    Numeric,
}

impl QuestionType {
    /// All supported question types.
    pub const ALL: [QuestionType; 5] = [
        QuestionType::MultipleChoice,
        QuestionType::Checkbox,
        QuestionType::LinearScale,
        QuestionType::FreeText,
        QuestionType::Numeric,
    ];

    /// Returns true if this type is answered by choosing among options.
    /// Such types require `question_options`.
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            QuestionType::MultipleChoice | QuestionType::Checkbox | QuestionType::LinearScale
        )
    }

    /// Returns true if options must be absent for this type.
    pub fn forbids_options(&self) -> bool {
        !self.is_choice()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::Checkbox => "checkbox",
            QuestionType::LinearScale => "linear_scale",
            QuestionType::FreeText => "free_text",
            QuestionType::Numeric => "numeric",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = ConjureError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "multiple_choice" => Ok(QuestionType::MultipleChoice),
            "checkbox" => Ok(QuestionType::Checkbox),
            "linear_scale" => Ok(QuestionType::LinearScale),
            "free_text" => Ok(QuestionType::FreeText),
            "numeric" | "numerical" => Ok(QuestionType::Numeric),
            other => Err(ConjureError::invalid_field(
                "question_type",
                format!("question type '{}' is not available", other),
            )),
        }
    }
}

/// A single selectable option value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Integer(i64),
    Text(String),
}

impl OptionValue {
    /// Build an option from a raw response, keeping integers as integers.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<i64>() {
            Ok(n) => OptionValue::Integer(n),
            Err(_) => OptionValue::Text(trimmed.to_string()),
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            OptionValue::Integer(n) => Some(*n),
            OptionValue::Text(_) => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Integer(n) => write!(f, "{}", n),
            OptionValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for OptionValue {
    fn from(n: i64) -> Self {
        OptionValue::Integer(n)
    }
}

impl From<i32> for OptionValue {
    fn from(n: i32) -> Self {
        OptionValue::Integer(n as i64)
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Text(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Text(s)
    }
}

/// An editable question attribute, as named in field edits and pops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    QuestionType,
    QuestionText,
    QuestionOptions,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::QuestionType => "question_type",
            Field::QuestionText => "question_text",
            Field::QuestionOptions => "question_options",
        }
    }

    /// Whether the attribute may be removed with a pop.
    pub fn is_optional(&self) -> bool {
        matches!(self, Field::QuestionOptions)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = ConjureError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "question_type" => Ok(Field::QuestionType),
            "question_text" => Ok(Field::QuestionText),
            "question_options" => Ok(Field::QuestionOptions),
            other => Err(ConjureError::invalid_field(
                other,
                "unknown field; expected one of question_type, question_text, question_options",
            )),
        }
    }
}

//! Field-level edit vocabulary: which attributes can change and how.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConjureError, Result};
use crate::question::{Field, OptionValue, QuestionId, QuestionType};

/// Overwrites to apply to a question's attributes.
///
/// Only the recognized keys exist; anything else is rejected when parsing
/// loosely typed input with [`FieldUpdates::from_json`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldUpdates {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) question_type: Option<QuestionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) question_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) question_options: Option<Vec<OptionValue>>,
}

impl FieldUpdates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the question type.
    pub fn question_type(mut self, question_type: QuestionType) -> Self {
        self.question_type = Some(question_type);
        self
    }

    /// Set the question text.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.question_text = Some(text.into());
        self
    }

    /// Replace the options.
    pub fn options<I, V>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<OptionValue>,
    {
        self.question_options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    /// True if no field would change.
    pub fn is_empty(&self) -> bool {
        self.question_type.is_none() && self.question_text.is_none() && self.question_options.is_none()
    }

    /// Fields touched by these updates, in declaration order.
    pub fn fields(&self) -> Vec<Field> {
        let mut fields = Vec::new();
        if self.question_type.is_some() {
            fields.push(Field::QuestionType);
        }
        if self.question_text.is_some() {
            fields.push(Field::QuestionText);
        }
        if self.question_options.is_some() {
            fields.push(Field::QuestionOptions);
        }
        fields
    }

    /// Parse updates from a JSON object such as
    /// `{"question_type": "free_text", "question_options": [1, 2, 3]}`.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Object(map) => Self::from_map(map),
            other => Err(ConjureError::invalid_field(
                "updates",
                format!("expected an object of field updates, got {}", json_kind(other)),
            )),
        }
    }

    /// Parse updates from a JSON map, rejecting unknown keys.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self> {
        let mut updates = Self::new();

        for (key, value) in map {
            match key.parse::<Field>()? {
                Field::QuestionType => {
                    let name = value.as_str().ok_or_else(|| {
                        ConjureError::invalid_field(
                            "question_type",
                            format!("expected a string, got {}", json_kind(value)),
                        )
                    })?;
                    updates.question_type = Some(name.parse()?);
                }
                Field::QuestionText => {
                    let text = value.as_str().ok_or_else(|| {
                        ConjureError::invalid_field(
                            "question_text",
                            format!("expected a string, got {}", json_kind(value)),
                        )
                    })?;
                    updates.question_text = Some(text.to_string());
                }
                Field::QuestionOptions => {
                    updates.question_options = Some(parse_options(value)?);
                }
            }
        }

        Ok(updates)
    }
}

fn parse_options(value: &Value) -> Result<Vec<OptionValue>> {
    let items = value.as_array().ok_or_else(|| {
        ConjureError::invalid_field(
            "question_options",
            format!("expected an ordered list, got {}", json_kind(value)),
        )
    })?;

    items
        .iter()
        .map(|item| match item {
            Value::Number(n) => n.as_i64().map(OptionValue::Integer).ok_or_else(|| {
                ConjureError::invalid_field(
                    "question_options",
                    format!("option {} is not an integer", n),
                )
            }),
            Value::String(s) => Ok(OptionValue::Text(s.clone())),
            other => Err(ConjureError::invalid_field(
                "question_options",
                format!("options must be integers or strings, got {}", json_kind(other)),
            )),
        })
        .collect()
}

/// Reject empty or repeated option lists.
pub(crate) fn check_options(options: &[OptionValue]) -> Result<()> {
    if options.is_empty() {
        return Err(ConjureError::invalid_field(
            "question_options",
            "options must not be empty",
        ));
    }
    let mut seen = HashSet::new();
    for option in options {
        if !seen.insert(option) {
            return Err(ConjureError::invalid_field(
                "question_options",
                format!("option '{}' appears more than once", option),
            ));
        }
    }
    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// What to do when a type change leaves options behind on a type that
/// forbids them (e.g. `multiple_choice` → `free_text` without popping).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionsPolicy {
    /// Clear the options and record an [`Adjustment`].
    #[default]
    AutoClear,
    /// Fail with `InvalidFieldValue`.
    Strict,
}

/// A non-fatal change the engine made to keep a record consistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Adjustment {
    /// Options were dropped because the new type forbids them.
    OptionsCleared {
        id: QuestionId,
        question_type: QuestionType,
        removed: Vec<OptionValue>,
    },
}

impl Adjustment {
    pub fn description(&self) -> String {
        match self {
            Adjustment::OptionsCleared {
                id,
                question_type,
                removed,
            } => format!(
                "Cleared {} options from '{}' (now {})",
                removed.len(),
                id,
                question_type
            ),
        }
    }
}

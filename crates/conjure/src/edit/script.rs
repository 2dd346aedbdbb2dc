//! JSON edit scripts.
//!
//! A script is a list of steps:
//!
//! ```json
//! [
//!   {"op": "edit", "question": "morning", "updates": {"question_options": [1, 2, 3]}},
//!   {"op": "rename", "from": "morning", "to": "confidence_level"},
//!   {"op": "drop", "names": ["last_name"]},
//!   {"op": "keep", "names": ["confidence_level", "feeling"]}
//! ]
//! ```
//!
//! The whole script runs as a single composite edit, so a failing step
//! leaves the questions untouched.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConjureError, Result};
use crate::question::{Field, QuestionSet};

use super::editing::QuestionEditing;
use super::fields::FieldUpdates;
use super::function::EditFunction;

/// One step of an [`EditScript`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptStep {
    Edit {
        question: String,
        #[serde(default)]
        updates: Map<String, Value>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pop_fields: Vec<String>,
    },
    Rename {
        from: String,
        to: String,
    },
    Drop {
        names: Vec<String>,
    },
    Keep {
        names: Vec<String>,
    },
}

impl ScriptStep {
    /// Apply this step to `questions` in place.
    fn run(&self, questions: &mut QuestionSet) -> Result<()> {
        match self {
            ScriptStep::Edit {
                question,
                updates,
                pop_fields,
            } => {
                let updates = FieldUpdates::from_map(updates)?;
                let pop_fields = pop_fields
                    .iter()
                    .map(|f| Field::from_str(f))
                    .collect::<Result<Vec<_>>>()?;
                questions.edit_question(question, updates, &pop_fields)?;
            }
            ScriptStep::Rename { from, to } => {
                questions.rename_question(from, to)?;
            }
            ScriptStep::Drop { names } => {
                questions.drop_questions(names.iter().cloned())?;
            }
            ScriptStep::Keep { names } => {
                questions.keep_questions(names.iter().cloned())?;
            }
        }
        Ok(())
    }
}

/// An ordered list of edit steps loaded from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditScript {
    steps: Vec<ScriptStep>,
}

impl EditScript {
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self { steps }
    }

    /// Parse a script from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a script file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConjureError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&contents)
    }

    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Convert the script into an edit function that runs every step in order.
    pub fn into_edit_function(self) -> EditFunction {
        let steps = self.steps;
        EditFunction::in_place(move |questions| {
            for step in &steps {
                step.run(questions)?;
            }
            Ok(())
        })
        .named("edit script")
    }
}

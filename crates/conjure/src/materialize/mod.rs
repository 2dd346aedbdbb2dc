//! Turning a question set into a survey and its results.

mod results;
mod survey;

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::Result;
use crate::inference::column_ids;
use crate::input::DataTable;
use crate::question::{QuestionId, QuestionSet};

pub use results::{ResponseRow, Results, ResultsOptions};
pub use survey::{Survey, SurveyQuestion};

/// Produces the final survey and results for a question set.
///
/// Implementations must not keep state between calls: the same question set
/// always yields the same output.
pub trait Materializer: Send + Sync {
    fn materialize(&self, questions: &QuestionSet) -> Result<(Survey, Results)>;
}

/// Raw responses keyed by the column ids used during inference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseTable {
    columns: HashMap<QuestionId, usize>,
    rows: Vec<Vec<String>>,
}

impl ResponseTable {
    pub fn from_table(table: &DataTable) -> Self {
        let columns = column_ids(table)
            .into_iter()
            .enumerate()
            .map(|(i, id)| (id, i))
            .collect();
        Self {
            columns,
            rows: table.rows.clone(),
        }
    }

    pub fn respondent_count(&self) -> usize {
        self.rows.len()
    }

    /// Response of respondent `row` to the column with id `id`, if present.
    pub fn response(&self, row: usize, id: &QuestionId) -> Option<&str> {
        let col = *self.columns.get(id)?;
        let value = self.rows.get(row)?.get(col)?;
        (!DataTable::is_null_value(value)).then(|| value.trim())
    }
}

/// Binds the current questions to the responses they were inferred from.
///
/// Questions with no matching column (built by hand) get no answers.
#[derive(Debug, Clone, Default)]
pub struct ResponseMaterializer {
    responses: Arc<ResponseTable>,
}

impl ResponseMaterializer {
    pub fn new(responses: Arc<ResponseTable>) -> Self {
        Self { responses }
    }

    pub fn responses(&self) -> &ResponseTable {
        &self.responses
    }
}

impl Materializer for ResponseMaterializer {
    fn materialize(&self, questions: &QuestionSet) -> Result<(Survey, Results)> {
        let survey = Survey::from_questions(questions);
        let rows = (0..self.responses.respondent_count())
            .map(|respondent| {
                let answers: IndexMap<QuestionId, String> = questions
                    .ids()
                    .filter_map(|id| {
                        self.responses
                            .response(respondent, id)
                            .map(|value| (id.clone(), value.to_string()))
                    })
                    .collect();
                ResponseRow {
                    respondent,
                    answers,
                }
            })
            .collect();
        let results = Results::new(survey.clone(), rows);
        Ok((survey, results))
    }
}

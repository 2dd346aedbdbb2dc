//! Response rows bound to a survey.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeStruct, Serializer};

use super::survey::Survey;
use crate::error::{ConjureError, Result};
use crate::question::QuestionId;

/// One respondent's answers, keyed by question id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseRow {
    /// Row index in the source data.
    pub respondent: usize,
    /// Non-missing answers only.
    pub answers: IndexMap<QuestionId, String>,
}

/// Which respondents to keep when building results.
///
/// `indices` and `sample_size` are mutually exclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultsOptions {
    pub indices: Option<Vec<usize>>,
    pub sample_size: Option<usize>,
    /// Seed for `sample_size`; the same seed picks the same respondents.
    pub seed: u64,
}

impl ResultsOptions {
    pub fn indices(indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            indices: Some(indices.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn sample(sample_size: usize, seed: u64) -> Self {
        Self {
            sample_size: Some(sample_size),
            seed,
            ..Self::default()
        }
    }
}

/// Responses bound to the survey they answer.
///
/// Rows refer to questions by id, so answers stay attached to the right
/// question however it was renamed; lookups by name go through the survey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Results {
    survey: Survey,
    rows: Vec<ResponseRow>,
}

impl Results {
    pub fn new(survey: Survey, rows: Vec<ResponseRow>) -> Self {
        Self { survey, rows }
    }

    pub fn survey(&self) -> &Survey {
        &self.survey
    }

    pub fn rows(&self) -> &[ResponseRow] {
        &self.rows
    }

    /// Number of respondents.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The answer respondent `row` gave to the question named `name`.
    pub fn answer(&self, row: usize, name: &str) -> Option<&str> {
        let id = self.survey.id_for(name)?;
        self.rows.get(row)?.answers.get(id).map(String::as_str)
    }

    /// Every respondent's answer to one question.
    pub fn column(&self, name: &str) -> Result<Vec<Option<&str>>> {
        let id = self
            .survey
            .id_for(name)
            .ok_or_else(|| ConjureError::unknown(name))?;
        Ok(self
            .rows
            .iter()
            .map(|row| row.answers.get(id).map(String::as_str))
            .collect())
    }

    /// Remove respondents who did not answer the question named `name`.
    pub fn drop_missing(&self, name: &str) -> Result<Results> {
        let id = self
            .survey
            .id_for(name)
            .ok_or_else(|| ConjureError::unknown(name))?;
        let rows = self
            .rows
            .iter()
            .filter(|row| row.answers.contains_key(id))
            .cloned()
            .collect();
        Ok(Results::new(self.survey.clone(), rows))
    }

    /// Keep only the respondents chosen by `options`.
    pub fn select(&self, options: &ResultsOptions) -> Result<Results> {
        let indices = match (&options.indices, options.sample_size) {
            (Some(_), Some(_)) => {
                return Err(ConjureError::InvalidSample(
                    "indices and sample_size cannot both be given".to_string(),
                ))
            }
            (Some(indices), None) => {
                if let Some(&bad) = indices.iter().find(|&&i| i >= self.rows.len()) {
                    return Err(ConjureError::InvalidSample(format!(
                        "respondent index {} is out of range ({} respondents)",
                        bad,
                        self.rows.len()
                    )));
                }
                indices.clone()
            }
            (None, Some(size)) => {
                if size > self.rows.len() {
                    return Err(ConjureError::InvalidSample(format!(
                        "sample size {} exceeds the {} available respondents",
                        size,
                        self.rows.len()
                    )));
                }
                let mut rng = fastrand::Rng::with_seed(options.seed);
                let mut all: Vec<usize> = (0..self.rows.len()).collect();
                rng.shuffle(&mut all);
                all.truncate(size);
                all
            }
            (None, None) => return Ok(self.clone()),
        };

        let rows = indices.iter().map(|&i| self.rows[i].clone()).collect();
        Ok(Results::new(self.survey.clone(), rows))
    }
}

impl Serialize for Results {
    /// Answers are written under the current question names.
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let responses: Vec<IndexMap<&str, Option<&str>>> = self
            .rows
            .iter()
            .map(|row| {
                self.survey
                    .questions()
                    .iter()
                    .map(|q| (q.name.as_str(), row.answers.get(&q.id).map(String::as_str)))
                    .collect()
            })
            .collect();

        let mut state = serializer.serialize_struct("Results", 2)?;
        state.serialize_field("survey", &self.survey)?;
        state.serialize_field("responses", &responses)?;
        state.end()
    }
}

//! Inferring a question set from raw responses.

use std::collections::{HashMap, HashSet};

use indexmap::IndexSet;
use tracing::{debug, info};

use super::statistical::QuestionStatistics;
use crate::error::{ConjureError, Result};
use crate::input::DataTable;
use crate::question::naming::sanitize_name;
use crate::question::{OptionValue, QuestionId, QuestionRecord, QuestionSet, QuestionType};

/// Separator between selections in a checkbox response.
const CHECKBOX_SEPARATOR: char = ',';

/// Maps raw response codes to labels, per column header.
pub type AnswerCodebook = HashMap<String, HashMap<String, String>>;

/// Thresholds and options for question inference.
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// Columns with at most this many distinct responses become choice questions.
    pub unique_threshold: usize,
    /// Minimum share of numeric responses for a `numeric` question.
    pub numeric_threshold: f64,
    /// Sort options (integers ascending, then text) instead of first appearance.
    pub order_options: bool,
    pub answer_codebook: AnswerCodebook,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            unique_threshold: 15,
            numeric_threshold: 0.8,
            order_options: false,
            answer_codebook: HashMap::new(),
        }
    }
}

impl InferenceConfig {
    pub fn with_order_options(mut self, order: bool) -> Self {
        self.order_options = order;
        self
    }

    /// Add a code → label mapping for the column with header `column`.
    pub fn with_codebook<I, K, V>(mut self, column: impl Into<String>, codes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let codes = codes
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.answer_codebook.insert(column.into(), codes);
        self
    }
}

/// Builds the initial [`QuestionSet`] from a response table.
#[derive(Debug, Clone, Default)]
pub struct QuestionInferencer {
    config: InferenceConfig,
}

impl QuestionInferencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: InferenceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Replace coded responses with their labels.
    ///
    /// Fails with `UnknownQuestion` if the codebook names a column the table
    /// does not have.
    pub fn apply_codebook(&self, table: &DataTable) -> Result<DataTable> {
        let mut coded = table.clone();
        for (column, codes) in &self.config.answer_codebook {
            let index = table
                .headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| ConjureError::unknown(column.as_str()))?;
            for cell in coded.rows.iter_mut().filter_map(|row| row.get_mut(index)) {
                if let Some(label) = codes.get(cell.trim()) {
                    *cell = label.clone();
                }
            }
        }
        Ok(coded)
    }

    /// Statistics for every column, after applying the codebook.
    pub fn statistics(&self, table: &DataTable) -> Result<Vec<QuestionStatistics>> {
        let coded = self.apply_codebook(table)?;
        Ok((0..coded.column_count())
            .map(|i| QuestionStatistics::for_column(&coded, i))
            .collect())
    }

    /// One question per column, in column order.
    pub fn infer_questions(&self, table: &DataTable) -> Result<QuestionSet> {
        let coded = self.apply_codebook(table)?;
        let ids = column_ids(&coded);
        let names = question_names(&coded.headers);

        let mut questions = QuestionSet::new();
        for (index, (id, name)) in ids.into_iter().zip(names).enumerate() {
            let header = coded.headers[index].as_str();
            let stats = QuestionStatistics::for_column(&coded, index);
            let text = if header.is_empty() { name.as_str() } else { header };

            let (question_type, options) = self.infer_type(&stats);
            debug!(
                id = %id,
                name = %name,
                question_type = %question_type,
                unique = stats.num_unique_responses,
                "inferred question"
            );

            let mut record = QuestionRecord::new(id, name.as_str(), question_type, text);
            if let Some(options) = options {
                record = record.with_options(options);
            }
            questions.insert(record)?;
        }

        info!(
            questions = questions.len(),
            respondents = coded.row_count(),
            "inferred questions"
        );
        Ok(questions)
    }

    /// Pick a type, and options for choice types.
    pub fn infer_type(
        &self,
        stats: &QuestionStatistics,
    ) -> (QuestionType, Option<Vec<OptionValue>>) {
        let threshold = self.config.unique_threshold;

        if stats.is_empty() {
            return (QuestionType::FreeText, None);
        }
        if stats.frac_numerical >= self.config.numeric_threshold
            && stats.num_unique_responses > threshold
        {
            return (QuestionType::Numeric, None);
        }
        if let Some(items) = checkbox_items(stats, threshold) {
            return (QuestionType::Checkbox, Some(self.arrange(items)));
        }
        if stats.num_unique_responses <= threshold {
            let options = stats.unique_responses().map(OptionValue::parse);
            return (QuestionType::MultipleChoice, Some(self.arrange(options)));
        }
        (QuestionType::FreeText, None)
    }

    fn arrange(&self, options: impl IntoIterator<Item = OptionValue>) -> Vec<OptionValue> {
        let unique: IndexSet<OptionValue> = options.into_iter().collect();
        let mut options: Vec<OptionValue> = unique.into_iter().collect();
        if self.config.order_options {
            order_options(&mut options);
        }
        options
    }
}

/// Stable ids for each column, derived from the headers.
///
/// A header used by more than one column gets its 1-based position
/// appended (`Age#3`); an empty header becomes `column_<n>`.
pub fn column_ids(table: &DataTable) -> Vec<QuestionId> {
    let mut header_counts: HashMap<&str, usize> = HashMap::new();
    for header in &table.headers {
        *header_counts.entry(header.as_str()).or_insert(0) += 1;
    }

    let mut used = HashSet::new();
    table
        .headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let position = i + 1;
            let mut id = if header.is_empty() {
                format!("column_{}", position)
            } else if header_counts[header.as_str()] > 1 {
                format!("{}#{}", header, position)
            } else {
                header.clone()
            };
            if used.contains(&id) {
                id = format!("{}#{}", id, position);
            }
            used.insert(id.clone());
            QuestionId::new(id)
        })
        .collect()
}

/// Unique, valid names for each header.
fn question_names(headers: &[String]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let position = i + 1;
            let base = sanitize_name(header).unwrap_or_else(|| format!("question_{}", position));
            let mut name = base.clone();
            let mut attempt = 1;
            while used.contains(&name) {
                name = if attempt == 1 {
                    format!("{}_{}", base, position)
                } else {
                    format!("{}_{}_{}", base, position, attempt)
                };
                attempt += 1;
            }
            used.insert(name.clone());
            name
        })
        .collect()
}

/// Distinct selections if the column looks like comma-separated multi-select.
fn checkbox_items(stats: &QuestionStatistics, threshold: usize) -> Option<Vec<OptionValue>> {
    let mut multi_select = false;
    let mut items: IndexSet<&str> = IndexSet::new();

    for response in stats.unique_responses() {
        let parts: Vec<&str> = response
            .split(CHECKBOX_SEPARATOR)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if parts.len() > 1 {
            multi_select = true;
        }
        items.extend(parts);
        if items.len() > threshold {
            return None;
        }
    }

    if multi_select && items.len() < stats.num_unique_responses {
        Some(items.into_iter().map(OptionValue::parse).collect())
    } else {
        None
    }
}

/// Integers ascending, then text in lexical order.
fn order_options(options: &mut [OptionValue]) {
    options.sort_by(|a, b| match (a, b) {
        (OptionValue::Integer(x), OptionValue::Integer(y)) => x.cmp(y),
        (OptionValue::Integer(_), OptionValue::Text(_)) => std::cmp::Ordering::Less,
        (OptionValue::Text(_), OptionValue::Integer(_)) => std::cmp::Ordering::Greater,
        (OptionValue::Text(x), OptionValue::Text(y)) => x.cmp(y),
    });
}

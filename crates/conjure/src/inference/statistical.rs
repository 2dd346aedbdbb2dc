//! Descriptive statistics over one column of responses.

use indexmap::IndexMap;
use serde::Serialize;

use crate::input::DataTable;

/// How many of the most frequent responses are reported.
pub const TOP_K: usize = 5;

/// Response counts for a single question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionStatistics {
    /// Non-missing responses.
    pub num_responses: usize,
    /// Missing responses (see [`DataTable::is_null_value`]).
    pub missing: usize,
    pub num_unique_responses: usize,
    /// Share of non-missing responses that parse as numbers.
    pub frac_numerical: f64,
    /// Each distinct response with its count, in order of first appearance.
    pub value_counts: IndexMap<String, usize>,
    /// The most frequent responses, most frequent first.
    pub top_k: Vec<(String, usize)>,
    /// Share of non-missing responses covered by `top_k`.
    pub frac_obs_from_top_k: f64,
}

impl QuestionStatistics {
    /// Summarize one column's raw responses.
    pub fn from_responses<'a>(responses: impl IntoIterator<Item = &'a str>) -> Self {
        let mut value_counts: IndexMap<String, usize> = IndexMap::new();
        let mut missing = 0;
        let mut numeric = 0;

        for raw in responses {
            if DataTable::is_null_value(raw) {
                missing += 1;
                continue;
            }
            let value = raw.trim();
            if is_numeric(value) {
                numeric += 1;
            }
            *value_counts.entry(value.to_string()).or_insert(0) += 1;
        }

        let num_responses: usize = value_counts.values().sum();
        let frac = |n: usize| {
            if num_responses == 0 {
                0.0
            } else {
                n as f64 / num_responses as f64
            }
        };

        let mut ranked: Vec<(String, usize)> =
            value_counts.iter().map(|(v, &c)| (v.clone(), c)).collect();
        // Stable sort keeps first-appearance order among ties.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(TOP_K);
        let covered = ranked.iter().map(|(_, c)| c).sum();

        Self {
            num_responses,
            missing,
            num_unique_responses: value_counts.len(),
            frac_numerical: frac(numeric),
            frac_obs_from_top_k: frac(covered),
            top_k: ranked,
            value_counts,
        }
    }

    /// Summarize column `index` of `table`.
    pub fn for_column(table: &DataTable, index: usize) -> Self {
        Self::from_responses(table.column_values(index))
    }

    /// Distinct responses in order of first appearance.
    pub fn unique_responses(&self) -> impl Iterator<Item = &str> {
        self.value_counts.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.num_responses == 0
    }
}

fn is_numeric(value: &str) -> bool {
    value.parse::<f64>().is_ok_and(f64::is_finite)
}

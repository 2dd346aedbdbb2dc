//! Default question inference: one typed question per response column.

mod questions;
mod statistical;

pub use questions::{column_ids, AnswerCodebook, InferenceConfig, QuestionInferencer};
pub use statistical::{QuestionStatistics, TOP_K};

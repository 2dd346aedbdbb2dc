//! Question data model: records, types and the validated question set.

pub mod naming;
mod record;
mod set;
mod types;

pub use record::QuestionRecord;
pub use set::QuestionSet;
pub use types::{Field, OptionValue, QuestionId, QuestionType};

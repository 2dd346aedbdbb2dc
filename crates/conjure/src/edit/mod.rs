//! Edit vocabulary and the machinery that applies it.
//!
//! Everything that changes a [`crate::QuestionSet`] goes through an
//! [`EditOperation`]. The [`QuestionEditing`] trait offers those operations in
//! both functional and mutating form.

mod editing;
mod fields;
mod function;
mod log;
mod operation;
mod script;

pub use editing::QuestionEditing;
pub use fields::{Adjustment, FieldUpdates, OptionsPolicy};
pub use function::EditFunction;
pub use log::{EditLog, LogEntry};
pub use operation::EditOperation;
pub use script::{EditScript, ScriptStep};

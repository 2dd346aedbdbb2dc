//! Conjure: turn raw survey exports into an editable survey definition.
//!
//! Conjure reads a CSV/TSV of survey responses, infers one typed question per
//! column, and lets you rename, retype, re-option or drop those questions
//! before producing the final [`Survey`] and its [`Results`].
//!
//! # Core Principles
//!
//! - **Two calling styles, one behaviour**: every edit exists in a functional
//!   form (`with_*`, returns a new value) and a mutating form (returns
//!   `&mut Self` for chaining), implemented once in [`QuestionEditing`]
//! - **Atomic edits**: a failing edit leaves the questions as they were
//! - **Replayable**: every successful edit is logged, and replaying the log
//!   on the inferred questions reproduces the current ones
//! - **Stable identity**: questions keep their id across renames, so results
//!   stay bound to the right question
//!
//! # Example
//!
//! ```no_run
//! use conjure::{Conjure, FieldUpdates, QuestionEditing};
//!
//! let mut session = Conjure::new().load("responses.csv")?;
//! session
//!     .edit_question("morning", FieldUpdates::new().options(1..=10), &[])?
//!     .rename_question("morning", "confidence_level")?
//!     .drop_questions(["last_name"])?;
//!
//! let (survey, results) = session.materialize()?;
//! println!("{} questions, {} respondents", survey.len(), results.len());
//! # Ok::<(), conjure::ConjureError>(())
//! ```

pub mod edit;
pub mod error;
pub mod inference;
pub mod input;
pub mod materialize;
pub mod question;

mod conjure;
mod session;

pub use crate::conjure::{Conjure, ConjureConfig, Inspection};
pub use edit::{
    Adjustment, EditFunction, EditLog, EditOperation, EditScript, FieldUpdates, LogEntry,
    OptionsPolicy, QuestionEditing, ScriptStep,
};
pub use error::{ConjureError, Result};
pub use inference::{InferenceConfig, QuestionInferencer, QuestionStatistics};
pub use input::{DataTable, Parser, ParserConfig, SourceMetadata};
pub use materialize::{
    Materializer, ResponseMaterializer, ResponseRow, ResponseTable, Results, ResultsOptions,
    Survey, SurveyQuestion,
};
pub use question::{Field, OptionValue, QuestionId, QuestionRecord, QuestionSet, QuestionType};
pub use session::ConjureSession;

//! CLI command implementations.

pub mod convert;
pub mod inspect;
pub mod survey;

use std::path::{Path, PathBuf};

use conjure::{Conjure, ConjureSession, EditScript, QuestionEditing};
use tracing::debug;

/// Load `file` and apply the edit script, if any.
pub(crate) fn open_session(
    file: &Path,
    edits: Option<&PathBuf>,
) -> Result<ConjureSession, Box<dyn std::error::Error>> {
    let mut session = Conjure::new().load(file)?;

    if let Some(script_path) = edits {
        let script = EditScript::load(script_path)?;
        debug!(steps = script.steps().len(), script = %script_path.display(), "applying edit script");
        session.apply_question_edits(script.into_edit_function())?;
    }

    for adjustment in session.questions().adjustments() {
        eprintln!("note: {}", adjustment.description());
    }

    Ok(session)
}

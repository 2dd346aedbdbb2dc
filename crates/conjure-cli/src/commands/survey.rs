//! Survey command - print the survey definition.

use std::path::PathBuf;

pub fn run(file: PathBuf, edits: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let session = super::open_session(&file, edits.as_ref())?;
    let survey = session.to_survey()?;
    println!("{}", serde_json::to_string_pretty(&survey)?);
    Ok(())
}

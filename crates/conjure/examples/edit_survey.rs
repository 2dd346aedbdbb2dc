//! Example: load a survey export, edit its questions, and print the survey.
//!
//! Usage:
//!   cargo run --example edit_survey -- <file_path>

use std::env;
use std::path::Path;

use conjure::{Conjure, EditFunction, FieldUpdates, QuestionEditing, QuestionType};

fn main() -> conjure::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example edit_survey -- <file_path>");
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    if !path.exists() {
        eprintln!("Error: File not found: {}", path.display());
        std::process::exit(1);
    }

    let session = Conjure::new().load(path)?;

    println!("Inferred questions:");
    for question in session.questions() {
        println!(
            "  {:<30} {:<16} {}",
            question.name(),
            question.question_type().to_string(),
            question.question_text()
        );
    }

    // Turn every multiple-choice question with integer options into a scale.
    let to_scales = EditFunction::in_place(|qs| {
        let scales: Vec<String> = qs
            .iter()
            .filter(|q| q.question_type() == QuestionType::MultipleChoice)
            .filter(|q| {
                q.question_options()
                    .is_some_and(|opts| opts.iter().all(|o| o.as_integer().is_some()))
            })
            .map(|q| q.name().to_string())
            .collect();
        for name in scales {
            qs.edit_question(
                &name,
                FieldUpdates::new().question_type(QuestionType::LinearScale),
                &[],
            )?;
        }
        Ok(())
    })
    .named("integer choices to scales");

    let edited = session.with_question_edits(to_scales)?;

    println!();
    println!("Edits:");
    for description in edited.log().descriptions() {
        println!("  {}", description);
    }

    let (survey, results) = edited.materialize()?;
    println!();
    println!(
        "{} questions, {} respondents",
        survey.len(),
        results.len()
    );
    println!("{}", serde_json::to_string_pretty(&survey)?);

    Ok(())
}

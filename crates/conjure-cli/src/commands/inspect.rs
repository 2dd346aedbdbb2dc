//! Inspect command - show what was inferred from a response file.

use std::path::PathBuf;

use colored::Colorize;
use conjure::{Conjure, Inspection, QuestionStatistics, QuestionType};

pub fn run(file: PathBuf, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let inspection = Conjure::new().inspect(&file)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&inspection)?);
    } else {
        print_report(&inspection);
    }
    Ok(())
}

fn print_report(inspection: &Inspection) {
    let source = &inspection.source;
    println!(
        "{} {}",
        "Questions inferred from".cyan().bold(),
        source.file.white()
    );
    println!(
        "  {} respondents, {} columns, {} ({})",
        source.respondent_count, source.column_count, source.format, source.hash
    );
    println!();

    for (question, stats) in inspection.questions.iter().zip(&inspection.statistics) {
        println!(
            "{} {} {}",
            question.name().white().bold(),
            colored_type(question.question_type()),
            format!("({})", question.id()).dimmed()
        );
        println!("    {}", question.question_text());
        if let Some(options) = question.question_options() {
            let options: Vec<String> = options.iter().map(ToString::to_string).collect();
            println!("    options: {}", options.join(" | "));
        }
        println!("    {}", summary_line(stats).dimmed());
    }
}

fn colored_type(question_type: QuestionType) -> colored::ColoredString {
    let label = question_type.as_str();
    match question_type {
        QuestionType::MultipleChoice | QuestionType::LinearScale => label.green(),
        QuestionType::Checkbox => label.blue(),
        QuestionType::Numeric => label.yellow(),
        QuestionType::FreeText => label.normal(),
    }
}

fn summary_line(stats: &QuestionStatistics) -> String {
    let top: Vec<String> = stats
        .top_k
        .iter()
        .map(|(value, count)| format!("{} ×{}", value, count))
        .collect();
    format!(
        "{} responses, {} missing, {} unique, {:.0}% numeric; top: {}",
        stats.num_responses,
        stats.missing,
        stats.num_unique_responses,
        stats.frac_numerical * 100.0,
        top.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_line() {
        let stats = QuestionStatistics::from_responses(["a", "a", "b", ""]);
        assert_eq!(
            summary_line(&stats),
            "3 responses, 1 missing, 2 unique, 0% numeric; top: a ×2, b ×1"
        );
    }
}

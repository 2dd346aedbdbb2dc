//! Edit operations and their application to a question set.

use std::collections::BTreeSet;

use tracing::warn;

use crate::error::{ConjureError, Result};
use crate::question::{naming, Field, QuestionId, QuestionSet};

use super::fields::{check_options, Adjustment, FieldUpdates, OptionsPolicy};
use super::function::EditFunction;

/// A single named transformation of a question set.
#[derive(Debug, Clone)]
pub enum EditOperation {
    /// Overwrite and/or remove attributes of one question.
    EditFields {
        id: QuestionId,
        updates: FieldUpdates,
        pop_fields: Vec<Field>,
    },

    /// Change a question's name; its id is untouched.
    RenameQuestion { old_name: String, new_name: String },

    /// Rename several questions in order, as one step.
    RenameQuestions {
        renames: Vec<(String, String)>,
        /// Skip renames whose old name is not present.
        ignore_missing: bool,
    },

    /// Remove questions by name. Unknown names are ignored.
    DropQuestions { names: BTreeSet<String> },

    /// Remove every question not named. Unknown names are ignored.
    KeepQuestions { names: BTreeSet<String> },

    /// Run a composite edit function.
    ApplyFunction(EditFunction),
}

impl EditOperation {
    /// Get a human-readable description of the operation.
    pub fn description(&self) -> String {
        match self {
            EditOperation::EditFields {
                id,
                updates,
                pop_fields,
            } => {
                let mut parts: Vec<String> = updates
                    .fields()
                    .iter()
                    .map(|f| format!("set {}", f))
                    .collect();
                parts.extend(pop_fields.iter().map(|f| format!("pop {}", f)));
                if parts.is_empty() {
                    parts.push("no changes".to_string());
                }
                format!("Edit '{}': {}", id, parts.join(", "))
            }
            EditOperation::RenameQuestion { old_name, new_name } => {
                format!("Rename '{}' → '{}'", old_name, new_name)
            }
            EditOperation::RenameQuestions { renames, .. } => {
                let pairs: Vec<String> = renames
                    .iter()
                    .map(|(old, new)| format!("'{}' → '{}'", old, new))
                    .collect();
                format!("Rename {}", pairs.join(", "))
            }
            EditOperation::DropQuestions { names } => {
                let names: Vec<&str> = names.iter().map(String::as_str).collect();
                format!("Drop {}", names.join(", "))
            }
            EditOperation::KeepQuestions { names } => {
                let names: Vec<&str> = names.iter().map(String::as_str).collect();
                format!("Keep {}", names.join(", "))
            }
            EditOperation::ApplyFunction(function) => match function.label() {
                Some(label) => format!("Apply edit function '{}'", label),
                None => "Apply edit function".to_string(),
            },
        }
    }

    /// Apply to `questions` in place.
    ///
    /// This is the only place edit semantics live. It may leave `questions`
    /// half-changed on error, so callers run it against a candidate copy
    /// (see [`QuestionSet::apply`]).
    pub(crate) fn apply_to(&self, questions: &mut QuestionSet) -> Result<()> {
        match self {
            EditOperation::EditFields {
                id,
                updates,
                pop_fields,
            } => edit_fields(questions, id, updates, pop_fields),
            EditOperation::RenameQuestion { old_name, new_name } => {
                rename(questions, old_name, new_name)
            }
            EditOperation::RenameQuestions {
                renames,
                ignore_missing,
            } => {
                for (old_name, new_name) in renames {
                    if *ignore_missing && !questions.contains_name(old_name) {
                        continue;
                    }
                    rename(questions, old_name, new_name)?;
                }
                Ok(())
            }
            EditOperation::DropQuestions { names } => {
                retire_where(questions, |name| names.contains(name));
                Ok(())
            }
            EditOperation::KeepQuestions { names } => {
                retire_where(questions, |name| !names.contains(name));
                Ok(())
            }
            EditOperation::ApplyFunction(function) => apply_function(questions, function),
        }
    }
}

fn edit_fields(
    questions: &mut QuestionSet,
    id: &QuestionId,
    updates: &FieldUpdates,
    pop_fields: &[Field],
) -> Result<()> {
    let policy = questions.policy;
    let record = questions
        .records
        .get_mut(id)
        .ok_or_else(|| ConjureError::unknown(id.as_str()))?;

    if let Some(field) = pop_fields.iter().find(|f| !f.is_optional()) {
        return Err(ConjureError::invalid_field(
            field.as_str(),
            "required field cannot be removed",
        ));
    }
    if let Some(options) = &updates.question_options {
        check_options(options)?;
    }

    if let Some(question_type) = updates.question_type {
        record.question_type = question_type;
    }
    if let Some(text) = &updates.question_text {
        record.question_text = text.clone();
    }
    if let Some(options) = &updates.question_options {
        record.question_options = Some(options.clone());
    }
    if pop_fields.contains(&Field::QuestionOptions) {
        record.question_options = None;
    }

    let mut adjustment = None;
    if record.question_type.forbids_options() && record.question_options.is_some() {
        if updates.question_options.is_some() {
            return Err(ConjureError::invalid_field(
                "question_options",
                format!(
                    "{} questions do not take options; pop question_options or choose a choice type",
                    record.question_type
                ),
            ));
        }
        match policy {
            OptionsPolicy::Strict => {
                return Err(ConjureError::invalid_field(
                    "question_options",
                    format!(
                        "'{}' changed to {} but question_options was not popped",
                        record.name, record.question_type
                    ),
                ));
            }
            OptionsPolicy::AutoClear => {
                let removed = record.question_options.take().unwrap_or_default();
                warn!(
                    question = %record.name,
                    question_type = %record.question_type,
                    removed = removed.len(),
                    "cleared options left on a question type that forbids them"
                );
                adjustment = Some(Adjustment::OptionsCleared {
                    id: id.clone(),
                    question_type: record.question_type,
                    removed,
                });
            }
        }
    } else if record.question_type.is_choice() && record.question_options.is_none() {
        return Err(ConjureError::invalid_field(
            "question_options",
            format!("{} questions need options", record.question_type),
        ));
    }

    questions.adjustments.extend(adjustment);
    Ok(())
}

fn rename(questions: &mut QuestionSet, old_name: &str, new_name: &str) -> Result<()> {
    let id = questions.resolve(old_name)?.clone();
    if old_name == new_name {
        return Ok(());
    }
    if !naming::is_valid_name(new_name) {
        return Err(ConjureError::invalid_field(
            "name",
            format!("'{}' is not a valid question name", new_name),
        ));
    }
    if questions.contains_name(new_name) {
        return Err(ConjureError::DuplicateName {
            name: new_name.to_string(),
        });
    }

    if let Some(record) = questions.records.get_mut(&id) {
        record.name = new_name.to_string();
    }
    Ok(())
}

fn retire_where(questions: &mut QuestionSet, remove: impl Fn(&String) -> bool) {
    let QuestionSet {
        records, retired, ..
    } = questions;

    records.retain(|id, record| {
        if remove(&record.name) {
            retired.insert(id.clone());
            false
        } else {
            true
        }
    });
}

fn apply_function(questions: &mut QuestionSet, function: &EditFunction) -> Result<()> {
    let mut result = function.run(questions.clone())?;

    if let Some(id) = result
        .records
        .keys()
        .find(|id| !questions.records.contains_key(*id))
    {
        return Err(ConjureError::InvariantViolation(format!(
            "edit function introduced question id '{}'",
            id
        )));
    }

    // Whatever the function removed stays retired.
    for id in questions.records.keys() {
        if !result.records.contains_key(id) {
            result.retired.insert(id.clone());
        }
    }
    result.retired.extend(questions.retired.iter().cloned());

    // A derived set may carry a different policy or lose earlier adjustments.
    let new_adjustments = if result.adjustments.starts_with(&questions.adjustments) {
        result.adjustments.split_off(questions.adjustments.len())
    } else {
        std::mem::take(&mut result.adjustments)
    };
    if questions.policy == OptionsPolicy::Strict {
        if let Some(adjustment) = new_adjustments.first() {
            return Err(ConjureError::invalid_field(
                "question_options",
                format!(
                    "{} but the options policy is strict",
                    adjustment.description()
                ),
            ));
        }
    }
    result.adjustments = questions.adjustments.clone();
    result.adjustments.extend(new_adjustments);
    result.policy = questions.policy;

    *questions = result;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::QuestionEditing;
    use crate::question::{OptionValue, QuestionRecord, QuestionType};

    fn sample_set() -> QuestionSet {
        QuestionSet::from_records([
            QuestionRecord::new("Q1", "morning", QuestionType::MultipleChoice, "How are you this morning?")
                .with_options([1, 2, 3, 4, 5]),
            QuestionRecord::new("Q2", "feeling", QuestionType::MultipleChoice, "How are you feeling?")
                .with_options(["good", "bad"]),
            QuestionRecord::new("Q3", "notes", QuestionType::FreeText, "Anything else?"),
        ])
        .unwrap()
    }

    fn edit(id: &str, updates: FieldUpdates, pop: &[Field]) -> EditOperation {
        EditOperation::EditFields {
            id: QuestionId::new(id),
            updates,
            pop_fields: pop.to_vec(),
        }
    }

    #[test]
    fn test_edit_options() {
        let mut set = sample_set();
        edit("Q1", FieldUpdates::new().options(1..=10), &[])
            .apply_to(&mut set)
            .unwrap();

        let record = set.get("morning").unwrap();
        assert_eq!(record.question_options().map(|o| o.len()), Some(10));
        assert_eq!(record.question_options().unwrap()[9], OptionValue::Integer(10));
    }

    #[test]
    fn test_edit_to_free_text_with_pop() {
        let mut set = sample_set();
        edit(
            "Q2",
            FieldUpdates::new().question_type(QuestionType::FreeText),
            &[Field::QuestionOptions],
        )
        .apply_to(&mut set)
        .unwrap();

        let record = set.get("feeling").unwrap();
        assert_eq!(record.question_type(), QuestionType::FreeText);
        assert!(record.question_options().is_none());
        assert!(set.adjustments().is_empty());
    }

    #[test]
    fn test_edit_to_free_text_auto_clears() {
        let mut set = sample_set();
        edit("Q2", FieldUpdates::new().question_type(QuestionType::FreeText), &[])
            .apply_to(&mut set)
            .unwrap();

        assert!(set.get("feeling").unwrap().question_options().is_none());
        assert_eq!(
            set.adjustments(),
            &[Adjustment::OptionsCleared {
                id: QuestionId::new("Q2"),
                question_type: QuestionType::FreeText,
                removed: vec!["good".into(), "bad".into()],
            }]
        );
    }

    #[test]
    fn test_edit_to_free_text_strict_policy() {
        let mut set = sample_set().with_policy(OptionsPolicy::Strict);
        let err = edit("Q2", FieldUpdates::new().question_type(QuestionType::FreeText), &[])
            .apply_to(&mut set)
            .unwrap_err();
        assert!(matches!(err, ConjureError::InvalidFieldValue { .. }));
    }

    #[test]
    fn test_explicit_options_on_free_text_rejected() {
        let mut set = sample_set();
        let err = edit("Q3", FieldUpdates::new().options(["a", "b"]), &[])
            .apply_to(&mut set)
            .unwrap_err();
        assert!(matches!(err, ConjureError::InvalidFieldValue { ref field, .. } if field == "question_options"));
    }

    #[test]
    fn test_choice_type_without_options_rejected() {
        let mut set = sample_set();
        let err = edit("Q3", FieldUpdates::new().question_type(QuestionType::Checkbox), &[])
            .apply_to(&mut set)
            .unwrap_err();
        assert!(matches!(err, ConjureError::InvalidFieldValue { .. }));

        edit(
            "Q3",
            FieldUpdates::new()
                .question_type(QuestionType::Checkbox)
                .options(["red", "blue"]),
            &[],
        )
        .apply_to(&mut set)
        .unwrap();
        assert_eq!(set.get("notes").unwrap().question_type(), QuestionType::Checkbox);
    }

    #[test]
    fn test_pop_absent_field_is_noop() {
        let mut set = sample_set();
        edit("Q3", FieldUpdates::new(), &[Field::QuestionOptions])
            .apply_to(&mut set)
            .unwrap();
        assert_eq!(set, sample_set());
    }

    #[test]
    fn test_pop_required_field_rejected() {
        let mut set = sample_set();
        let err = edit("Q3", FieldUpdates::new(), &[Field::QuestionText])
            .apply_to(&mut set)
            .unwrap_err();
        assert!(matches!(err, ConjureError::InvalidFieldValue { ref field, .. } if field == "question_text"));
    }

    #[test]
    fn test_edit_unknown_id() {
        let mut set = sample_set();
        let err = edit("Q9", FieldUpdates::new().text("?"), &[])
            .apply_to(&mut set)
            .unwrap_err();
        assert!(matches!(err, ConjureError::UnknownQuestion { .. }));
    }

    #[test]
    fn test_unknown_id_reported_before_field_checks() {
        let mut set = sample_set();
        let err = edit("Q9", FieldUpdates::new().options(["a", "a"]), &[Field::QuestionText])
            .apply_to(&mut set)
            .unwrap_err();
        assert!(matches!(err, ConjureError::UnknownQuestion { .. }));
    }

    #[test]
    fn test_rename() {
        let mut set = sample_set();
        EditOperation::RenameQuestion {
            old_name: "morning".into(),
            new_name: "confidence_level".into(),
        }
        .apply_to(&mut set)
        .unwrap();

        assert!(set.get("morning").is_none());
        assert_eq!(set.get("confidence_level").unwrap().id().as_str(), "Q1");
    }

    #[test]
    fn test_rename_errors() {
        let mut set = sample_set();
        let duplicate = EditOperation::RenameQuestion {
            old_name: "morning".into(),
            new_name: "feeling".into(),
        };
        assert!(matches!(
            duplicate.apply_to(&mut set),
            Err(ConjureError::DuplicateName { .. })
        ));

        let unknown = EditOperation::RenameQuestion {
            old_name: "evening".into(),
            new_name: "night".into(),
        };
        assert!(matches!(
            unknown.apply_to(&mut set),
            Err(ConjureError::UnknownQuestion { .. })
        ));

        let invalid = EditOperation::RenameQuestion {
            old_name: "morning".into(),
            new_name: "first name".into(),
        };
        assert!(matches!(
            invalid.apply_to(&mut set),
            Err(ConjureError::InvalidFieldValue { .. })
        ));
    }

    #[test]
    fn test_rename_to_same_name() {
        let mut set = sample_set();
        EditOperation::RenameQuestion {
            old_name: "morning".into(),
            new_name: "morning".into(),
        }
        .apply_to(&mut set)
        .unwrap();
        assert_eq!(set, sample_set());
    }

    #[test]
    fn test_drop_retires_ids_and_ignores_unknown() {
        let mut set = sample_set();
        EditOperation::DropQuestions {
            names: ["feeling".to_string(), "last_name".to_string()].into(),
        }
        .apply_to(&mut set)
        .unwrap();

        assert_eq!(set.names(), vec!["morning", "notes"]);
        assert!(set.is_retired(&QuestionId::new("Q2")));
    }

    #[test]
    fn test_keep_retires_the_rest() {
        let mut set = sample_set();
        EditOperation::KeepQuestions {
            names: ["notes".to_string(), "morning".to_string(), "absent".to_string()].into(),
        }
        .apply_to(&mut set)
        .unwrap();

        assert_eq!(set.names(), vec!["morning", "notes"]);
        assert!(set.is_retired(&QuestionId::new("Q2")));
    }

    #[test]
    fn test_bulk_rename_runs_in_order() {
        let mut set = sample_set();
        EditOperation::RenameQuestions {
            renames: vec![
                ("morning".into(), "evening".into()),
                ("feeling".into(), "morning".into()),
            ],
            ignore_missing: false,
        }
        .apply_to(&mut set)
        .unwrap();
        assert_eq!(set.names(), vec!["evening", "morning", "notes"]);
        assert_eq!(set.get("morning").unwrap().id().as_str(), "Q2");
    }

    #[test]
    fn test_bulk_rename_missing_names() {
        let renames = vec![
            ("absent".to_string(), "gone".to_string()),
            ("notes".to_string(), "comments".to_string()),
        ];

        let mut set = sample_set();
        let strict = EditOperation::RenameQuestions {
            renames: renames.clone(),
            ignore_missing: false,
        };
        assert!(matches!(
            strict.apply_to(&mut set),
            Err(ConjureError::UnknownQuestion { .. })
        ));

        let mut set = sample_set();
        EditOperation::RenameQuestions {
            renames,
            ignore_missing: true,
        }
        .apply_to(&mut set)
        .unwrap();
        assert_eq!(set.names(), vec!["morning", "feeling", "comments"]);
    }

    #[test]
    fn test_derived_set_keeps_strict_policy() {
        let mut set = sample_set().with_policy(OptionsPolicy::Strict);
        let function = EditFunction::derive(|qs| {
            let fresh = QuestionSet::from_records(qs.iter().cloned())?;
            fresh.with_edited_question(
                "feeling",
                FieldUpdates::new().question_type(QuestionType::FreeText),
                &[],
            )
        });

        let err = set
            .apply(&EditOperation::ApplyFunction(function))
            .unwrap_err();
        assert!(matches!(err, ConjureError::InvalidFieldValue { ref field, .. } if field == "question_options"));
        assert_eq!(set, sample_set().with_policy(OptionsPolicy::Strict));
    }

    #[test]
    fn test_derived_set_keeps_earlier_adjustments() {
        let mut set = sample_set();
        set.apply(&edit("Q1", FieldUpdates::new().question_type(QuestionType::Numeric), &[]))
            .unwrap();

        let function = EditFunction::derive(|qs| {
            let fresh = QuestionSet::from_records(qs.iter().cloned())?;
            fresh.with_edited_question(
                "feeling",
                FieldUpdates::new().question_type(QuestionType::FreeText),
                &[],
            )
        });
        set.apply(&EditOperation::ApplyFunction(function)).unwrap();

        let cleared: Vec<&str> = set
            .adjustments()
            .iter()
            .map(|Adjustment::OptionsCleared { id, .. }| id.as_str())
            .collect();
        assert_eq!(cleared, vec!["Q1", "Q2"]);
    }

    #[test]
    fn test_apply_function_rejects_new_ids() {
        let mut set = sample_set();
        let function = EditFunction::derive(|_| {
            QuestionSet::from_records([QuestionRecord::new(
                "Q99",
                "intruder",
                QuestionType::FreeText,
                "Where did I come from?",
            )])
        });

        let err = EditOperation::ApplyFunction(function)
            .apply_to(&mut set)
            .unwrap_err();
        assert!(matches!(err, ConjureError::InvariantViolation(_)));
    }

    #[test]
    fn test_description() {
        let op = edit(
            "Q2",
            FieldUpdates::new().question_type(QuestionType::FreeText),
            &[Field::QuestionOptions],
        );
        assert_eq!(
            op.description(),
            "Edit 'Q2': set question_type, pop question_options"
        );

        let op = EditOperation::ApplyFunction(EditFunction::in_place(|_| Ok(())).named("cleanup"));
        assert_eq!(op.description(), "Apply edit function 'cleanup'");
    }
}

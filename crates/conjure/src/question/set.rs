//! Ordered, validated collection of questions.

use std::collections::{BTreeSet, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::edit::{Adjustment, EditOperation, OptionsPolicy};
use crate::error::{ConjureError, Result};

use super::naming;
use super::record::QuestionRecord;
use super::types::QuestionId;

/// Questions keyed by stable id, in inference order.
///
/// Invariants, checked after every operation:
/// - names are unique and valid identifiers
/// - ids are unique, match their record, and are never reused once dropped
/// - types that forbid options carry none; choice types carry some
///
/// Deserializing re-checks the invariants, so a saved set round-trips
/// through JSON but a corrupted one is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedQuestionSet")]
pub struct QuestionSet {
    pub(crate) records: IndexMap<QuestionId, QuestionRecord>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub(crate) retired: BTreeSet<QuestionId>,
    pub(crate) policy: OptionsPolicy,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) adjustments: Vec<Adjustment>,
}

#[derive(Deserialize)]
struct UncheckedQuestionSet {
    records: IndexMap<QuestionId, QuestionRecord>,
    #[serde(default)]
    retired: BTreeSet<QuestionId>,
    #[serde(default)]
    policy: OptionsPolicy,
    #[serde(default)]
    adjustments: Vec<Adjustment>,
}

impl TryFrom<UncheckedQuestionSet> for QuestionSet {
    type Error = ConjureError;

    fn try_from(raw: UncheckedQuestionSet) -> Result<Self> {
        let set = QuestionSet {
            records: raw.records,
            retired: raw.retired,
            policy: raw.policy,
            adjustments: raw.adjustments,
        };
        set.validate()?;
        Ok(set)
    }
}

impl QuestionSet {
    /// Create an empty set with the default options policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from records, checking every invariant.
    pub fn from_records(records: impl IntoIterator<Item = QuestionRecord>) -> Result<Self> {
        let mut set = Self::new();
        for record in records {
            set.insert(record)?;
        }
        Ok(set)
    }

    /// Set the policy used when a type change leaves options behind.
    pub fn with_policy(mut self, policy: OptionsPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Append a record at the end of the set.
    pub fn insert(&mut self, record: QuestionRecord) -> Result<()> {
        if self.records.contains_key(&record.id) {
            return Err(ConjureError::InvariantViolation(format!(
                "question id '{}' is already present",
                record.id
            )));
        }
        if self.retired.contains(&record.id) {
            return Err(ConjureError::InvariantViolation(format!(
                "question id '{}' was dropped and cannot be reused",
                record.id
            )));
        }
        if !naming::is_valid_name(&record.name) {
            return Err(ConjureError::invalid_field(
                "name",
                format!("'{}' is not a valid question name", record.name),
            ));
        }
        if self.contains_name(&record.name) {
            return Err(ConjureError::DuplicateName { name: record.name });
        }
        if let Some(problem) = record.consistency_error() {
            return Err(ConjureError::InvariantViolation(problem));
        }
        self.records.insert(record.id.clone(), record);
        Ok(())
    }

    /// Apply an operation atomically: either every change lands or none do.
    pub fn apply(&mut self, operation: &EditOperation) -> Result<()> {
        let mut candidate = self.clone();
        operation.apply_to(&mut candidate)?;
        candidate.validate()?;
        debug!(operation = %operation.description(), "applied question edit");
        *self = candidate;
        Ok(())
    }

    /// Re-check every invariant.
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::with_capacity(self.records.len());
        for (id, record) in &self.records {
            if id != &record.id {
                return Err(ConjureError::InvariantViolation(format!(
                    "record '{}' is stored under id '{}'",
                    record.id, id
                )));
            }
            if self.retired.contains(id) {
                return Err(ConjureError::InvariantViolation(format!(
                    "retired question id '{}' is in use",
                    id
                )));
            }
            if !names.insert(record.name.as_str()) {
                return Err(ConjureError::InvariantViolation(format!(
                    "question name '{}' is used more than once",
                    record.name
                )));
            }
            if !naming::is_valid_name(&record.name) {
                return Err(ConjureError::InvariantViolation(format!(
                    "'{}' is not a valid question name",
                    record.name
                )));
            }
            if let Some(problem) = record.consistency_error() {
                return Err(ConjureError::InvariantViolation(problem));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records in order.
    pub fn iter(&self) -> impl Iterator<Item = &QuestionRecord> {
        self.records.values()
    }

    /// Current names, in order.
    pub fn names(&self) -> Vec<&str> {
        self.records.values().map(|r| r.name.as_str()).collect()
    }

    /// Ids, in order.
    pub fn ids(&self) -> impl Iterator<Item = &QuestionId> {
        self.records.keys()
    }

    /// Look up a record by its current name.
    pub fn get(&self, name: &str) -> Option<&QuestionRecord> {
        self.records.values().find(|r| r.name == name)
    }

    /// Look up a record by id.
    pub fn get_by_id(&self, id: &QuestionId) -> Option<&QuestionRecord> {
        self.records.get(id)
    }

    /// Position of a question (by id) within the set.
    pub fn position(&self, id: &QuestionId) -> Option<usize> {
        self.records.get_index_of(id)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Resolve a current name to its id.
    pub fn resolve(&self, name: &str) -> Result<&QuestionId> {
        self.get(name)
            .map(|r| &r.id)
            .ok_or_else(|| ConjureError::unknown(name))
    }

    /// Whether `id` belonged to a question that has been dropped.
    pub fn is_retired(&self, id: &QuestionId) -> bool {
        self.retired.contains(id)
    }

    pub fn policy(&self) -> OptionsPolicy {
        self.policy
    }

    /// Non-fatal adjustments made while applying operations.
    pub fn adjustments(&self) -> &[Adjustment] {
        &self.adjustments
    }
}

impl<'a> IntoIterator for &'a QuestionSet {
    type Item = &'a QuestionRecord;
    type IntoIter = indexmap::map::Values<'a, QuestionId, QuestionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::FieldUpdates;
    use crate::question::QuestionType;

    fn sample_set() -> QuestionSet {
        QuestionSet::from_records([
            QuestionRecord::new("Q1", "morning", QuestionType::MultipleChoice, "Morning?")
                .with_options([1, 2, 3]),
            QuestionRecord::new("Q2", "feeling", QuestionType::FreeText, "Feeling?"),
        ])
        .unwrap()
    }

    #[test]
    fn test_insert_preserves_order() {
        let set = sample_set();
        assert_eq!(set.names(), vec!["morning", "feeling"]);
        assert_eq!(set.position(&QuestionId::new("Q2")), Some(1));
        assert_eq!(set.resolve("feeling").unwrap().as_str(), "Q2");
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut set = sample_set();
        let err = set
            .insert(QuestionRecord::new("Q3", "morning", QuestionType::FreeText, "Again"))
            .unwrap_err();
        assert!(matches!(err, ConjureError::DuplicateName { .. }));

        let err = set
            .insert(QuestionRecord::new("Q1", "other", QuestionType::FreeText, "Again"))
            .unwrap_err();
        assert!(matches!(err, ConjureError::InvariantViolation(_)));
    }

    #[test]
    fn test_insert_rejects_inconsistent_record() {
        let mut set = QuestionSet::new();
        let err = set
            .insert(QuestionRecord::new("Q1", "pick", QuestionType::MultipleChoice, "Pick"))
            .unwrap_err();
        assert!(matches!(err, ConjureError::InvariantViolation(_)));
        assert!(set.is_empty());
    }

    #[test]
    fn test_dropped_id_cannot_be_reinserted() {
        let mut set = sample_set();
        set.apply(&EditOperation::DropQuestions {
            names: ["feeling".to_string()].into(),
        })
        .unwrap();

        let err = set
            .insert(QuestionRecord::new("Q2", "feeling", QuestionType::FreeText, "Back"))
            .unwrap_err();
        assert!(matches!(err, ConjureError::InvariantViolation(_)));
    }

    #[test]
    fn test_apply_is_atomic() {
        let mut set = sample_set();
        let before = set.clone();

        let err = set
            .apply(&EditOperation::EditFields {
                id: QuestionId::new("Q1"),
                updates: FieldUpdates::new().text("Changed").options(Vec::<i64>::new()),
                pop_fields: Vec::new(),
            })
            .unwrap_err();

        assert!(matches!(err, ConjureError::InvalidFieldValue { .. }));
        assert_eq!(set, before);
    }

    #[test]
    fn test_validate_detects_corruption() {
        let mut set = sample_set();
        set.records.get_index_mut(1).unwrap().1.name = "morning".to_string();
        assert!(matches!(
            set.validate(),
            Err(ConjureError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_serialize_in_order() {
        let json = serde_json::to_value(sample_set()).unwrap();
        let keys: Vec<&String> = json["records"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["Q1", "Q2"]);
        assert_eq!(json["policy"], "auto_clear");
    }

    #[test]
    fn test_json_round_trip() {
        let mut set = sample_set().with_policy(OptionsPolicy::Strict);
        set.apply(&EditOperation::DropQuestions {
            names: ["feeling".to_string()].into(),
        })
        .unwrap();

        let json = serde_json::to_string(&set).unwrap();
        let restored: QuestionSet = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, set);
        assert!(restored.is_retired(&QuestionId::new("Q2")));
    }

    #[test]
    fn test_deserialize_rejects_broken_invariants() {
        let json = r#"{"records": {
            "Q1": {"id": "Q1", "name": "pick", "question_type": "multiple_choice", "question_text": "Pick"}
        }}"#;
        assert!(serde_json::from_str::<QuestionSet>(json).is_err());

        let json = r#"{"records": {
            "Q1": {"id": "Q1", "name": "notes", "question_type": "free_text", "question_text": "Notes"}
        }}"#;
        let set: QuestionSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.policy(), OptionsPolicy::AutoClear);
        assert_eq!(set.names(), vec!["notes"]);
    }
}

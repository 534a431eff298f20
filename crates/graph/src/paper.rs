//! Paper batch input
//!
//! A batch is the per-paper output of concept extraction, keyed by paper
//! id and kept in insertion order. Insertion order is what the reading
//! order falls back to and how ties between independent papers are broken.

use learnpilot_common::errors::{AppError, Result};
use learnpilot_common::Difficulty;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::io::Read;

/// Concepts extracted for a single paper
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperConcepts {
    /// Concepts the paper introduces or covers
    pub concepts: BTreeSet<String>,

    /// Concepts the reader is assumed to know already
    pub prerequisites: BTreeSet<String>,

    /// Difficulty reported by paper analysis
    #[serde(default, alias = "difficulty_level")]
    pub difficulty: Difficulty,
}

impl PaperConcepts {
    pub fn new<C, P, S>(concepts: C, prerequisites: P) -> Self
    where
        C: IntoIterator<Item = S>,
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            concepts: concepts.into_iter().map(Into::into).collect(),
            prerequisites: prerequisites.into_iter().map(Into::into).collect(),
            difficulty: Difficulty::default(),
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }
}

/// Insertion-ordered batch of papers with unique ids
#[derive(Debug, Clone, Default)]
pub struct PaperBatch {
    entries: Vec<(String, PaperConcepts)>,
    index: HashMap<String, usize>,
}

impl PaperBatch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a paper. Ids must be non-empty and unique within the batch.
    pub fn insert(&mut self, id: impl Into<String>, paper: PaperConcepts) -> Result<()> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(AppError::invalid_paper(id, "paper id must not be empty"));
        }
        if self.index.contains_key(&id) {
            return Err(AppError::DuplicatePaper { id });
        }

        self.index.insert(id.clone(), self.entries.len());
        self.entries.push((id, paper));
        Ok(())
    }

    /// Build a batch from `(id, concepts)` pairs, failing on the first bad id
    pub fn try_from_iter<I, S>(papers: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, PaperConcepts)>,
        S: Into<String>,
    {
        let mut batch = Self::new();
        for (id, paper) in papers {
            batch.insert(id, paper)?;
        }
        Ok(batch)
    }

    /// Parse a batch from a JSON object keyed by paper id.
    ///
    /// Each entry must deserialize as [`PaperConcepts`]; a failure is
    /// reported against the paper it came from.
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| AppError::Validation {
            message: "paper batch must be a JSON object keyed by paper id".to_string(),
            field: None,
        })?;

        let mut batch = Self::new();
        for (id, entry) in object {
            let paper = PaperConcepts::deserialize(entry)
                .map_err(|e| AppError::invalid_paper(id.as_str(), e.to_string()))?;
            batch.insert(id.as_str(), paper)?;
        }

        tracing::debug!(papers = batch.len(), "Paper batch parsed");
        Ok(batch)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_json(&value)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_json(&value)
    }

    pub fn get(&self, id: &str) -> Option<&PaperConcepts> {
        self.index.get(id).map(|&i| &self.entries[i].1)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Papers in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PaperConcepts)> {
        self.entries.iter().map(|(id, paper)| (id.as_str(), paper))
    }

    /// Paper ids in insertion order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use learnpilot_common::errors::ErrorCode;
    use serde_json::json;

    #[test]
    fn test_insert_keeps_order() {
        let mut batch = PaperBatch::new();
        batch.insert("b", PaperConcepts::default()).unwrap();
        batch.insert("a", PaperConcepts::default()).unwrap();
        batch.insert("c", PaperConcepts::default()).unwrap();

        let ids: Vec<&str> = batch.ids().collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert_eq!(batch.len(), 3);
        assert!(batch.contains("a"));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut batch = PaperBatch::new();
        batch.insert("P1", PaperConcepts::default()).unwrap();
        let err = batch.insert("P1", PaperConcepts::default()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::DuplicatePaper);
        assert_eq!(err.paper_id(), Some("P1"));
    }

    #[test]
    fn test_empty_id_rejected() {
        let err = PaperBatch::try_from_iter([("  ", PaperConcepts::default())]).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidPaper);
    }

    #[test]
    fn test_from_json_preserves_key_order() {
        let value = json!({
            "zeta": {"concepts": ["attention"], "prerequisites": []},
            "alpha": {"concepts": ["transformer"], "prerequisites": ["attention"], "difficulty_level": "advanced"},
        });
        let batch = PaperBatch::from_json(&value).unwrap();

        let ids: Vec<&str> = batch.ids().collect();
        assert_eq!(ids, vec!["zeta", "alpha"]);

        let alpha = batch.get("alpha").unwrap();
        assert_eq!(alpha.difficulty, Difficulty::Advanced);
        assert!(alpha.prerequisites.contains("attention"));
        assert_eq!(batch.get("zeta").unwrap().difficulty, Difficulty::Intermediate);
    }

    #[test]
    fn test_from_json_concepts_not_a_list() {
        let value = json!({
            "P1": {"concepts": ["attention"], "prerequisites": []},
            "P2": {"concepts": 42, "prerequisites": []},
        });
        let err = PaperBatch::from_json(&value).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidPaper);
        assert_eq!(err.paper_id(), Some("P2"));
        assert!(err.to_string().contains("expected a sequence"));
    }

    #[test]
    fn test_from_json_missing_and_null_fields() {
        let missing = json!({"P1": {"concepts": []}});
        let err = PaperBatch::from_json(&missing).unwrap_err();
        assert_eq!(err.paper_id(), Some("P1"));
        assert!(err.to_string().contains("prerequisites"));

        let null = json!({"P3": {"concepts": null, "prerequisites": []}});
        let err = PaperBatch::from_json(&null).unwrap_err();
        assert_eq!(err.paper_id(), Some("P3"));
    }

    #[test]
    fn test_from_json_non_string_concept() {
        let value = json!({"P1": {"concepts": ["ok", 7], "prerequisites": []}});
        let err = PaperBatch::from_json(&value).unwrap_err();
        assert_eq!(err.paper_id(), Some("P1"));
        assert!(err.to_string().contains("expected a string"));
    }

    #[test]
    fn test_from_json_difficulty_must_be_a_level() {
        let value = json!({"P1": {"concepts": [], "prerequisites": [], "difficulty": null}});
        let err = PaperBatch::from_json(&value).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidPaper);
        assert_eq!(err.paper_id(), Some("P1"));
    }

    #[test]
    fn test_from_json_matches_derived_deserialize() {
        let entry = json!({
            "concepts": ["bert", "masked lm"],
            "prerequisites": ["transformer"],
            "difficulty_level": "advanced",
            "summary": "extra extraction fields are ignored"
        });
        let batch = PaperBatch::from_json(&json!({"P1": entry.clone()})).unwrap();
        let direct: PaperConcepts = serde_json::from_value(entry).unwrap();

        assert_eq!(batch.get("P1"), Some(&direct));
        assert_eq!(direct.difficulty, Difficulty::Advanced);
    }

    #[test]
    fn test_from_json_bad_difficulty() {
        let value = json!({"P1": {"concepts": [], "prerequisites": [], "difficulty": "expert"}});
        let err = PaperBatch::from_json(&value).unwrap_err();
        assert_eq!(err.paper_id(), Some("P1"));
        assert!(err.to_string().contains("expert"));
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        let err = PaperBatch::from_json(&json!(["P1", "P2"])).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
    }

    #[test]
    fn test_from_json_empty_object() {
        let batch = PaperBatch::from_json_str("{}").unwrap();
        assert!(batch.is_empty());
    }

    #[test]
    fn test_duplicate_concepts_collapse() {
        let paper = PaperConcepts::new(["rnn", "rnn", "lstm"], Vec::<&str>::new());
        assert_eq!(paper.concepts.len(), 2);
    }
}

//! Status and priority vocabularies.
//!
//! The service's status and priority sets are configuration, not code: each
//! vocabulary is an ordered list of `{value, label}` entries validated once
//! at load time. Rendering consults the vocabulary for labels; values the
//! vocabulary does not know echo through unchanged.

use serde::{Deserialize, Serialize};
use unicase::UniCase;

use crate::error::DeskError;

/// One recognized value and its human-readable label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabEntry {
    pub value: String,
    pub label: String,
}

impl VocabEntry {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// An ordered, validated vocabulary. Order is display order: the board
/// renders one column per entry, stats cards list entries in this order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<VocabEntry>", into = "Vec<VocabEntry>")]
pub struct Vocabulary {
    entries: Vec<VocabEntry>,
}

impl Vocabulary {
    /// Build a vocabulary, rejecting empty lists and duplicate values.
    pub fn new(entries: Vec<VocabEntry>) -> Result<Self, DeskError> {
        if entries.is_empty() {
            return Err(DeskError::Vocabulary(
                "vocabulary must contain at least one entry".to_string(),
            ));
        }
        for (i, entry) in entries.iter().enumerate() {
            if entry.value.trim().is_empty() {
                return Err(DeskError::Vocabulary(format!(
                    "entry {} has an empty value",
                    i
                )));
            }
            if entries[..i]
                .iter()
                .any(|prior| UniCase::new(&prior.value) == UniCase::new(&entry.value))
            {
                return Err(DeskError::Vocabulary(format!(
                    "duplicate value '{}'",
                    entry.value
                )));
            }
        }
        Ok(Self { entries })
    }

    /// The service's ticket workflow states.
    pub fn default_statuses() -> Self {
        Self {
            entries: vec![
                VocabEntry::new("open", "Open"),
                VocabEntry::new("in_progress", "In Progress"),
                VocabEntry::new("waiting_for_customer", "Waiting on Customer"),
                VocabEntry::new("resolved", "Resolved"),
            ],
        }
    }

    /// The service's ticket priorities.
    pub fn default_priorities() -> Self {
        Self {
            entries: vec![
                VocabEntry::new("low", "Low"),
                VocabEntry::new("medium", "Medium"),
                VocabEntry::new("high", "High"),
                VocabEntry::new("critical", "Critical"),
            ],
        }
    }

    pub fn entries(&self) -> &[VocabEntry] {
        &self.entries
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Map a value to its label; unknown values echo through unchanged.
    pub fn label_for<'a>(&'a self, value: &'a str) -> &'a str {
        self.entries
            .iter()
            .find(|e| e.value == value)
            .map(|e| e.label.as_str())
            .unwrap_or(value)
    }

    /// Resolve a possibly differently-cased value to its canonical spelling.
    pub fn canonical(&self, value: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| UniCase::new(e.value.as_str()) == UniCase::new(value))
            .map(|e| e.value.as_str())
    }
}

impl TryFrom<Vec<VocabEntry>> for Vocabulary {
    type Error = DeskError;

    fn try_from(entries: Vec<VocabEntry>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<Vocabulary> for Vec<VocabEntry> {
    fn from(vocab: Vocabulary) -> Self {
        vocab.entries
    }
}

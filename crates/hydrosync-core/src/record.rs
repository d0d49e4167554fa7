//! Process records and the tag model.
//!
//! A discovered process carries an ordered list of name/value tags.
//! Duplicate names are allowed; lookups are first-match-wins.

use serde::{Deserialize, Serialize};

/// Tag values containing any of these substrings (case-insensitive) are
/// considered noise when a category opts into filtering.
pub const NOISE_MARKERS: &[&str] = &["test", "example", "copy"];

/// A single name/value tag attached to a process record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One element of an indexing-service filter predicate: a tag name and the
/// set of values it may take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagMatch {
    pub name: String,
    pub values: Vec<String>,
}

/// A discovered compute-process candidate.
///
/// Created per page of discovery results, consumed once by the coordinator,
/// and never mutated in between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRecord {
    /// Opaque unique identifier assigned by the indexing service.
    pub id: String,
    /// Ordered tag list; duplicate names allowed.
    pub tags: Vec<Tag>,
}

impl ProcessRecord {
    /// Value of the first tag with the given name, if any.
    ///
    /// First-match-wins: when duplicate names exist, later occurrences are
    /// ignored.
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.value.as_str())
    }

    /// The record's variant marker, when present.
    pub fn variant(&self) -> Option<&str> {
        self.tag("Variant")
    }

    /// Whether any tag value matches the noise predicate.
    pub fn has_noise_tags(&self) -> bool {
        self.tags.iter().any(|t| is_noise_value(&t.value))
    }
}

/// Case-insensitive substring match against [`NOISE_MARKERS`].
pub fn is_noise_value(value: &str) -> bool {
    let lowered = value.to_ascii_lowercase();
    NOISE_MARKERS.iter().any(|m| lowered.contains(m))
}

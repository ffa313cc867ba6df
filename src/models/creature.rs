//! Canonical creature record.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A creature as seen by the rest of the pipeline, independent of which
/// upstream shape it was decoded from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatureRecord {
    /// Catalog identifier (absent for the bulk endpoint)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,

    /// Display name, also the search key
    pub name: String,

    /// Primary image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Level labels; the first one is the current level
    #[serde(default)]
    pub levels: Vec<String>,
}

/// Identity used for deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKey {
    Id(u32),
    /// Fallback for records that carry no identifier
    Name(String),
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::Id(id) => write!(f, "#{id}"),
            RecordKey::Name(name) => write!(f, "{name}"),
        }
    }
}

impl CreatureRecord {
    /// Create a record with an identifier and no image or levels.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
            image: None,
            levels: Vec::new(),
        }
    }

    /// Add a level label.
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.levels.push(level.into());
        self
    }

    /// Set the image URL.
    pub fn with_image(mut self, href: impl Into<String>) -> Self {
        self.image = Some(href.into());
        self
    }

    /// Deduplication key: the identifier, or the name when no identifier exists.
    pub fn key(&self) -> RecordKey {
        match self.id {
            Some(id) => RecordKey::Id(id),
            None => RecordKey::Name(self.name.clone()),
        }
    }

    /// The level used for sorting and display.
    pub fn current_level(&self) -> Option<&str> {
        self.levels.first().map(String::as_str)
    }
}

//! Catalog and view state.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::CreatureRecord;

/// Ordering applied by the view projection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortCriterion {
    /// Keep the accumulated order
    #[default]
    None,
    Name,
    /// By current (first) level label
    Level,
}

impl FromStr for SortCriterion {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "name" | "by-name" => Ok(Self::Name),
            "level" | "by-level" => Ok(Self::Level),
            other => Err(AppError::validation(format!(
                "unknown sort criterion '{other}' (expected none, name or level)"
            ))),
        }
    }
}

impl fmt::Display for SortCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortCriterion::None => "none",
            SortCriterion::Name => "name",
            SortCriterion::Level => "level",
        };
        f.write_str(s)
    }
}

/// User-controlled view inputs. Independent of fetch completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub search: String,
    pub sort: SortCriterion,
}

impl ViewState {
    pub fn new(search: impl Into<String>, sort: SortCriterion) -> Self {
        Self {
            search: search.into(),
            sort,
        }
    }
}

/// Accumulated catalog data and loading flags.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogState {
    /// Records unique by key, in first-seen order
    pub records: Vec<CreatureRecord>,

    /// Next identifier to request
    pub cursor: u32,

    /// False once a batch came back empty
    pub has_more: bool,

    /// A batch is in flight
    pub loading: bool,

    /// Message of the last fatal load failure
    pub last_error: Option<String>,

    /// Bumped whenever `records` changes; identifies a records snapshot
    pub generation: u64,

    /// Time of the last successful merge
    pub updated_at: Option<DateTime<Utc>>,
}

impl CatalogState {
    /// Empty state with the cursor at `first_id`.
    pub fn new(first_id: u32) -> Self {
        Self {
            records: Vec::new(),
            cursor: first_id,
            has_more: true,
            loading: false,
            last_error: None,
            generation: 0,
            updated_at: None,
        }
    }

    /// Start over with an empty state at `first_id`. The generation keeps
    /// increasing so that a new records snapshot never reuses an old one.
    pub fn reset(&mut self, first_id: u32) {
        let generation = self.generation + 1;
        *self = Self::new(first_id);
        self.generation = generation;
    }

    /// Replace the records and mark the snapshot as changed.
    pub fn replace_records(&mut self, records: Vec<CreatureRecord>) {
        self.records = records;
        self.generation += 1;
        self.updated_at = Some(Utc::now());
    }
}

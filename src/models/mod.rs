// src/models/mod.rs

//! Domain models for the catalog client.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod creature;
mod state;
pub mod wire;

// Re-export all public types
pub use config::{ApiConfig, ApiShape, Config, FetcherConfig, LoggingConfig};
pub use creature::{CreatureRecord, RecordKey};
pub use state::{CatalogState, SortCriterion, ViewState};

//! Catalog data pipeline: Fetcher → dedup merge → view projection.
//!
//! - `merge`: Combine accumulated and newly fetched records by key
//! - `merge_filling`: Same, keeping known levels and images for partial records
//! - `project`: Filter and sort records for display
//! - `CatalogSession`: Drive initial load, load-more and reload

mod merge;
mod project;
mod session;

pub use merge::{merge, merge_filling};
pub use project::{ProjectionCache, collate, project};
pub use session::{CatalogSession, LoadOutcome};

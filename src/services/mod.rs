//! Service layer for the catalog client.
//!
//! This module contains the data access logic for:
//! - Upstream access (`CreatureSource`, `HttpSource`)
//! - Batched, deduplicated identifier fetching (`Fetcher`)

mod fetcher;
mod source;

#[cfg(test)]
pub(crate) mod fake;

pub use fetcher::{Batch, Fetcher};
pub use source::{CreatureSource, HttpSource};

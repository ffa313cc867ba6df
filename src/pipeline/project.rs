// src/pipeline/project.rs

//! View projection: filter by search text, then sort.

use std::cmp::Ordering;

use crate::models::{CreatureRecord, SortCriterion, ViewState};

/// Compare two display strings the way a reader expects: case-folded first,
/// with the raw strings as a tiebreak so the order is total.
pub fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Filter `records` by `search` and order them by `sort`.
///
/// Matching is a case-insensitive substring test on the name; blank search
/// text matches everything. Sorting is stable, and a record without a level
/// sorts as an empty label (first). Pure: identical inputs always yield
/// identical output.
pub fn project<'a>(
    records: &'a [CreatureRecord],
    search: &str,
    sort: SortCriterion,
) -> Vec<&'a CreatureRecord> {
    let needle = search.trim().to_lowercase();
    let mut rows: Vec<&CreatureRecord> = records
        .iter()
        .filter(|r| needle.is_empty() || r.name.to_lowercase().contains(&needle))
        .collect();

    match sort {
        SortCriterion::None => {}
        SortCriterion::Name => rows.sort_by(|a, b| collate(&a.name, &b.name)),
        SortCriterion::Level => rows.sort_by(|a, b| {
            collate(
                a.current_level().unwrap_or_default(),
                b.current_level().unwrap_or_default(),
            )
        }),
    }

    rows
}

/// Memoized [`project`], recomputed only when the records snapshot, the
/// search text or the sort criterion changes.
#[derive(Debug, Default)]
pub struct ProjectionCache {
    key: Option<(u64, String, SortCriterion)>,
    rows: Vec<CreatureRecord>,
    recomputed: usize,
}

impl ProjectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Projected rows for `records` identified by `generation`.
    pub fn get(
        &mut self,
        generation: u64,
        records: &[CreatureRecord],
        view: &ViewState,
    ) -> &[CreatureRecord] {
        let fresh = matches!(
            &self.key,
            Some((g, search, sort)) if *g == generation && *search == view.search && *sort == view.sort
        );

        if !fresh {
            self.rows = project(records, &view.search, view.sort)
                .into_iter()
                .cloned()
                .collect();
            self.key = Some((generation, view.search.clone(), view.sort));
            self.recomputed += 1;
        }

        &self.rows
    }

    /// How many times the projection has been computed.
    pub fn recomputations(&self) -> usize {
        self.recomputed
    }

    /// Drop the cached rows.
    pub fn invalidate(&mut self) {
        self.key = None;
        self.rows.clear();
    }
}

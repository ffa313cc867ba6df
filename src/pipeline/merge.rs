// src/pipeline/merge.rs

//! Deduplicating merge of record lists.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::models::{CreatureRecord, RecordKey};

/// Merge `incoming` into `existing`, unique by [`RecordKey`].
///
/// New keys are appended in arrival order. A record whose key is already
/// present replaces the earlier one in place, so first-seen order is kept
/// for every key and the newest value wins. Duplicates within `incoming`
/// collapse the same way.
pub fn merge(existing: &[CreatureRecord], incoming: Vec<CreatureRecord>) -> Vec<CreatureRecord> {
    let mut merged: Vec<CreatureRecord> = Vec::with_capacity(existing.len() + incoming.len());
    let mut positions: HashMap<RecordKey, usize> = HashMap::new();

    for record in existing.iter().cloned().chain(incoming) {
        match positions.entry(record.key()) {
            Entry::Occupied(slot) => merged[*slot.get()] = record,
            Entry::Vacant(slot) => {
                slot.insert(merged.len());
                merged.push(record);
            }
        }
    }

    merged
}

/// [`merge`] for partial records: an incoming record without levels or
/// without an image takes them from the existing entry with the same key.
pub fn merge_filling(existing: &[CreatureRecord], incoming: Vec<CreatureRecord>) -> Vec<CreatureRecord> {
    let known: HashMap<RecordKey, &CreatureRecord> =
        existing.iter().map(|r| (r.key(), r)).collect();

    let filled = incoming
        .into_iter()
        .map(|mut record| {
            if let Some(previous) = known.get(&record.key()) {
                if record.levels.is_empty() {
                    record.levels = previous.levels.clone();
                }
                if record.image.is_none() {
                    record.image = previous.image.clone();
                }
            }
            record
        })
        .collect();

    merge(existing, filled)
}

// src/pool/results.rs
// =============================================================================
// The aggregation map: outcome category -> references that ended there.
//
// Every worker writes into the same map, so inserts go through one Mutex.
// The lock is only held for a push, never across an .await.
//
// Entries remember their submission sequence number. snapshot() sorts each
// category by it, which makes the final view independent of the order tasks
// happened to finish in.
// =============================================================================

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::sources::Reference;

/// Final, sorted view of a run: category key -> references.
pub type Snapshot = BTreeMap<String, Vec<Reference>>;

#[derive(Debug, Default)]
pub struct ResultMap {
    inner: Mutex<HashMap<String, Vec<(usize, Reference)>>>,
}

impl ResultMap {
    pub fn new() -> Self {
        Self::default()
    }

    // Appends `reference` under `category`, creating the list if needed
    pub fn record(&self, category: impl Into<String>, seq: usize, reference: Reference) {
        self.lock()
            .entry(category.into())
            .or_default()
            .push((seq, reference));
    }

    /// Total number of recorded references across all categories
    pub fn len(&self) -> usize {
        self.lock().values().map(Vec::len).sum()
    }

    // Stable, sorted copy of everything recorded so far
    //
    // Keys come out in lexicographic order (BTreeMap), references within a
    // key in submission order.
    pub fn snapshot(&self) -> Snapshot {
        self.lock()
            .iter()
            .map(|(category, entries)| {
                let mut entries = entries.clone();
                entries.sort_by_key(|(seq, _)| *seq);
                let refs = entries.into_iter().map(|(_, r)| r).collect();
                (category.clone(), refs)
            })
            .collect()
    }

    // A panic inside record() cannot leave a half-pushed Vec behind, so a
    // poisoned lock still guards consistent data.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<(usize, Reference)>>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

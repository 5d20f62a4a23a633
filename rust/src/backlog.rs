//! Backlog ordering for the scheduler.
//!
//! Merged source lists are ordered by:
//! - bucket (curriculum group, after delay overrides), ascending
//! - frequency rank, ascending, with unranked units last
//! - normalized form, as an alphabetic tie-break
//!
//! Units that compare equal keep their source order.

use std::cmp::Ordering;

use crate::models::{LookupStore, Unit};

/// Sort key for backlog ordering (lower = earlier in the curriculum).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BacklogKey {
    pub bucket: u32,
    pub rank: Option<u32>,
    pub form: String,
}

impl BacklogKey {
    pub fn for_unit(unit: &Unit) -> Self {
        Self {
            bucket: unit.bucket,
            rank: unit.frequency_rank,
            form: unit.normalized_form.clone(),
        }
    }
}

/// Known ranks sort before unknown ones.
fn cmp_rank(a: Option<u32>, b: Option<u32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl Ord for BacklogKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.bucket
            .cmp(&other.bucket)
            .then(cmp_rank(self.rank, other.rank))
            .then_with(|| self.form.cmp(&other.form))
    }
}

impl PartialOrd for BacklogKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Fill in lookup-derived fields of a source unit.
fn prepare_unit(mut unit: Unit, lookups: &LookupStore) -> Unit {
    if let Some(bucket) = lookups.delay(&unit.normalized_form) {
        unit.bucket = bucket;
    }
    if unit.frequency_rank.is_none() {
        unit.frequency_rank = lookups.frequency_rank(&unit.normalized_form);
    }
    // A word is built from its characters; a character's structure stays in the lookup
    if unit.decomposition.is_empty() && unit.is_word() {
        unit.decomposition = unit.normalized_form.chars().map(String::from).collect();
    }
    unit
}

/// Build the scheduler's input backlog from merged source lists.
///
/// Applies delay overrides, fills missing ranks and word decompositions,
/// then stable-sorts by `BacklogKey`.
pub fn build_backlog(sources: Vec<Unit>, lookups: &LookupStore) -> Vec<Unit> {
    let mut keyed: Vec<(BacklogKey, Unit)> = sources
        .into_iter()
        .map(|unit| {
            let unit = prepare_unit(unit, lookups);
            (BacklogKey::for_unit(&unit), unit)
        })
        .collect();

    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    keyed.into_iter().map(|(_, unit)| unit).collect()
}

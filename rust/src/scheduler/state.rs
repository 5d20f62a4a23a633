//! Learned set and ordered output for one scheduling run.

use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeSet;

use crate::models::{BucketTag, Unit, UnitKey};

/// Mutable state owned by a single scheduling run.
///
/// `ordered` is append-only; `learned` only grows.
#[derive(Debug, Default)]
pub struct CurriculumState {
    learned: FxHashSet<String>,
    ordered: Vec<Unit>,
    /// Output position per (form, reading)
    by_key: FxHashMap<UnitKey, usize>,
    /// First output position per form
    first_by_form: FxHashMap<String, usize>,
}

impl CurriculumState {
    /// Start with every baseline form already learned.
    pub fn new<'a>(baseline: impl Iterator<Item = &'a str>, capacity: usize) -> Self {
        let mut learned = FxHashSet::with_capacity_and_hasher(capacity, Default::default());
        learned.extend(baseline.map(str::to_string));
        Self {
            learned,
            ordered: Vec::with_capacity(capacity),
            by_key: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            first_by_form: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    #[inline]
    pub fn is_learned(&self, form: &str) -> bool {
        self.learned.contains(form)
    }

    /// Output entry a duplicate with `key` should merge into.
    ///
    /// An entry with the same reading wins; otherwise the form's first entry,
    /// unless `exact` is set.
    pub fn find_entry(&self, key: &UnitKey, exact: bool) -> Option<usize> {
        self.by_key.get(key).copied().or_else(|| {
            if exact {
                None
            } else {
                self.first_by_form.get(&key.form).copied()
            }
        })
    }

    /// Append `unit` to the output and mark its form learned.
    pub fn push(&mut self, unit: Unit) -> usize {
        let position = self.ordered.len();
        self.by_key.entry(unit.key()).or_insert(position);
        self.first_by_form
            .entry(unit.normalized_form.clone())
            .or_insert(position);
        self.learned.insert(unit.normalized_form.clone());
        self.ordered.push(unit);
        position
    }

    pub fn merge_tags(&mut self, position: usize, tags: &BTreeSet<BucketTag>) -> bool {
        self.ordered[position].merge_tags(tags)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Consume the state into the ordered output and learned forms.
    pub fn finish(self) -> (Vec<Unit>, FxHashSet<String>) {
        (self.ordered, self.learned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(form: &str, pinyin: &str) -> UnitKey {
        UnitKey {
            form: form.to_string(),
            pinyin: pinyin.to_string(),
        }
    }

    #[test]
    fn test_baseline_is_learned_without_entries() {
        let state = CurriculumState::new(["女", "马"].into_iter(), 4);

        assert!(state.is_learned("女"));
        assert!(!state.is_learned("好"));
        assert_eq!(state.find_entry(&key("女", ""), false), None);
        assert_eq!(state.len(), 0);
    }

    #[test]
    fn test_find_entry_prefers_matching_reading() {
        let mut state = CurriculumState::new(std::iter::empty(), 4);
        state.push(Unit::new("行", 1).with_pinyin("xíng"));
        state.push(Unit::new("行", 2).with_pinyin("háng"));

        assert_eq!(state.find_entry(&key("行", "háng"), true), Some(1));
        assert_eq!(state.find_entry(&key("行", "hang"), true), None);
        assert_eq!(state.find_entry(&key("行", "hang"), false), Some(0));
    }

    #[test]
    fn test_finish_reports_learned_forms() {
        let mut state = CurriculumState::new(["一"].into_iter(), 2);
        state.push(Unit::new("字", 1));

        let (ordered, learned) = state.finish();
        assert_eq!(ordered.len(), 1);
        assert!(learned.contains("一"));
        assert!(learned.contains("字"));
    }
}

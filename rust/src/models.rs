//! Core data types for curriculum scheduling.

use pyo3::prelude::*;
use std::collections::{BTreeSet, HashMap, HashSet};

// Note: We use std HashMap here for PyO3 interface compatibility

/// Membership of a unit in one source list at one level (e.g. `hsk2` level 3).
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BucketTag {
    #[pyo3(get)]
    pub list: String,
    #[pyo3(get)]
    pub level: u32,
}

impl BucketTag {
    pub fn new(list: impl Into<String>, level: u32) -> Self {
        Self {
            list: list.into(),
            level,
        }
    }

    /// Output label, e.g. `hsk3_1`.
    pub fn label(&self) -> String {
        format!("{}_{}", self.list, self.level)
    }
}

#[pymethods]
impl BucketTag {
    #[new]
    fn py_new(list: String, level: u32) -> Self {
        Self::new(list, level)
    }

    fn __repr__(&self) -> String {
        format!("BucketTag({})", self.label())
    }
}

/// Composite identity of a unit: written form plus reading.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UnitKey {
    pub form: String,
    pub pinyin: String,
}

/// A character or multi-character word eligible for scheduling.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unit {
    #[pyo3(get)]
    pub normalized_form: String,
    #[pyo3(get, set)]
    pub display_form: String,
    #[pyo3(get, set)]
    pub pinyin: String,
    #[pyo3(get, set)]
    pub gloss: String,
    #[pyo3(get, set)]
    pub bucket: u32,
    #[pyo3(get, set)]
    pub frequency_rank: Option<u32>,
    pub bucket_tags: BTreeSet<BucketTag>,
    /// Component forms in order. Empty for atomic or unknown structure.
    #[pyo3(get, set)]
    pub decomposition: Vec<String>,
}

impl Unit {
    /// Creates a backlog unit whose display form equals its normalized form.
    pub fn new(form: impl Into<String>, bucket: u32) -> Self {
        let form = form.into();
        Self {
            display_form: form.clone(),
            normalized_form: form,
            pinyin: String::new(),
            gloss: String::new(),
            bucket,
            frequency_rank: None,
            bucket_tags: BTreeSet::new(),
            decomposition: Vec::new(),
        }
    }

    /// Creates a structural dependency found only through decomposition.
    pub fn component(form: impl Into<String>, decomposition: Vec<String>) -> Self {
        let mut unit = Self::new(form, u32::MAX);
        unit.decomposition = decomposition;
        unit
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display_form = display.into();
        self
    }

    pub fn with_pinyin(mut self, pinyin: impl Into<String>) -> Self {
        self.pinyin = pinyin.into();
        self
    }

    pub fn with_gloss(mut self, gloss: impl Into<String>) -> Self {
        self.gloss = gloss.into();
        self
    }

    pub fn with_rank(mut self, rank: u32) -> Self {
        self.frequency_rank = Some(rank);
        self
    }

    pub fn with_tag(mut self, list: impl Into<String>, level: u32) -> Self {
        self.bucket_tags.insert(BucketTag::new(list, level));
        self
    }

    pub fn with_decomposition<S: Into<String>>(
        mut self,
        components: impl IntoIterator<Item = S>,
    ) -> Self {
        self.decomposition = components.into_iter().map(Into::into).collect();
        self
    }

    /// Number of characters in the normalized form.
    pub fn char_len(&self) -> usize {
        self.normalized_form.chars().count()
    }

    /// A single character.
    pub fn is_atomic(&self) -> bool {
        self.char_len() == 1
    }

    /// More than one character.
    pub fn is_word(&self) -> bool {
        self.char_len() > 1
    }

    pub fn key(&self) -> UnitKey {
        UnitKey {
            form: self.normalized_form.clone(),
            pinyin: self.pinyin.clone(),
        }
    }

    /// Union `other`'s bucket tags into this unit. Returns true if anything was added.
    pub fn merge_tags(&mut self, other: &BTreeSet<BucketTag>) -> bool {
        let before = self.bucket_tags.len();
        self.bucket_tags.extend(other.iter().cloned());
        self.bucket_tags.len() != before
    }
}

#[pymethods]
impl Unit {
    #[new]
    #[pyo3(signature = (
        normalized_form,
        bucket,
        display_form=None,
        pinyin=None,
        gloss=None,
        frequency_rank=None,
        bucket_tags=None,
        decomposition=None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn py_new(
        normalized_form: String,
        bucket: u32,
        display_form: Option<String>,
        pinyin: Option<String>,
        gloss: Option<String>,
        frequency_rank: Option<u32>,
        bucket_tags: Option<Vec<(String, u32)>>,
        decomposition: Option<Vec<String>>,
    ) -> Self {
        let mut unit = Self::new(normalized_form, bucket);
        if let Some(display) = display_form {
            unit.display_form = display;
        }
        unit.pinyin = pinyin.unwrap_or_default();
        unit.gloss = gloss.unwrap_or_default();
        unit.frequency_rank = frequency_rank;
        for (list, level) in bucket_tags.unwrap_or_default() {
            unit.bucket_tags.insert(BucketTag::new(list, level));
        }
        unit.decomposition = decomposition.unwrap_or_default();
        unit
    }

    #[getter(bucket_tags)]
    fn py_bucket_tags(&self) -> Vec<BucketTag> {
        self.bucket_tags.iter().cloned().collect()
    }

    fn __repr__(&self) -> String {
        format!(
            "Unit(form={:?}, bucket={}, rank={:?}, tags={})",
            self.normalized_form,
            self.bucket,
            self.frequency_rank,
            self.bucket_tags.len()
        )
    }
}

/// Immutable lookup tables for one run, keyed by normalized form.
#[pyclass]
#[derive(Clone, Debug, Default)]
pub struct LookupStore {
    pub decomposition: HashMap<String, Vec<String>>,
    pub frequency: HashMap<String, u32>,
    pub numbers: HashSet<String>,
    pub radicals: HashSet<String>,
    /// Forms forced into a given (later) bucket regardless of their source bucket.
    pub delays: HashMap<String, u32>,
}

impl LookupStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_decomposition<S: Into<String>>(
        mut self,
        form: impl Into<String>,
        components: impl IntoIterator<Item = S>,
    ) -> Self {
        self.decomposition.insert(
            form.into(),
            components.into_iter().map(Into::into).collect(),
        );
        self
    }

    pub fn with_frequency(mut self, form: impl Into<String>, rank: u32) -> Self {
        self.frequency.insert(form.into(), rank);
        self
    }

    pub fn with_number(mut self, form: impl Into<String>) -> Self {
        self.numbers.insert(form.into());
        self
    }

    pub fn with_radical(mut self, form: impl Into<String>) -> Self {
        self.radicals.insert(form.into());
        self
    }

    pub fn with_delay(mut self, form: impl Into<String>, bucket: u32) -> Self {
        self.delays.insert(form.into(), bucket);
        self
    }

    /// Known structural breakdown. Empty lists count as absent.
    pub fn decomposition(&self, form: &str) -> Option<&[String]> {
        self.decomposition
            .get(form)
            .map(Vec::as_slice)
            .filter(|c| !c.is_empty())
    }

    #[inline]
    pub fn frequency_rank(&self, form: &str) -> Option<u32> {
        self.frequency.get(form).copied()
    }

    #[inline]
    pub fn is_number(&self, form: &str) -> bool {
        self.numbers.contains(form)
    }

    #[inline]
    pub fn is_radical(&self, form: &str) -> bool {
        self.radicals.contains(form)
    }

    /// Numbers and radicals are known before scheduling starts.
    #[inline]
    pub fn is_baseline(&self, form: &str) -> bool {
        self.is_number(form) || self.is_radical(form)
    }

    pub fn delay(&self, form: &str) -> Option<u32> {
        self.delays.get(form).copied()
    }

    pub fn baseline(&self) -> impl Iterator<Item = &str> {
        self.numbers
            .iter()
            .chain(self.radicals.iter())
            .map(String::as_str)
    }

    /// Components of `unit`: its own decomposition, else the lookup table's.
    pub fn components_of<'a>(&'a self, unit: &'a Unit) -> &'a [String] {
        if !unit.decomposition.is_empty() {
            &unit.decomposition
        } else {
            self.decomposition(&unit.normalized_form).unwrap_or(&[])
        }
    }
}

#[pymethods]
impl LookupStore {
    #[new]
    #[pyo3(signature = (
        decomposition=None,
        frequency=None,
        numbers=None,
        radicals=None,
        delays=None
    ))]
    fn py_new(
        decomposition: Option<HashMap<String, Vec<String>>>,
        frequency: Option<HashMap<String, u32>>,
        numbers: Option<HashSet<String>>,
        radicals: Option<HashSet<String>>,
        delays: Option<HashMap<String, u32>>,
    ) -> Self {
        Self {
            decomposition: decomposition.unwrap_or_default(),
            frequency: frequency.unwrap_or_default(),
            numbers: numbers.unwrap_or_default(),
            radicals: radicals.unwrap_or_default(),
            delays: delays.unwrap_or_default(),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "LookupStore(decompositions={}, ranks={}, numbers={}, radicals={}, delays={})",
            self.decomposition.len(),
            self.frequency.len(),
            self.numbers.len(),
            self.radicals.len(),
            self.delays.len()
        )
    }
}

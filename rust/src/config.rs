//! Configuration types for the curriculum scheduler and classifier.

use pyo3::prelude::*;

/// Suffix that marks colloquial retroflex variants (e.g. 玩 / 玩儿).
pub const DEFAULT_RETROFLEX_SUFFIX: char = '儿';

/// Heuristic switches and diagnostics for a scheduling run.
#[pyclass]
#[derive(Clone, Debug)]
pub struct ScheduleConfig {
    /// Pull same-bucket compounds of a just-introduced character to the queue front
    #[pyo3(get, set)]
    pub pull_forward: bool,
    /// Resolve a two-unit prefix word before the three-unit word built from it
    #[pyo3(get, set)]
    pub compound_prefix: bool,
    /// Sweep the queue for fully constructible words after each new character
    #[pyo3(get, set)]
    pub opportunistic_unlock: bool,
    /// Suffix whose presence/absence makes two forms variants; `None` disables the skip
    #[pyo3(get, set)]
    pub retroflex_suffix: Option<char>,
    /// Keep distinct readings of the same written form as separate entries
    #[pyo3(get, set)]
    pub split_readings: bool,
    /// Logging verbosity (see `logging`)
    #[pyo3(get, set)]
    pub verbosity: u8,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            pull_forward: true,
            compound_prefix: true,
            opportunistic_unlock: true,
            retroflex_suffix: Some(DEFAULT_RETROFLEX_SUFFIX),
            split_readings: false,
            verbosity: 0,
        }
    }
}

#[pymethods]
impl ScheduleConfig {
    #[new]
    #[pyo3(signature = (
        pull_forward=None,
        compound_prefix=None,
        opportunistic_unlock=None,
        retroflex_suffix=Some(DEFAULT_RETROFLEX_SUFFIX),
        split_readings=None,
        verbosity=None
    ))]
    fn new(
        pull_forward: Option<bool>,
        compound_prefix: Option<bool>,
        opportunistic_unlock: Option<bool>,
        retroflex_suffix: Option<char>,
        split_readings: Option<bool>,
        verbosity: Option<u8>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            pull_forward: pull_forward.unwrap_or(defaults.pull_forward),
            compound_prefix: compound_prefix.unwrap_or(defaults.compound_prefix),
            opportunistic_unlock: opportunistic_unlock.unwrap_or(defaults.opportunistic_unlock),
            retroflex_suffix,
            split_readings: split_readings.unwrap_or(defaults.split_readings),
            verbosity: verbosity.unwrap_or(defaults.verbosity),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "ScheduleConfig(pull_forward={}, compound_prefix={}, \
             opportunistic_unlock={}, retroflex_suffix={:?})",
            self.pull_forward,
            self.compound_prefix,
            self.opportunistic_unlock,
            self.retroflex_suffix
        )
    }
}

/// Cut points and filtering for output classification.
#[pyclass]
#[derive(Clone, Debug)]
pub struct ClassifyConfig {
    /// Bucket levels below this are Elementary
    #[pyo3(get, set)]
    pub elementary_level_below: u32,
    /// Bucket levels below this (and not Elementary) are Intermediate
    #[pyo3(get, set)]
    pub intermediate_level_below: u32,
    /// Frequency ranks below this are Elementary
    #[pyo3(get, set)]
    pub elementary_rank_below: u32,
    /// Frequency ranks below this (and not Elementary) are Intermediate
    #[pyo3(get, set)]
    pub intermediate_rank_below: u32,
    /// Source lists consulted first, in order, when picking a unit's level
    #[pyo3(get, set)]
    pub preferred_lists: Vec<String>,
    /// Drop untagged characters used as a component of at most one other unit
    #[pyo3(get, set)]
    pub drop_rare_components: bool,
    /// Logging verbosity (see `logging`)
    #[pyo3(get, set)]
    pub verbosity: u8,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            elementary_level_below: 4,
            intermediate_level_below: 7,
            elementary_rank_below: 2250,
            intermediate_rank_below: 5500,
            preferred_lists: vec!["hsk3".to_string(), "hsk2".to_string()],
            drop_rare_components: true,
            verbosity: 0,
        }
    }
}

#[pymethods]
impl ClassifyConfig {
    #[new]
    #[pyo3(signature = (
        elementary_level_below=None,
        intermediate_level_below=None,
        elementary_rank_below=None,
        intermediate_rank_below=None,
        preferred_lists=None,
        drop_rare_components=None,
        verbosity=None
    ))]
    fn new(
        elementary_level_below: Option<u32>,
        intermediate_level_below: Option<u32>,
        elementary_rank_below: Option<u32>,
        intermediate_rank_below: Option<u32>,
        preferred_lists: Option<Vec<String>>,
        drop_rare_components: Option<bool>,
        verbosity: Option<u8>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            elementary_level_below: elementary_level_below
                .unwrap_or(defaults.elementary_level_below),
            intermediate_level_below: intermediate_level_below
                .unwrap_or(defaults.intermediate_level_below),
            elementary_rank_below: elementary_rank_below.unwrap_or(defaults.elementary_rank_below),
            intermediate_rank_below: intermediate_rank_below
                .unwrap_or(defaults.intermediate_rank_below),
            preferred_lists: preferred_lists.unwrap_or(defaults.preferred_lists),
            drop_rare_components: drop_rare_components.unwrap_or(defaults.drop_rare_components),
            verbosity: verbosity.unwrap_or(defaults.verbosity),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "ClassifyConfig(levels=<{}/<{}, ranks=<{}/<{}, preferred_lists={:?})",
            self.elementary_level_below,
            self.intermediate_level_below,
            self.elementary_rank_below,
            self.intermediate_rank_below,
            self.preferred_lists
        )
    }
}

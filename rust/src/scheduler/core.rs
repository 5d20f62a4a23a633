//! Core dependency-resolution scheduler.

use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

use crate::config::ScheduleConfig;
use crate::models::{LookupStore, Unit};
use crate::{log_changes, log_checks, log_debug};

use super::queue::WorkQueue;
use super::state::CurriculumState;

/// Errors that can occur during scheduling.
///
/// Missing lookup data and decomposition cycles are recovered locally and
/// never surface here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Invalid unit {form:?}: {reason}")]
    InvalidUnit { form: String, reason: &'static str },
}

/// Output of one scheduling run.
#[derive(Debug, Clone, Default)]
pub struct ScheduleResult {
    /// Units in emission order.
    pub ordered: Vec<Unit>,
    /// Every form considered known at the end of the run, baseline included.
    pub learned: FxHashSet<String>,
}

/// Reject forms the scheduler cannot key on.
fn validate_form(form: &str) -> Result<(), ScheduleError> {
    if form.is_empty() {
        return Err(ScheduleError::InvalidUnit {
            form: form.to_string(),
            reason: "empty normalized form",
        });
    }
    if form.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ScheduleError::InvalidUnit {
            form: form.to_string(),
            reason: "normalized form contains whitespace or control characters",
        });
    }
    Ok(())
}

/// True if `form` and a learned form differ only by the retroflex suffix.
fn is_suffix_variant(state: &CurriculumState, suffix: Option<char>, form: &str) -> bool {
    let Some(suffix) = suffix else {
        return false;
    };
    let mut suffixed = String::with_capacity(form.len() + suffix.len_utf8());
    suffixed.push_str(form);
    suffixed.push(suffix);
    if state.is_learned(&suffixed) {
        return true;
    }
    match form.strip_suffix(suffix) {
        Some(base) if !base.is_empty() => state.is_learned(base),
        _ => false,
    }
}

/// Scheduler producing a prerequisite-respecting curriculum order.
///
/// Single-use: construct with the sorted backlog, then call `run`.
pub struct CurriculumScheduler<'a> {
    lookups: &'a LookupStore,
    config: &'a ScheduleConfig,
    /// First backlog entry per form, used as the payload when a form is
    /// emitted as a component ahead of its own turn
    catalog: FxHashMap<String, Unit>,
    queue: WorkQueue,
    state: CurriculumState,
    /// Forms on the current resolution stack
    in_progress: FxHashSet<String>,
}

impl<'a> CurriculumScheduler<'a> {
    /// Create a scheduler over a backlog already sorted by `build_backlog`.
    pub fn new(
        backlog: Vec<Unit>,
        lookups: &'a LookupStore,
        config: &'a ScheduleConfig,
    ) -> Result<Self, ScheduleError> {
        let mut catalog: FxHashMap<String, Unit> =
            FxHashMap::with_capacity_and_hasher(backlog.len(), Default::default());
        for unit in &backlog {
            validate_form(&unit.normalized_form)?;
            catalog
                .entry(unit.normalized_form.clone())
                .or_insert_with(|| unit.clone());
        }

        let state = CurriculumState::new(lookups.baseline(), backlog.len());

        Ok(Self {
            lookups,
            config,
            catalog,
            queue: WorkQueue::new(backlog),
            state,
            in_progress: FxHashSet::default(),
        })
    }

    /// Drain the work queue and return the emission order.
    pub fn run(mut self) -> Result<ScheduleResult, ScheduleError> {
        log_changes!(
            self.config.verbosity,
            "Scheduling {} backlog units",
            self.queue.len()
        );

        while let Some(unit) = self.queue.pop_front() {
            self.process(unit)?;
        }

        log_changes!(
            self.config.verbosity,
            "Scheduled {} units",
            self.state.len()
        );

        let (ordered, learned) = self.state.finish();
        Ok(ScheduleResult { ordered, learned })
    }

    /// One iteration of the main loop for a unit popped off the queue.
    fn process(&mut self, unit: Unit) -> Result<(), ScheduleError> {
        if self.state.is_learned(&unit.normalized_form) {
            self.admit_known(unit);
            return Ok(());
        }

        if self.skip_suffix_variant(&unit.normalized_form) {
            return Ok(());
        }

        if self.config.pull_forward && unit.is_atomic() {
            self.pull_forward(&unit);
        }

        if self.config.compound_prefix {
            self.resolve_compound_prefix(&unit)?;
            // The prefix may have been the base of this unit's suffixed form
            if self.skip_suffix_variant(&unit.normalized_form) {
                return Ok(());
            }
        }

        self.resolve_and_emit(unit)
    }

    /// True (and logged) if a retroflex variant of `form` is already learned.
    fn skip_suffix_variant(&self, form: &str) -> bool {
        let redundant = is_suffix_variant(&self.state, self.config.retroflex_suffix, form);
        if redundant {
            log_checks!(
                self.config.verbosity,
                "  Skip {}: suffix variant already learned",
                form
            );
        }
        redundant
    }

    /// Handle a unit whose form is already learned.
    ///
    /// Merges its tags into the matching entry. A baseline form with no entry
    /// yet, or a new reading under `split_readings`, gets its own entry without
    /// being re-resolved.
    fn admit_known(&mut self, unit: Unit) {
        let verbosity = self.config.verbosity;
        let exact = self.config.split_readings && !unit.pinyin.is_empty();

        match self.state.find_entry(&unit.key(), exact) {
            Some(position) => {
                if self.state.merge_tags(position, &unit.bucket_tags) {
                    log_changes!(
                        verbosity,
                        "Merge tags of duplicate {} into entry {}",
                        unit.normalized_form,
                        position
                    );
                } else {
                    log_checks!(verbosity, "  Skip {}: already learned", unit.normalized_form);
                }
            }
            None => {
                log_changes!(
                    verbosity,
                    "Emit known {} {:?} (bucket {})",
                    unit.normalized_form,
                    unit.pinyin,
                    unit.bucket
                );
                self.state.push(unit);
            }
        }
    }

    /// Move same-bucket compounds directly built from `unit` to the queue front.
    fn pull_forward(&mut self, unit: &Unit) {
        let lookups = self.lookups;
        let form = unit.normalized_form.as_str();
        let bucket = unit.bucket;

        let pulled = self.queue.extract_where(|candidate| {
            candidate.bucket == bucket
                && candidate.normalized_form != form
                && lookups.components_of(candidate).iter().any(|c| c == form)
        });

        if !pulled.is_empty() {
            log_checks!(
                self.config.verbosity,
                "  Pull forward {} compounds of {}: {:?}",
                pulled.len(),
                form,
                pulled
                    .iter()
                    .map(|u| u.normalized_form.as_str())
                    .collect::<Vec<_>>()
            );
            self.queue.prepend(pulled);
        }
    }

    /// For a three-component unit, emit the queued word made of its first two
    /// components first.
    ///
    /// A prefix that is itself a suffix variant of a learned form stays queued,
    /// to be skipped on its own turn.
    fn resolve_compound_prefix(&mut self, unit: &Unit) -> Result<(), ScheduleError> {
        let lookups = self.lookups;
        let components = lookups.components_of(unit);
        if components.len() != 3 {
            return Ok(());
        }
        let prefix = components[..2].concat();
        if prefix == unit.normalized_form || self.skip_suffix_variant(&prefix) {
            return Ok(());
        }
        let Some(prefix_unit) = self.queue.take_first(|c| c.normalized_form == prefix) else {
            return Ok(());
        };

        log_checks!(
            self.config.verbosity,
            "  Compound prefix {} resolved before {}",
            prefix,
            unit.normalized_form
        );

        if self.state.is_learned(&prefix) {
            self.admit_known(prefix_unit);
            return Ok(());
        }
        self.resolve_and_emit(prefix_unit)
    }

    /// Resolve every component of `unit` depth-first, then emit it.
    fn resolve_and_emit(&mut self, unit: Unit) -> Result<(), ScheduleError> {
        let components: Vec<String> = self.lookups.components_of(&unit).to_vec();

        self.in_progress.insert(unit.normalized_form.clone());
        for component in &components {
            self.resolve_component(component)?;
        }
        self.in_progress.remove(&unit.normalized_form);

        self.emit(unit);
        Ok(())
    }

    /// Make sure a single component is learned, emitting it if resolvable.
    fn resolve_component(&mut self, form: &str) -> Result<(), ScheduleError> {
        let verbosity = self.config.verbosity;
        validate_form(form)?;

        if self.state.is_learned(form) {
            return Ok(());
        }
        if self.in_progress.contains(form) {
            log_debug!(verbosity, "    Cycle at {}: treated as satisfied", form);
            return Ok(());
        }

        let unit = match self.catalog.get(form) {
            Some(entry) => entry.clone(),
            None => match self.lookups.decomposition(form) {
                Some(components) => Unit::component(form, components.to_vec()),
                None => {
                    log_debug!(verbosity, "    Unresolvable {}: treated as known", form);
                    return Ok(());
                }
            },
        };

        log_debug!(verbosity, "    Resolve component {}", form);
        self.resolve_and_emit(unit)
    }

    /// Append `unit` to the output; a new character triggers the unlock sweep.
    fn emit(&mut self, unit: Unit) {
        if self.state.is_learned(&unit.normalized_form) {
            self.admit_known(unit);
            return;
        }

        let atomic = unit.is_atomic();
        log_changes!(
            self.config.verbosity,
            "Emit {} (bucket {})",
            unit.normalized_form,
            unit.bucket
        );
        self.state.push(unit);

        if atomic && self.config.opportunistic_unlock {
            self.sweep_unlocked();
        }
    }

    /// Emit, in queue order, every queued word whose components are all learned.
    fn sweep_unlocked(&mut self) {
        let lookups = self.lookups;
        let state = &self.state;
        let in_progress = &self.in_progress;
        let suffix = self.config.retroflex_suffix;

        let unlocked = self.queue.extract_where(|candidate| {
            let form = candidate.normalized_form.as_str();
            if !candidate.is_word() || state.is_learned(form) || in_progress.contains(form) {
                return false;
            }
            let components = lookups.components_of(candidate);
            !components.is_empty()
                && components.iter().all(|c| state.is_learned(c))
                && !is_suffix_variant(state, suffix, form)
        });

        for unit in unlocked {
            log_checks!(
                self.config.verbosity,
                "  Unlocked {} ahead of its turn",
                unit.normalized_form
            );
            self.emit(unit);
        }
    }
}

/// Schedule `backlog` into a prerequisite-respecting curriculum order.
///
/// The backlog is expected in `build_backlog` order. Deterministic for fixed
/// inputs.
///
/// # Errors
/// * `ScheduleError::InvalidUnit` if a backlog unit or a decomposition
///   component has an empty or malformed normalized form
pub fn schedule(
    backlog: Vec<Unit>,
    lookups: &LookupStore,
    config: &ScheduleConfig,
) -> Result<ScheduleResult, ScheduleError> {
    CurriculumScheduler::new(backlog, lookups, config)?.run()
}

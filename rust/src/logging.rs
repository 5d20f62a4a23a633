//! Stderr tracing for curriculum ordering runs.
//!
//! Both `ScheduleConfig` and `ClassifyConfig` carry a `verbosity`; each macro
//! compares it against one level and formats nothing below it.
//! - 0: SILENT (only errors)
//! - 1: CHANGES (a unit enters the curriculum, a duplicate merges its list tags)
//! - 2: CHECKS (儿-variant and duplicate skips, pull-forward batches, compound
//!   prefixes, unlock sweeps, classifier drops of rare structural characters)
//! - 3: DEBUG (per-component resolution, absent components, cycle breaks)

/// Verbosity level constants.
pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_CHANGES: u8 = 1;
pub const VERBOSITY_CHECKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Log at CHANGES level (verbosity >= 1).
///
/// Used for: units appended to the ordered curriculum, bucket tag merges on duplicates.
#[macro_export]
macro_rules! log_changes {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHANGES {
            eprintln!($($arg)*);
        }
    };
}

/// Log at CHECKS level (verbosity >= 2).
///
/// Used for: why a backlog unit was skipped or moved ahead of its turn.
#[macro_export]
macro_rules! log_checks {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHECKS {
            eprintln!($($arg)*);
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
///
/// Used for: walking a unit's decomposition and breaking decomposition cycles.
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            eprintln!($($arg)*);
        }
    };
}

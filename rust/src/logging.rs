//! Logging macros for the engine with verbosity level control.
//!
//! Zero-cost when disabled (verbosity=0). Lines go to stderr prefixed with `[shiftgrid]`.
//!
//! Verbosity levels:
//! - 0: SILENT (only errors)
//! - 1: CHANGES (per-day summaries, aborted requests)
//! - 2: CHECKS (coverage shortfalls)
//! - 3: DEBUG (per-slot pool and period details)

/// Verbosity level constants.
pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_CHANGES: u8 = 1;
pub const VERBOSITY_CHECKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Log at CHANGES level (verbosity >= 1).
#[macro_export]
macro_rules! log_changes {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHANGES {
            eprintln!("[shiftgrid] {}", format_args!($($arg)*));
        }
    };
}

/// Log at CHECKS level (verbosity >= 2).
///
/// Used for: understaffed slots.
#[macro_export]
macro_rules! log_checks {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHECKS {
            eprintln!("[shiftgrid] {}", format_args!($($arg)*));
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            eprintln!("[shiftgrid] {}", format_args!($($arg)*));
        }
    };
}

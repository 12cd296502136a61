#![deny(missing_docs)]
//! Shared logging utilities for the UBL workspace.
//!
//! Every crate logs through the `ubl_*` macros so that records carry the
//! common [`TARGET`] and callers do not need their own `log` dependency.
//! Sinks are configured by the host binary; tests use
//! [`initialize_for_tests`].

#[doc(hidden)]
pub use log;

/// Log target attached to every record emitted through the `ubl_*` macros.
pub const TARGET: &str = "ubl";

/// Logs a trace-level message under the [`TARGET`] target.
#[macro_export]
macro_rules! ubl_trace {
    ($($arg:tt)*) => {{
        $crate::log::trace!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs a debug-level message under the [`TARGET`] target.
#[macro_export]
macro_rules! ubl_debug {
    ($($arg:tt)*) => {{
        $crate::log::debug!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs an info-level message under the [`TARGET`] target.
#[macro_export]
macro_rules! ubl_info {
    ($($arg:tt)*) => {{
        $crate::log::info!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs a warn-level message under the [`TARGET`] target.
#[macro_export]
macro_rules! ubl_warn {
    ($($arg:tt)*) => {{
        $crate::log::warn!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs an error-level message under the [`TARGET`] target.
///
/// Used for conditions that leave the host without list protection.
#[macro_export]
macro_rules! ubl_error {
    ($($arg:tt)*) => {{
        $crate::log::error!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Initializes a terminal logger for integration tests.
///
/// Safe to call from every test: if a logger is already installed the call
/// does nothing.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let _ = TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Never);
}

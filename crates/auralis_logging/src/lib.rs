#![deny(missing_docs)]
//! Shared logging utilities for the Auralis workspace.
//!
//! This crate provides the `auralis_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Log lines emitted on a
//! thread that has a bound tab carry a `[tab N]` prefix.

use std::cell::Cell;

thread_local! {
    /// Tab the current thread is working for, if any.
    static BOUND_TAB: Cell<Option<i64>> = const { Cell::new(None) };
}

/// Binds the current thread's log lines to a browser tab.
/// The popup dispatch loop calls this once the active tab is known.
pub fn bind_tab(tab_id: i64) {
    BOUND_TAB.with(|v| v.set(Some(tab_id)));
}

/// Clears the tab binding for the current thread.
pub fn unbind_tab() {
    BOUND_TAB.with(|v| v.set(None));
}

/// Returns the tab bound to the current thread, if any.
pub fn bound_tab() -> Option<i64> {
    BOUND_TAB.with(|v| v.get())
}

/// Prefix used by the logging macros. Empty when no tab is bound.
#[doc(hidden)]
pub fn tab_prefix() -> String {
    match bound_tab() {
        Some(tab_id) => format!("[tab {tab_id}] "),
        None => String::new(),
    }
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! auralis_trace {
    ($($arg:tt)*) => {{
        log::trace!("{}{}", $crate::tab_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! auralis_info {
    ($($arg:tt)*) => {{
        log::info!("{}{}", $crate::tab_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! auralis_debug {
    ($($arg:tt)*) => {{
        log::debug!("{}{}", $crate::tab_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! auralis_warn {
    ($($arg:tt)*) => {{
        log::warn!("{}{}", $crate::tab_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! auralis_error {
    ($($arg:tt)*) => {{
        log::error!("{}{}", $crate::tab_prefix(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Another test may already own the global logger.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

#![deny(missing_docs)]
//! Shared logging utilities for the accelerations workspace.
//!
//! This crate provides the `accel_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger.
//!
//! Every macro accepts an optional `seq = <expr>;` prefix. When present, the
//! message is tagged with the pipeline request sequence number so that the
//! lines belonging to one fetch or subscription can be followed in the log.

/// Re-export so the macros resolve `log` from any calling crate.
#[doc(hidden)]
pub use log;

/// Expands to a call on the `log` facade, optionally tagged with a request
/// sequence number.
#[doc(hidden)]
#[macro_export]
macro_rules! __accel_log {
    ($level:ident, seq = $seq:expr; $($arg:tt)*) => {{
        $crate::log::$level!("[seq {}] {}", $seq, format_args!($($arg)*));
    }};
    ($level:ident, $($arg:tt)*) => {{
        $crate::log::$level!($($arg)*);
    }};
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! accel_trace {
    ($($arg:tt)*) => {{
        $crate::__accel_log!(trace, $($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! accel_debug {
    ($($arg:tt)*) => {{
        $crate::__accel_log!(debug, $($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! accel_info {
    ($($arg:tt)*) => {{
        $crate::__accel_log!(info, $($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! accel_warn {
    ($($arg:tt)*) => {{
        $crate::__accel_log!(warn, $($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! accel_error {
    ($($arg:tt)*) => {{
        $crate::__accel_log!(error, $($arg)*);
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

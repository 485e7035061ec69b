#![deny(missing_docs)]
//! Shared logging utilities for the careers workspace.
//!
//! This crate provides the `careers_*` logging macros used by the core,
//! engine and app crates, the logger initialization used by the binary, and
//! a minimal test initializer for the global logger.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! careers_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! careers_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! careers_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! careers_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDestination {
    /// Write to the given log file only.
    File,
    /// Write to terminal (stdout/stderr).
    Terminal,
    /// Write to both file and terminal.
    Both,
}

/// Why [`initialize`] installed no logger.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The log file could not be created.
    #[error("cannot create log file {path:?}: {source}")]
    LogFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying IO failure.
        source: io::Error,
    },
    /// A global logger is already installed.
    #[error("a global logger is already set")]
    AlreadySet(#[from] log::SetLoggerError),
}

/// Initialize the global logger.
///
/// For `LogDestination::File` or `Both`, the log file at `log_path` is
/// truncated on start. Nothing is installed when the file cannot be created,
/// so the caller can fall back to another destination.
pub fn initialize(
    destination: LogDestination,
    level: LevelFilter,
    log_path: &Path,
) -> Result<(), LoggingError> {
    let config = build_config();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::with_capacity(2);
    if matches!(destination, LogDestination::File | LogDestination::Both) {
        let file = File::create(log_path).map_err(|source| LoggingError::LogFile {
            path: log_path.to_path_buf(),
            source,
        })?;
        loggers.push(WriteLogger::new(level, config.clone(), file));
    }
    if matches!(destination, LogDestination::Terminal | LogDestination::Both) {
        loggers.push(TermLogger::new(
            level,
            config,
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
    }

    CombinedLogger::init(loggers)?;
    Ok(())
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

use chrono::Local;
use log::{LevelFilter, Metadata, Record, SetLoggerError};
use std::collections::HashSet;
use std::io::{self, Write};
use std::sync::OnceLock;

/// Debug topics understood by `--debug-filter`
pub const TOPICS: [&str; 5] = ["agent", "drive", "turret", "scan", "sim"];

// Console logger with per-topic filtering of debug output
#[derive(Debug)]
struct SimLogger {
    level: LevelFilter,
    debug_filters: Option<HashSet<String>>,
}

impl SimLogger {
    fn topic_enabled(&self, metadata: &Metadata) -> bool {
        match &self.debug_filters {
            Some(filters) if metadata.level() >= log::Level::Debug => {
                filters.contains(metadata.target())
                    || filters.iter().any(|f| metadata.target().starts_with(f.as_str()))
            }
            _ => true,
        }
    }
}

impl log::Log for SimLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && self.topic_enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let level_color = match record.level() {
            log::Level::Error => "\x1B[31m", // Red
            log::Level::Warn => "\x1B[33m",  // Yellow
            log::Level::Info => "\x1B[32m",  // Green
            log::Level::Debug => "\x1B[36m", // Cyan
            log::Level::Trace => "\x1B[35m", // Magenta
        };
        let reset = "\x1B[0m";
        let timestamp = Local::now().format("%H:%M:%S%.3f");

        let mut output = format!(
            "{timestamp} {level_color}{level:5}{reset} {target}: {message}",
            level = record.level(),
            target = record.target(),
            message = record.args()
        );
        if let Some(module_path) = record.module_path() {
            if module_path != record.target() {
                output.push_str(&format!(" [{}]", module_path));
            }
        }

        // A closed stdout is not worth crashing the simulation over
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{}", output);
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
    }
}

static LOGGER: OnceLock<SimLogger> = OnceLock::new();

/// Parses a comma-separated topic list, e.g. "drive,scan"
pub fn parse_filters(filter: &str) -> HashSet<String> {
    filter
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Maps a `--log-level` string onto a filter, defaulting to Info
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Installs the console logger; only the first call's settings take effect
pub fn init_logger(level: LevelFilter, debug_filter: Option<String>) -> Result<(), SetLoggerError> {
    let logger = LOGGER.get_or_init(|| SimLogger {
        level,
        debug_filters: debug_filter.as_deref().map(parse_filters),
    });
    log::set_logger(logger).map(|()| log::set_max_level(level))
}

/// Falls back to env_logger when RUST_LOG is set
pub fn init_env_logger() -> Result<(), SetLoggerError> {
    env_logger::Builder::from_default_env()
        .format_timestamp_millis()
        .try_init()
}

// Topic macros: tag a debug record with the agent id and its tick
#[macro_export]
macro_rules! debug_agent {
    ($agent_id:expr, $tick:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        log::debug!(target: "agent", "[R{:02}][T{:04}] {}", $agent_id, $tick, format_args!($fmt $(, $arg)*))
    };
    ($($arg:tt)*) => {
        log::debug!(target: "agent", "{}", format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_drive {
    ($agent_id:expr, $tick:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        log::debug!(target: "drive", "[R{:02}][T{:04}] {}", $agent_id, $tick, format_args!($fmt $(, $arg)*))
    };
    ($($arg:tt)*) => {
        log::debug!(target: "drive", "{}", format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_turret {
    ($agent_id:expr, $tick:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        log::debug!(target: "turret", "[R{:02}][T{:04}] {}", $agent_id, $tick, format_args!($fmt $(, $arg)*))
    };
    ($($arg:tt)*) => {
        log::debug!(target: "turret", "{}", format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_scan {
    ($agent_id:expr, $tick:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        log::debug!(target: "scan", "[R{:02}][T{:04}] {}", $agent_id, $tick, format_args!($fmt $(, $arg)*))
    };
    ($($arg:tt)*) => {
        log::debug!(target: "scan", "{}", format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_sim {
    ($tick:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        log::debug!(target: "sim", "[T{:04}] {}", $tick, format_args!($fmt $(, $arg)*))
    };
    ($($arg:tt)*) => {
        log::debug!(target: "sim", "{}", format_args!($($arg)*))
    };
}

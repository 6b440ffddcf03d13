//! Leveled, line-oriented log sink.
//!
//! A single output file, a maximum accepted level, and a message written iff
//! `level <= maximum`. Each line is prefixed with its call site
//! (`module_path!():line!()`, a portable stand-in for `__FUNCTION__:LINE`)
//! so a reader can cross-reference a log line against source without an
//! ambient global logger to tie them together.
//!
//! There is no global logger singleton: shared state is threaded through
//! explicit parameters everywhere — the `Logger` is created once by the
//! orchestrator and passed by reference to every component that needs it.

use std::fs::File;
use std::io::{self, Write};
use std::sync::Mutex;

use crate::error::EmulatorError;

/// How verbose the log sink should be. Ordered so that `Error < Warning < Debug`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Debug = 2,
}

impl LogLevel {
    /// Parse the CLI's `LOG_LEVEL` argument (`0`, `1`, or `2`).
    pub fn from_arg(s: &str) -> Result<Self, EmulatorError> {
        match s {
            "0" => Ok(LogLevel::Error),
            "1" => Ok(LogLevel::Warning),
            "2" => Ok(LogLevel::Debug),
            _ => Err(EmulatorError::InvalidLogLevel(s.to_string())),
        }
    }
}

/// A leveled sink writing to a single file, flushed after every line.
pub struct Logger {
    file: Mutex<File>,
    max_level: LogLevel,
}

impl Logger {
    pub fn open(path: &str, max_level: LogLevel) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            file: Mutex::new(file),
            max_level,
        })
    }

    /// Write one line if `level` is at or below the configured maximum.
    /// Not called directly — use the [`log`](crate::log) macro so the call
    /// site location is captured correctly.
    pub fn write(&self, level: LogLevel, location: &str, args: std::fmt::Arguments) {
        if level <= self.max_level {
            let mut file = self.file.lock().unwrap();
            let _ = writeln!(file, "[{location}] {args}");
            let _ = file.flush();
        }
    }
}

/// Log a line through `$logger` at `$level`, prefixed with the call site.
///
/// `[module_path:line] formatted message` (Rust has no portable
/// `__FUNCTION__` outside nightly, so `module_path!():line!()` stands in).
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)*) => {{
        let location = concat!(module_path!(), ":", line!());
        $logger.write($level, location, format_args!($($arg)*));
    }};
}

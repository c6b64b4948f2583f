// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! A small `log` facade backend which writes timestamped lines to stdout.
//!
//! ```no_run
//! use logger::*;
//!
//! Logger::new()
//!     .label("demo")
//!     .level(Level::Debug)
//!     .init()
//!     .expect("Failed to initialize logger");
//! info!("Just some general info");
//! ```

pub use log::{debug, error, info, trace, warn, Level, LevelFilter, SetLoggerError};

use log::{Log, Metadata, Record};
use std::io::Write;

/// Log at error level, flush, and terminate the process with exit status 1.
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)*) => {{
        $crate::error!($($arg)*);
        $crate::flush();
        std::process::exit(1)
    }};
}

/// Flushes the installed logger.
pub fn flush() {
    log::logger().flush();
}

pub struct Logger {
    label: String,
    level: Level,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    pub fn new() -> Self {
        Self {
            label: env!("CARGO_PKG_NAME").to_owned(),
            level: Level::Info,
        }
    }

    /// The name printed in place of the target for messages above debug.
    pub fn label(mut self, label: &str) -> Self {
        self.label = label.to_owned();
        self
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Install as the global logger. Fails if a logger is already set.
    pub fn init(self) -> Result<(), SetLoggerError> {
        let filter = self.level.to_level_filter();
        log::set_boxed_logger(Box::new(self)).map(|()| log::set_max_level(filter))
    }

    fn format(&self, record: &Record) -> String {
        let now = time::now();
        let timestamp = time::strftime("%Y-%m-%d %H:%M:%S", &now).unwrap_or_default();
        let target = if record.level() >= Level::Debug {
            record.target()
        } else {
            self.label.as_str()
        };
        format!(
            "{}.{:03} {:<5} [{}] {}",
            timestamp,
            now.tm_nsec / 1_000_000,
            record.level(),
            target,
            record.args()
        )
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            println!("{}", self.format(record));
        }
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_filters_messages() {
        let logger = Logger::new().level(Level::Warn);
        assert!(logger.enabled(&Metadata::builder().level(Level::Error).build()));
        assert!(logger.enabled(&Metadata::builder().level(Level::Warn).build()));
        assert!(!logger.enabled(&Metadata::builder().level(Level::Info).build()));
    }

    #[test]
    fn label_replaces_target_above_debug() {
        let logger = Logger::new().label("discard_plot");
        let line = logger.format(
            &Record::builder()
                .args(format_args!("hello"))
                .level(Level::Info)
                .target("discard_plot::parse")
                .build(),
        );
        assert!(line.ends_with("INFO  [discard_plot] hello"));

        let line = logger.format(
            &Record::builder()
                .args(format_args!("hello"))
                .level(Level::Debug)
                .target("discard_plot::parse")
                .build(),
        );
        assert!(line.ends_with("DEBUG [discard_plot::parse] hello"));
    }
}

// Logging utilities
// Author: Gabriel Demetrios Lafis

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Messages from other crates are capped at this level
const FOREIGN_LEVEL: LevelFilter = LevelFilter::Warn;

/// Install the engine logger.
///
/// Records from this crate pass up to `level`; records from dependencies
/// only pass up to warnings. Output goes to stderr, leaving stdout to the
/// rendered frames.
pub fn init_logging(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(EngineLogger { level }))
        .map(|()| log::set_max_level(level.max(FOREIGN_LEVEL)))
}

struct EngineLogger {
    level: LevelFilter,
}

impl EngineLogger {
    fn limit_for(&self, target: &str) -> LevelFilter {
        if target.starts_with("rust_frame_engine") || target.starts_with("frame_engine") {
            self.level
        } else {
            FOREIGN_LEVEL.min(self.level)
        }
    }
}

fn level_label(level: Level) -> &'static str {
    match level {
        Level::Error => "\x1B[31mERROR\x1B[0m",
        Level::Warn => "\x1B[33mWARN \x1B[0m",
        Level::Info => "\x1B[32mINFO \x1B[0m",
        Level::Debug => "\x1B[34mDEBUG\x1B[0m",
        Level::Trace => "\x1B[90mTRACE\x1B[0m",
    }
}

impl Log for EngineLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.limit_for(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        // Module path without the crate prefix keeps lines short
        let target = record.target();
        let module = target.split_once("::").map_or(target, |(_, rest)| rest);

        eprintln!(
            "{} {} [{}] {}",
            chrono::Local::now().format("%H:%M:%S%.3f"),
            level_label(record.level()),
            module,
            record.args()
        );
    }

    fn flush(&self) {}
}

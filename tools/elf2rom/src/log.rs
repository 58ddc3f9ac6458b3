//! Code implementing the logging solution for `elf2rom`.
//!
//! Log records go to standard error so that standard output carries only the listing.

use std::io::{self, Write};

use log::{Level, LevelFilter, Log, Metadata, Record};

/// The global [`StderrLogger`].
static LOGGER: StderrLogger = StderrLogger;

/// Installs the [`StderrLogger`] with the maximum level selected by `verbosity`.
///
/// Installing a second time only updates the maximum level.
pub fn init(verbosity: u8) {
    // A logger is already installed when this is called twice; keep it.
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level_filter(verbosity));
}

/// Returns the [`LevelFilter`] matching the number of `-v` flags given.
pub fn level_filter(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Returns the prefix printed in front of messages logged at `level`.
pub fn prefix(level: Level) -> &'static str {
    match level {
        Level::Trace => "TRACE: ",
        Level::Debug => "DEBUG: ",
        Level::Info => "INFO : ",
        Level::Warn => "WARN : ",
        Level::Error => "ERROR: ",
    }
}

/// A [`Log`] implementation that writes one prefixed line per record to standard error.
pub struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        // Ignore any logging errors because there is no method to report or deal with them.
        let _ = writeln!(
            io::stderr().lock(),
            "{}{}",
            prefix(record.level()),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

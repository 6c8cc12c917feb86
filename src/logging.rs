//! Logger construction.
//!
//! The library never installs a global subscriber. Callers build a
//! [`Dispatch`] here (or anywhere else) and hand it to each operation; the
//! operation scopes its events to that logger for its duration. Dropping the
//! `Dispatch` ends the logger's life.
//!
//! Line format is the compact `fmt` layout: timestamp, level, message and
//! structured fields, without module targets.

use std::io::IsTerminal;
use tracing::Dispatch;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;

/// A logger writing to stderr at the given maximum level.
pub fn build_logger(level: LevelFilter) -> Dispatch {
    let ansi = std::io::stderr().is_terminal();
    logger_with_writer(level, std::io::stderr, ansi)
}

/// A logger writing to an arbitrary sink.
pub fn logger_with_writer<W>(level: LevelFilter, writer: W, ansi: bool) -> Dispatch
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(writer)
        .compact()
        .finish();
    Dispatch::new(subscriber)
}

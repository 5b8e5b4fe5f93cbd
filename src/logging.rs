//! Logging setup on top of `log` and `env_logger`.
//!
//! `RUST_LOG` wins when set. Otherwise the level comes from the CLI:
//! `-q` keeps errors only, no flag is info, `-v` is debug and `-vv` trace.
//!
//! Debug builds prefix each line with a timestamp (and the module path from
//! `-v` on); release builds print level and message only. All log output
//! goes to stderr so stdout stays clean for reports.

use std::io::Write;

use env_logger::{Builder, Target};
use log::LevelFilter;

/// Initialize logging once per process.
///
/// Later calls are ignored, which keeps repeated in-process runs (tests)
/// from panicking.
///
/// ```rust,no_run
/// dedupe::logging::init_logging(1, false);
/// log::debug!("visible with -v");
/// ```
pub fn init_logging(verbose: u8, quiet: bool) {
    let from_env = std::env::var_os("RUST_LOG").is_some();
    let level = level_for(verbose, quiet);

    let mut builder = Builder::new();
    builder.target(Target::Stderr);
    if from_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(level);
    }
    apply_format(&mut builder, verbose);

    match builder.try_init() {
        Ok(()) if from_env => log::debug!("Log level taken from RUST_LOG"),
        Ok(()) => log::debug!("Log level: {}", level),
        Err(_) => log::trace!("Logger already initialized"),
    }
}

/// Log level for the given CLI flags. Quiet beats verbose.
fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    }
}

#[cfg(debug_assertions)]
fn apply_format(builder: &mut Builder, verbose: u8) {
    builder.format(move |buf, record| {
        let style = buf.default_level_style(record.level());
        let timestamp = buf.timestamp_seconds();
        if verbose >= 1 {
            writeln!(
                buf,
                "{timestamp} {style}{:<5}{style:#} [{}] {}",
                record.level(),
                record.module_path().unwrap_or("?"),
                record.args()
            )
        } else {
            writeln!(
                buf,
                "{timestamp} {style}{:<5}{style:#} {}",
                record.level(),
                record.args()
            )
        }
    });
}

#[cfg(not(debug_assertions))]
fn apply_format(builder: &mut Builder, _verbose: u8) {
    builder.format(|buf, record| {
        let style = buf.default_level_style(record.level());
        writeln!(
            buf,
            "{style}{:<5}{style:#} {}",
            record.level(),
            record.args()
        )
    });
}

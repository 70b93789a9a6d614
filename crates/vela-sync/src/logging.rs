//! Structured logging setup.

use std::env;
use std::fs::{File, OpenOptions};
use std::io;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::Error;

fn open_log_file(path: &str) -> Result<File, Error> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| Error::configuration(format!("failed to open log file: {err}")))
}

fn map_init_err<E: std::fmt::Display>(err: E) -> Error {
    Error::configuration(format!("failed to initialize logging: {err}"))
}

/// Build the level filter for `level`, falling back to `VELA_TRACE`, then `off`.
pub fn log_filter(level: Option<&str>) -> Result<EnvFilter, Error> {
    let level_value = level
        .map(str::to_string)
        .or_else(|| env::var("VELA_TRACE").ok())
        .unwrap_or_else(|| "off".to_string());

    if level_value.eq_ignore_ascii_case("off") {
        return Ok(EnvFilter::default().add_directive(LevelFilter::OFF.into()));
    }
    EnvFilter::try_new(&level_value)
        .map_err(|err| Error::configuration(format!("invalid log filter: {err}")))
}

/// Install a global subscriber for vela's `tracing` events.
///
/// `VELA_LOG_FORMAT` picks `pretty` (default) or `json` output on stderr, and
/// `VELA_LOG_FILE` adds a second, uncoloured copy appended to that path.
/// Returns `false` without touching anything if a subscriber is already set.
pub fn enable_logging(level: Option<&str>) -> Result<bool, Error> {
    if tracing::dispatcher::has_been_set() {
        return Ok(false);
    }

    let filter = log_filter(level)?;
    let format = env::var("VELA_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());
    let log_file = env::var("VELA_LOG_FILE").ok();
    let use_json = format.eq_ignore_ascii_case("json");

    if !use_json && !format.eq_ignore_ascii_case("pretty") {
        return Err(Error::configuration(
            "invalid VELA_LOG_FORMAT (expected 'json' or 'pretty')",
        ));
    }

    if use_json {
        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .json();
        let base = tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer);
        if let Some(path) = log_file {
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(open_log_file(&path)?)
                .with_ansi(false)
                .json();
            base.with(file_layer).try_init().map_err(map_init_err)?;
        } else {
            base.try_init().map_err(map_init_err)?;
        }
    } else {
        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .pretty();
        let base = tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer);
        if let Some(path) = log_file {
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(open_log_file(&path)?)
                .with_ansi(false)
                .pretty();
            base.with(file_layer).try_init().map_err(map_init_err)?;
        } else {
            base.try_init().map_err(map_init_err)?;
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn explicit_level_parses() {
        assert!(log_filter(Some("debug")).is_ok());
        assert!(log_filter(Some("OFF")).is_ok());
        assert!(log_filter(Some("vela_sync=trace,warn")).is_ok());
    }

    #[test]
    fn malformed_filter_is_configuration_error() {
        let err = log_filter(Some("vela_sync=loudest")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}

//! Logger initialization.
//!
//! Plain output is colored and meant for a terminal; JSON output is one object
//! per line for log shippers.

use std::io::Write;

use crate::config::LogFormat;
use crate::error_handling::InitializationError;
use colored::*;
use log::{Level, LevelFilter};

// Dependencies that log every request at debug level
const NOISY_MODULES: [(&str, LevelFilter); 5] = [
    ("reqwest", LevelFilter::Info),
    ("hyper", LevelFilter::Info),
    ("hyper_util", LevelFilter::Info),
    // Handshake failures are reported by the certificate check itself
    ("rustls", LevelFilter::Error),
    ("wiremock", LevelFilter::Warn),
];

/// Initializes the global logger.
///
/// `RUST_LOG` is read first so per-module directives still apply, then `level`
/// overrides the default and the crate's own filter.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
///
/// # Examples
///
/// ```bash
/// RUST_LOG=debug phishguard verify example.com
/// RUST_LOG=phishguard=debug,reqwest=info phishguard --log-format json serve
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    colored::control::set_override(matches!(format, LogFormat::Plain));

    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(level);
    for (module, filter) in NOISY_MODULES {
        builder.filter_module(module, filter);
    }
    builder.filter_module("phishguard", level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{}",
                    json_line(
                        chrono::Utc::now().timestamp_millis(),
                        record.level(),
                        record.target(),
                        &record.args().to_string(),
                    )
                )
            });
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{} {} {} {}",
                    chrono::Local::now().format("%H:%M:%S%.3f").to_string().dimmed(),
                    colored_level(record.level()),
                    record.target().cyan(),
                    record.args()
                )
            });
        }
    }

    builder.try_init().map_err(InitializationError::from)?;

    Ok(())
}

fn colored_level(level: Level) -> ColoredString {
    let label = format!("{:<5}", level);
    match level {
        Level::Error => label.red().bold(),
        Level::Warn => label.yellow(),
        Level::Info => label.green(),
        Level::Debug => label.blue(),
        Level::Trace => label.purple(),
    }
}

fn json_line(ts_millis: i64, level: Level, target: &str, msg: &str) -> String {
    serde_json::json!({
        "ts": ts_millis,
        "level": level.as_str(),
        "target": target,
        "msg": msg,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_line_escapes_message() {
        let line = json_line(
            1_700_000_000_000,
            Level::Warn,
            "phishguard::verify",
            "provider \"virustotal\" failed\nretrying",
        );
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["ts"], 1_700_000_000_000_i64);
        assert_eq!(value["level"], "WARN");
        assert_eq!(value["target"], "phishguard::verify");
        assert_eq!(value["msg"], "provider \"virustotal\" failed\nretrying");
        assert!(!line.contains('\n'));
    }

    #[test]
    fn test_colored_level_is_padded() {
        assert!(colored_level(Level::Info).to_string().contains("INFO "));
        assert!(colored_level(Level::Warn).to_string().contains("WARN "));
        assert!(colored_level(Level::Error).to_string().contains("ERROR"));
    }

    #[test]
    fn test_init_logger_twice_fails_gracefully() {
        let _ = init_logger_with(LevelFilter::Info, LogFormat::Plain);
        let second = init_logger_with(LevelFilter::Debug, LogFormat::Json);
        assert!(matches!(second, Err(InitializationError::LoggerError(_))));
    }
}

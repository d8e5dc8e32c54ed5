//! Logging Infrastructure
//!
//! Console output goes to stderr so command output on stdout stays clean.
//! With a log directory, a JSON copy is written to daily rotating files
//! (`potlam-cli.YYYY-MM-DD.log`, the last 14 kept).

use std::fs;
use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

const LOG_FILE_PREFIX: &str = "potlam-cli";
const MAX_LOG_FILES: usize = 14;

/// Directives used when `RUST_LOG` is unset
pub fn default_directives(level: &str) -> String {
    format!("warn,potlam_client={level},potlam_cli={level}")
}

/// Initialize the logging system
///
/// # Arguments
/// * `level` - Level for the potlam crates when `RUST_LOG` is unset
/// * `json_format` - JSON console output instead of the pretty format
/// * `log_dir` - Optional directory for rotating file logs
pub fn init_logger(level: &str, json_format: bool, log_dir: Option<&Path>) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_writer(std::io::stderr)
            .boxed()
    };

    let file_layer = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(LOG_FILE_PREFIX)
                .filename_suffix("log")
                .max_log_files(MAX_LOG_FILES)
                .build(dir)?;
            Some(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(std::sync::Mutex::new(appender))
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;
    Ok(())
}

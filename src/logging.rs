//! Tracing setup.
//!
//! `RUST_LOG` takes precedence over the configured level. Command-line runs
//! log to stderr so table output on stdout stays clean; the TUI owns the
//! terminal and logs to a file in the data directory instead.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File,
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("taskboard={level}")))
        .unwrap_or_else(|_| EnvFilter::new("taskboard=info"))
}

pub fn init_tracing(config: &Config, target: LogTarget) -> AppResult<()> {
    let filter = env_filter(&config.log_level);

    match target {
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false),
                )
                .try_init()
                .map_err(|e| AppError::Config(e.to_string()))?;
        }
        LogTarget::File => {
            config.ensure_data_dir()?;
            let path = config.log_file();
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| AppError::file(&path, e))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false),
                )
                .try_init()
                .map_err(|e| AppError::Config(e.to_string()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_level_falls_back_to_info() {
        // `try_new` rejects garbage directives, `new` never panics
        let filter = env_filter("not a level!!");
        assert!(!filter.to_string().is_empty());
    }
}

use crate::config::AppConfig;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Append to the configured log file; stdout belongs to the terminal UI.
    File,
    /// Write to stderr so headless output on stdout stays clean.
    Stderr,
}

fn filter(config: &AppConfig) -> EnvFilter {
    EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber.
pub fn init(config: &AppConfig, target: LogTarget) -> Result<()> {
    match target {
        LogTarget::File => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&config.log_file)
                .wrap_err_with(|| format!("Could not open {}", config.log_file.display()))?;
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .with(filter(config))
                .try_init()?;
        }
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
                .with(filter(config))
                .try_init()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::filter;
    use crate::config::AppConfig;

    #[test]
    fn invalid_filter_falls_back_to_info() {
        let mut config = AppConfig::from_lookup(|_| None).unwrap();
        config.log_filter = "charts_core=[".to_string();

        assert_eq!(filter(&config).to_string(), "info");
    }
}

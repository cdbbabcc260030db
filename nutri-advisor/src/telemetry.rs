//! Logging setup.
//!
//! `RUST_LOG` wins over the configured level. HTTP client internals are held
//! at `warn` so provider traffic does not drown the advisory logs.

use std::str::FromStr;

use nutri_core::config::GeneralConfig;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::error::{AdvisorError, Result};

const QUIET_TARGETS: [&str; 3] = ["hyper", "reqwest", "h2"];

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, human readable.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
    /// Single-line, human readable.
    Compact,
}

impl FromStr for LogFormat {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            other => Err(AdvisorError::Telemetry(format!("unknown log format: {other}"))),
        }
    }
}

/// Build the level filter: `RUST_LOG` if set, otherwise `log_level`.
///
/// # Errors
///
/// An invalid `log_level` when `RUST_LOG` is unset.
pub fn build_filter(log_level: &str) -> Result<EnvFilter> {
    let base = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log_level.trim())
            .map_err(|e| AdvisorError::Telemetry(format!("invalid log level '{log_level}': {e}")))?,
    };
    Ok(quiet(base))
}

fn quiet(mut filter: EnvFilter) -> EnvFilter {
    for target in QUIET_TARGETS {
        filter = filter.add_directive(
            format!("{target}=warn")
                .parse()
                .unwrap_or_else(|_| Level::WARN.into()),
        );
    }
    filter
}

/// Install the global subscriber.
///
/// # Errors
///
/// Invalid level or format, or a subscriber was already installed.
pub fn init(config: &GeneralConfig) -> Result<()> {
    let filter = build_filter(&config.log_level)?;
    let format: LogFormat = config.log_format.parse()?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(true).with_current_span(false))
            .try_init(),
        LogFormat::Pretty => registry.with(fmt::layer().pretty().with_target(true)).try_init(),
        LogFormat::Compact => registry.with(fmt::layer().compact().with_target(false)).try_init(),
    };
    installed.map_err(|e| AdvisorError::Telemetry(e.to_string()))?;

    tracing::info!(level = %config.log_level, ?format, "logging initialised");
    Ok(())
}

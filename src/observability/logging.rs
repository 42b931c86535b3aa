//! # Structured Logging
//!
//! Subscriber setup and span helpers built on the tracing ecosystem.

use crate::config::LoggingConfig;
use crate::errors::{BigIpError, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Create a tracing span for one appliance round-trip.
///
/// ```rust,ignore
/// let span = request_span!("GET", "/mgmt/tm/ltm/pool");
/// let span = request_span!("POST", "/mgmt/shared/appsvcs/declare", tenant = "Sample_01");
/// ```
#[macro_export]
macro_rules! request_span {
    ($method:expr, $path:expr) => {
        tracing::info_span!(
            "bigip_request",
            method = %$method,
            path = %$path,
            request_id = %uuid::Uuid::new_v4()
        )
    };
    ($method:expr, $path:expr, $($field:tt)*) => {
        tracing::info_span!(
            "bigip_request",
            method = %$method,
            path = %$path,
            request_id = %uuid::Uuid::new_v4(),
            $($field)*
        )
    };
}

/// Install the global fmt subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. A subscriber that is
/// already installed (integration tests, embedding applications) is left alone.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level).map_err(|e| {
            BigIpError::config_with_source(
                format!("Invalid log level '{}'", config.log_level),
                Box::new(e),
            )
        })?,
    };

    let installed = if config.json_logging {
        tracing::subscriber::set_global_default(
            fmt().json().with_env_filter(filter).with_current_span(true).finish(),
        )
    } else {
        tracing::subscriber::set_global_default(fmt().with_env_filter(filter).finish())
    };

    if installed.is_err() {
        tracing::debug!("Global subscriber already installed; keeping existing one");
    }

    Ok(())
}

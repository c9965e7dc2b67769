//! Telemetry initialization for host applications
//!
//! The staking core itself only emits `tracing` events; installing a
//! subscriber is the host application's call. This helper wires up the
//! formats the portal deployments use.

use anyhow::Result;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry,
};

/// Initialize global tracing with the specified log level and format
///
/// `log_format` is one of `"json"`, `"compact"`, or anything else for the
/// default pretty output. `RUST_LOG` takes precedence over `log_level`.
pub fn init(log_level: &str, log_format: &str) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = Registry::default().with(env_filter);

    match log_format {
        "json" => {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .try_init()?;
        }
        "compact" => {
            registry
                .with(fmt::layer().compact().with_target(false))
                .try_init()?;
        }
        _ => {
            registry
                .with(fmt::layer().pretty().with_target(true))
                .try_init()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent_enough_for_tests() {
        // First call may install a subscriber, later ones fail; neither panics.
        let _ = init("info", "compact");
        let _ = init("debug", "json");
    }
}

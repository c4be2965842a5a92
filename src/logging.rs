//! Logging setup for binaries and embedding applications.

use tracing_subscriber::EnvFilter;

use crate::config::BridgeConfig;

/// Install a global `tracing` subscriber.
///
/// `RUST_LOG` wins over `config.log_filter`. Returns `false` if a subscriber
/// was already installed, which is not an error for an embedded bridge.
pub fn init(config: &BridgeConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

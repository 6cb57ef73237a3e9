use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

static INSTALLED: OnceLock<bool> = OnceLock::new();

/// Installs a fmt subscriber filtered by `RUST_LOG`, or by `default_filter`
/// when the variable is unset or invalid.
///
/// Only the first call does anything. Returns whether this process' global
/// subscriber is ours; `false` means another one was set elsewhere.
pub fn init_tracing(default_filter: &str) -> bool {
    *INSTALLED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
            .is_ok()
    })
}

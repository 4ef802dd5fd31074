//! Optional tracing subscriber installation.
//!
//! The load sequence logs through `tracing` and assumes nothing about the
//! subscriber. Hosts that already install one ignore this module; the rest
//! can call [`init`] before loading.

use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Install a stderr subscriber filtered by `RUST_LOG`, defaulting to `info`.
///
/// Does nothing if a global subscriber is already set.
pub fn init() {
    init_with_default("info");
}

/// Install a stderr subscriber with an explicit default directive, still
/// overridable through `RUST_LOG`.
pub fn init_with_default(directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_safe_to_call_repeatedly() {
        init();
        init_with_default("debug");
    }
}

//! Logging setup for hosts embedding the client.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,salon=debug,reqwest=warn";

/// Installs a global fmt subscriber filtered by `RUST_LOG`.
///
/// Returns false if a subscriber was already installed (a second call is
/// harmless).
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_twice_is_harmless() {
        init_tracing();
        assert!(!init_tracing());
    }
}

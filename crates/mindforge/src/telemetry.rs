//! Log output setup for binaries built on Mindforge.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Installs a `tracing` subscriber writing to stderr.
///
/// `RUST_LOG` overrides [`DEFAULT_FILTER`]. Returns `false` if a
/// subscriber was already installed; calling this twice is harmless.
pub fn init() -> bool {
    init_with_filter(DEFAULT_FILTER)
}

/// Like [`init`] with a different fallback filter.
pub fn init_with_filter(fallback: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init_with_filter("warn");
        assert!(!init());
    }
}

//! Gateway configuration.

use std::time::Duration;

/// Where the leaderboard service lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// The single endpoint every action is sent to.
    pub base_url: String,

    /// Whole-request timeout.
    pub timeout: Duration,

    pub user_agent: String,
}

impl GatewayConfig {
    pub const DEFAULT_BASE_URL: &'static str =
        "https://www.aiforalab.com/dementia-prevention-games-v2/api.php";

    /// Environment variable overriding [`base_url`](Self::base_url).
    pub const URL_ENV: &'static str = "MINDFORGE_GATEWAY_URL";

    /// Environment variable overriding [`timeout`](Self::timeout), in
    /// whole seconds.
    pub const TIMEOUT_ENV: &'static str = "MINDFORGE_GATEWAY_TIMEOUT_SECS";

    /// Defaults, overridden by [`URL_ENV`](Self::URL_ENV) and
    /// [`TIMEOUT_ENV`](Self::TIMEOUT_ENV) when they are set.
    ///
    /// An unparsable or zero timeout is ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup(Self::URL_ENV).filter(|u| !u.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }

        if let Some(raw) = lookup(Self::TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => tracing::warn!(
                    var = Self::TIMEOUT_ENV,
                    value = %raw,
                    "ignoring invalid gateway timeout"
                ),
            }
        }

        config
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            user_agent: concat!("mindforge/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_points_at_service() {
        let config = GatewayConfig::default();
        assert_eq!(config.base_url, GatewayConfig::DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_from_env_overrides() {
        let config = GatewayConfig::from_lookup(lookup(&[
            ("MINDFORGE_GATEWAY_URL", " http://localhost:8080/api.php "),
            ("MINDFORGE_GATEWAY_TIMEOUT_SECS", "3"),
        ]));
        assert_eq!(config.base_url, "http://localhost:8080/api.php");
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_from_env_ignores_invalid_values() {
        let config = GatewayConfig::from_lookup(lookup(&[
            ("MINDFORGE_GATEWAY_URL", "  "),
            ("MINDFORGE_GATEWAY_TIMEOUT_SECS", "soon"),
        ]));
        assert_eq!(config, GatewayConfig::default());

        let config = GatewayConfig::from_lookup(lookup(&[("MINDFORGE_GATEWAY_TIMEOUT_SECS", "0")]));
        assert_eq!(config.timeout, Duration::from_secs(10));
    }
}

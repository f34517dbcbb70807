use std::time::Duration;

/// Variable naming the listen address.
pub const BIND_ENV: &str = "LIGHTCYCLE_BIND";
/// Variable naming the idle timeout, in whole seconds.
pub const IDLE_TIMEOUT_ENV: &str = "LIGHTCYCLE_IDLE_TIMEOUT_SECS";

/// Listen address when running as a deployed binary.
const PUBLIC_BIND_ADDR: &str = "0.0.0.0:6008";

/// Network-facing settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Address the WebSocket listener binds to.
    pub bind_addr: String,
    /// A connection that sends nothing for this long is dropped.
    pub idle_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:6008".to_owned(),
            idle_timeout: Duration::from_secs(60),
        }
    }
}

impl ServerConfig {
    /// Reads [`BIND_ENV`] and [`IDLE_TIMEOUT_ENV`]. Unset or unparsable
    /// values fall back to listening publicly on port 6008 with the
    /// default idle timeout.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(mut lookup: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let bind_addr = lookup(BIND_ENV)
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| PUBLIC_BIND_ADDR.to_owned());
        let idle_timeout = lookup(IDLE_TIMEOUT_ENV)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map_or(defaults.idle_timeout, Duration::from_secs);
        Self {
            bind_addr,
            idle_timeout,
        }
    }
}

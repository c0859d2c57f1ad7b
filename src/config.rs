//! Runtime settings read from the environment (and `.env`, if present).

use std::env;
use std::str::FromStr;
use std::time::Duration;

use uuid::Uuid;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_PEER_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// Recipient of mining rewards.
    pub node_id: String,
    pub peer_timeout: Duration,
    /// `None` keeps the proof search unbounded.
    pub pow_max_attempts: Option<u64>,
}

impl Settings {
    /// Load `.env` then read `HOST`, `PORT`, `NODE_ID`, `PEER_TIMEOUT_SECS`
    /// and `POW_MAX_ATTEMPTS`. Unparsable values fall back to defaults.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        Self {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: parse_var("PORT").unwrap_or(DEFAULT_PORT),
            node_id: env::var("NODE_ID")
                .ok()
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(random_node_id),
            peer_timeout: Duration::from_secs(
                parse_var("PEER_TIMEOUT_SECS").unwrap_or(DEFAULT_PEER_TIMEOUT_SECS),
            ),
            pow_max_attempts: parse_var("POW_MAX_ATTEMPTS").filter(|&n: &u64| n > 0),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            node_id: random_node_id(),
            peer_timeout: Duration::from_secs(DEFAULT_PEER_TIMEOUT_SECS),
            pow_max_attempts: None,
        }
    }
}

fn parse_var<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// UUID v4 without dashes.
pub fn random_node_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_PORT, Settings, random_node_id};

    #[test]
    fn defaults_are_unbounded_and_local() {
        let s = Settings::default();
        assert_eq!(s.host, "127.0.0.1");
        assert_eq!(s.port, DEFAULT_PORT);
        assert_eq!(s.pow_max_attempts, None);
        assert_eq!(s.peer_timeout.as_secs(), 5);
    }

    #[test]
    fn node_ids_are_dashless_and_unique() {
        let a = random_node_id();
        let b = random_node_id();
        assert_eq!(a.len(), 32);
        assert!(!a.contains('-'));
        assert_ne!(a, b);
    }
}

//! Client configuration
//!
//! Defaults, overridable from the environment:
//!
//! - `LOBOTOMY_HOST`: server host (default: "localhost")
//! - `LOBOTOMY_PORT`: server port (default: 1452)
//! - `LOBOTOMY_NAME`: player name (default: generated `Henk_<n>`)
//! - `LOBOTOMY_SEED`: RNG seed for name and strategy (default: clock)
//! - `LOBOTOMY_MAX_TURNS`: leave the game after this many played turns
//! - `LOBOTOMY_STRATEGY`: `random` or `idle` (default: random)
//! - `LOBOTOMY_WIRE_LOG`: path of a JSONL transcript of the connection
//!
//! Unparseable values fall back to the default.

use std::env;

use crate::core::StrategyKind;
use crate::types::{DEFAULT_HOST, DEFAULT_PORT};

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub name: Option<String>,
    pub seed: Option<u32>,
    pub max_turns: Option<u64>,
    pub strategy: StrategyKind,
    pub wire_log: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            name: None,
            seed: None,
            max_turns: None,
            strategy: StrategyKind::Random,
            wire_log: None,
        }
    }
}

impl ClientConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let defaults = Self::default();

        let host = non_empty("LOBOTOMY_HOST").unwrap_or(defaults.host);
        let port = non_empty("LOBOTOMY_PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);
        let name = non_empty("LOBOTOMY_NAME");
        let seed = non_empty("LOBOTOMY_SEED").and_then(|s| s.parse::<u32>().ok());
        let max_turns = non_empty("LOBOTOMY_MAX_TURNS")
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|n| *n > 0);
        let strategy = non_empty("LOBOTOMY_STRATEGY")
            .and_then(|s| StrategyKind::from_str(&s))
            .unwrap_or(defaults.strategy);
        let wire_log = non_empty("LOBOTOMY_WIRE_LOG");

        Self {
            host,
            port,
            name,
            seed,
            max_turns,
            strategy,
            wire_log,
        }
    }
}

//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use fncon_store_lmdb::environment::{DEFAULT_MAP_SIZE, DEFAULT_MAX_DBS};

use crate::logging::LogFormat;
use crate::NodeError;

/// Configuration for a node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Chain identifier every vote set must carry.
    #[serde(default = "default_chain_id")]
    pub chain_id: String,

    /// Data directory for vote-set storage.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub gossip: GossipConfig,

    #[serde(default)]
    pub lmdb: LmdbConfig,
}

/// Broadcast limits.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GossipConfig {
    /// Cap on concurrently running peer sends; excess sends are dropped.
    #[serde(default = "default_max_in_flight_sends")]
    pub max_in_flight_sends: usize,

    /// Deadline for a single peer send, in milliseconds.
    #[serde(default = "default_send_timeout_ms")]
    pub send_timeout_ms: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LmdbConfig {
    #[serde(default = "default_map_size")]
    pub map_size: usize,

    #[serde(default = "default_max_dbs")]
    pub max_dbs: u32,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_chain_id() -> String {
    "fncon-dev".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./fncon_data")
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_in_flight_sends() -> usize {
    fncon_network::broadcast::DEFAULT_MAX_IN_FLIGHT
}

fn default_send_timeout_ms() -> u64 {
    5_000
}

fn default_map_size() -> usize {
    DEFAULT_MAP_SIZE
}

fn default_max_dbs() -> u32 {
    DEFAULT_MAX_DBS
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    pub fn parsed_log_format(&self) -> Result<LogFormat, NodeError> {
        self.log_format.parse().map_err(NodeError::Config)
    }
}

impl GossipConfig {
    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            chain_id: default_chain_id(),
            data_dir: default_data_dir(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            gossip: GossipConfig::default(),
            lmdb: LmdbConfig::default(),
        }
    }
}

impl Default for GossipConfig {
    fn default() -> Self {
        Self {
            max_in_flight_sends: default_max_in_flight_sends(),
            send_timeout_ms: default_send_timeout_ms(),
        }
    }
}

impl Default for LmdbConfig {
    fn default() -> Self {
        Self {
            map_size: default_map_size(),
            max_dbs: default_max_dbs(),
        }
    }
}

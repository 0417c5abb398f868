//! Node configuration with TOML file support.
//!
//! Carries exactly the configuration surface §6 lists for the block
//! processor, signature checker, unchecked cache, pruning, and account
//! sets, plus the minimal ambient fields needed to construct the process
//! (data directory, network, log format/level). CLI parsing is out of
//! scope — only the struct and its TOML (de)serialisation are carried.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use calyx_ledger::NetworkId;

use crate::NodeError;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    #[serde(default = "default_network")]
    pub network: NetworkId,

    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Max entries processed per write-transaction batch.
    #[serde(default = "default_batch_size")]
    pub block_processor_batch_size: usize,

    /// Queue depth above which `full()` reports backpressure.
    #[serde(default = "default_full_size")]
    pub block_processor_full_size: usize,

    /// Wall-clock ceiling per batch, in milliseconds.
    #[serde(default = "default_batch_max_time_ms")]
    pub block_processor_batch_max_time_ms: u64,

    /// Worker-pool size for Ed25519 batch verification.
    #[serde(default = "default_signature_checker_threads")]
    pub signature_checker_threads: usize,

    /// Age, in seconds, after which an unchecked entry is dropped.
    #[serde(default = "default_unchecked_cutoff_time_s")]
    pub unchecked_cutoff_time_s: u64,

    #[serde(default = "default_max_pruning_age_s")]
    pub max_pruning_age_s: u64,

    #[serde(default = "default_max_pruning_depth")]
    pub max_pruning_depth: u64,

    /// Cap on the ascending-bootstrap priorities set.
    #[serde(default = "default_priorities_max")]
    pub priorities_max: usize,

    /// Cap on the ascending-bootstrap blocking set.
    #[serde(default = "default_blocking_max")]
    pub blocking_max: usize,

    /// Minimum time between two `next()` picks of the same account.
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,

    #[serde(default = "default_log_format")]
    pub log_format: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_network() -> NetworkId {
    NetworkId::Dev
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("./calyx_data")
}
fn default_batch_size() -> usize {
    256
}
fn default_full_size() -> usize {
    65_536
}
fn default_batch_max_time_ms() -> u64 {
    500
}
fn default_signature_checker_threads() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4)
}
fn default_unchecked_cutoff_time_s() -> u64 {
    4 * 3600
}
fn default_max_pruning_age_s() -> u64 {
    5 * 24 * 3600
}
fn default_max_pruning_depth() -> u64 {
    100_000
}
fn default_priorities_max() -> usize {
    256
}
fn default_blocking_max() -> usize {
    256
}
fn default_cooldown_ms() -> u64 {
    1000
}
fn default_log_format() -> String {
    "human".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl NodeConfig {
    pub fn from_toml_file(path: &str) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("NodeConfig is always serializable to TOML")
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            data_dir: default_data_dir(),
            block_processor_batch_size: default_batch_size(),
            block_processor_full_size: default_full_size(),
            block_processor_batch_max_time_ms: default_batch_max_time_ms(),
            signature_checker_threads: default_signature_checker_threads(),
            unchecked_cutoff_time_s: default_unchecked_cutoff_time_s(),
            max_pruning_age_s: default_max_pruning_age_s(),
            max_pruning_depth: default_max_pruning_depth(),
            priorities_max: default_priorities_max(),
            blocking_max: default_blocking_max(),
            cooldown_ms: default_cooldown_ms(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}

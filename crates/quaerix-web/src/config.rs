//! Configuration loading.
//! Reads quaerix.json from the working directory or the path in QUAERIX_CONFIG.

use anyhow::Context;
use quaerix_queue::QueueConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_server_host")]
    pub server_host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_kg_url")]
    pub kg_url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_answer_workers")]
    pub answer_workers: usize,
    #[serde(default = "default_update_workers")]
    pub update_workers: usize,
}

fn default_server_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 6011 }
fn default_database_url() -> String { "sqlite://quaerix.db".to_string() }
fn default_kg_url() -> String { "http://127.0.0.1:7474".to_string() }
fn default_max_connections() -> u32 { 10 }
fn default_answer_workers() -> usize { 4 }
fn default_update_workers() -> usize { 1 }

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: default_server_host(),
            port: default_port(),
            database_url: default_database_url(),
            kg_url: default_kg_url(),
            max_connections: default_max_connections(),
            answer_workers: default_answer_workers(),
            update_workers: default_update_workers(),
        }
    }
}

impl Config {
    /// Load from QUAERIX_CONFIG or ./quaerix.json; a missing file yields the
    /// defaults so a bare checkout starts up.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("QUAERIX_CONFIG").unwrap_or_else(|_| "quaerix.json".to_string());
        Self::load_from(Path::new(&path))
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    pub fn queue_config(&self) -> QueueConfig {
        QueueConfig {
            answer_workers: self.answer_workers,
            update_workers: self.update_workers,
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.server_host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.server_host, self.port))
    }
}

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::db::{default_database_path, Database, DatabaseError};
use crate::model::Catalog;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub catalog: Catalog,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            listen_addr: default_listen_addr(),
            database: DatabaseConfig::default(),
            queue: QueueConfig::default(),
            assistant: AssistantConfig::default(),
            catalog: Catalog::default(),
        }
    }
}

/// Where visits are persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file. Defaults to `~/.visitdesk/data/visitdesk.db`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Keep everything in memory; nothing survives a restart.
    #[serde(default)]
    pub in_memory: bool,
}

impl DatabaseConfig {
    pub fn resolved_path(&self) -> Option<PathBuf> {
        match &self.path {
            Some(p) if !p.is_empty() => Some(PathBuf::from(p)),
            _ => default_database_path(),
        }
    }

    /// Opens the configured database. `in_memory` opens a private SQLite
    /// database that lives as long as the returned handle.
    pub fn open(&self) -> Result<Database, DatabaseError> {
        if self.in_memory {
            return Database::open_in_memory();
        }
        let path = self.resolved_path().ok_or_else(|| DatabaseError::Io {
            path: PathBuf::from("~/.visitdesk"),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "home directory not found",
            ),
        })?;
        Database::open(&path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Change events buffered per subscriber before it starts lagging.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

fn default_event_capacity() -> usize {
    64
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            event_capacity: default_event_capacity(),
        }
    }
}

/// Hosted LLM used by the chat assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// API key given inline. Prefer `api_key_file` or `api_key_env`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_file: Option<String>,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_assistant_timeout")]
    pub timeout_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_api_key_env() -> String {
    "API_KEY".to_string()
}

fn default_assistant_timeout() -> u64 {
    30
}

impl AssistantConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: default_model(),
            base_url: default_base_url(),
            api_key: None,
            api_key_file: None,
            api_key_env: default_api_key_env(),
            timeout_secs: default_assistant_timeout(),
        }
    }
}

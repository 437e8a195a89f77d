use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub streaming: StreamingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// SQLite file holding the catalog. `~` is expanded.
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Maximum pooled connections.
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

fn default_db_path() -> String {
    "streamcat.db".to_string()
}
fn default_pool_size() -> u32 {
    4
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            pool_size: default_pool_size(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StreamingConfig {
    /// Chunk size for reading local files (default: 64 KiB)
    #[serde(default = "default_read_buffer")]
    pub read_buffer_bytes: usize,

    /// `Cache-Control` sent with every stream response. Responses are
    /// access-gated, so shared caches must not keep them.
    #[serde(default = "default_cache_control")]
    pub cache_control: String,
}

fn default_read_buffer() -> usize {
    64 * 1024
}
fn default_cache_control() -> String {
    "private, no-cache".to_string()
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            read_buffer_bytes: default_read_buffer(),
            cache_control: default_cache_control(),
        }
    }
}

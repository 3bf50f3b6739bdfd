//! Server settings.

use crate::query::DEFAULT_MAX_PAGE_SIZE;
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    /// SQLite URL; the file is created when missing.
    pub database_url: String,
    /// Directory holding `*.json` seed files.
    pub seed_dir: PathBuf,
    pub host: String,
    pub port: u16,
    /// Upper bound applied to `pageSize`.
    pub max_page_size: u32,
    pub body_limit_bytes: usize,
    /// Requests per minute allowed from one client address; `0` disables the ceiling.
    pub rate_limit_per_minute: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            database_url: "sqlite://demons.db".into(),
            seed_dir: PathBuf::from("data"),
            host: "0.0.0.0".into(),
            port: 3000,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            body_limit_bytes: 64 * 1024,
            rate_limit_per_minute: 120,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

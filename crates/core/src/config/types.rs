use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Backing file configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Path of the JSON file holding the catalog.
    #[serde(default = "default_library_path")]
    pub path: PathBuf,
    /// Write to a temp file and rename over the backing file.
    #[serde(default = "default_true")]
    pub atomic_writes: bool,
    /// Copy an unparseable backing file aside before starting empty.
    #[serde(default = "default_true")]
    pub backup_on_recover: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_library_path(),
            atomic_writes: true,
            backup_on_recover: true,
        }
    }
}

fn default_library_path() -> PathBuf {
    PathBuf::from("library.json")
}

fn default_true() -> bool {
    true
}

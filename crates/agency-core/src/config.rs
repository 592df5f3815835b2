//! Agency configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use agency_policy::EXPIRING_SOON_DAYS;

/// Database path that keeps everything in memory.
pub const IN_MEMORY: &str = ":memory:";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the database file, or `:memory:`
    pub database_path: PathBuf,
    /// Write the demo users and policies into an empty store on init
    pub seed_demo_data: bool,
    /// Days before expiry at which a policy reads as expiring soon
    pub expiring_window_days: u32,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("agency.db"),
            seed_demo_data: true,
            expiring_window_days: EXPIRING_SOON_DAYS,
        }
    }

    pub fn in_memory() -> Self {
        Self {
            database_path: PathBuf::from(IN_MEMORY),
            ..Self::default()
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("agency"))
            .unwrap_or_else(|| PathBuf::from(".agency"))
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path == Path::new(IN_MEMORY)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

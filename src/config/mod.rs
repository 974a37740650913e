use anyhow::{Context, Result};
use directories::ProjectDirs;
use dotenvy::dotenv;
use serde::Deserialize;
use std::path::PathBuf;

fn default_store_url() -> String {
    "https://records.leadmanager.dev/v0".to_string()
}

/// Configuration for the application
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Base URL of the hosted record store API
    #[serde(default = "default_store_url")]
    pub store_url: String,
    /// Workspace identifier inside the hosted store
    pub store_workspace: String,
    /// API key authorizing requests against the workspace
    pub store_api_key: String,
    /// Automation webhook endpoint; unset means the trigger only logs
    #[serde(default)]
    pub webhook_url: Option<String>,
    /// Session file override; defaults under the platform data directory
    #[serde(default)]
    pub session_file: Option<PathBuf>,
    /// Log file override; defaults under the platform data directory
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize environment variables into Config struct
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Parse environment variables into Config struct
        let config = envy::from_env::<Config>()?;

        Ok(config)
    }

    pub fn session_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.session_file {
            return Ok(path.clone());
        }
        Ok(data_dir()?.join("session.json"))
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.log_file {
            return Ok(path.clone());
        }
        Ok(data_dir()?.join("lead-manager.log"))
    }
}

fn data_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("dev", "leadmanager", "lead-manager")
        .context("could not determine a platform data directory")?;
    Ok(dirs.data_dir().to_path_buf())
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    // Ensure .env file is loaded
    dotenv().ok();

    // Load the configuration
    let config = Config::load()?;

    Ok(config)
}

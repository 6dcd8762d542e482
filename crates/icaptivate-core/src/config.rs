use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

use crate::api::DEFAULT_API_URL;
use crate::navigation::Session;
use crate::state::{Perspective, ToneLevel};

pub const API_URL_ENV: &str = "ICAPTIVATE_API_URL";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api_url: Option<String>,
    pub has_completed_onboarding: bool,
    pub default_perspective: Option<Perspective>,
    pub default_tone: Option<ToneLevel>,
    pub theme: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, config_content)?;
        Ok(())
    }

    /// Record finished onboarding in the file at `config_path`, keeping the
    /// other settings. A file that fails to load is left untouched.
    pub fn mark_onboarding_complete(config_path: &Path) -> Result<()> {
        let mut config = Self::load_from(config_path)?;
        config.has_completed_onboarding = true;
        config.save_to(config_path)
    }

    /// Base URL of the suggestions service; the environment wins over the file.
    pub fn api_url(&self) -> String {
        resolve_api_url(std::env::var(API_URL_ENV).ok(), self.api_url.as_deref())
    }

    /// Authentication is never persisted, so every launch starts signed out.
    pub fn session(&self) -> Session {
        Session {
            has_completed_onboarding: self.has_completed_onboarding,
            is_authenticated: false,
        }
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("icaptivate").join("config.json"))
    }
}

fn resolve_api_url(from_env: Option<String>, from_file: Option<&str>) -> String {
    from_env
        .filter(|url| !url.trim().is_empty())
        .or_else(|| from_file.map(str::to_string))
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

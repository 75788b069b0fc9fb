// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::summary_image::SUMMARY_FILE_NAME;

pub const DEFAULT_COUNTRIES_API_URL: &str =
    "https://restcountries.com/v2/all?fields=name,capital,region,population,flag,currencies";
pub const DEFAULT_EXCHANGE_API_URL: &str = "https://open.er-api.com/v6/latest/USD";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub cache_dir: PathBuf,
    pub countries_api_url: String,
    pub exchange_api_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            database_url: "sqlite://country.db".to_string(),
            cache_dir: PathBuf::from("cache"),
            countries_api_url: DEFAULT_COUNTRIES_API_URL.to_string(),
            exchange_api_url: DEFAULT_EXCHANGE_API_URL.to_string(),
        }
    }
}

impl Config {
    pub fn summary_image_path(&self) -> PathBuf {
        self.cache_dir.join(SUMMARY_FILE_NAME)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Apply overrides from the environment.
    ///
    /// | Env Var             | Field               |
    /// |---------------------|---------------------|
    /// | `HOST`              | `host`              |
    /// | `PORT`              | `port`              |
    /// | `DATABASE_URL`      | `database_url`      |
    /// | `CACHE_DIR`         | `cache_dir`         |
    /// | `COUNTRIES_API_URL` | `countries_api_url` |
    /// | `EXCHANGE_API_URL`  | `exchange_api_url`  |
    pub fn apply_env<F>(mut self, var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = var("HOST") {
            self.host = host;
        }
        if let Some(port) = var("PORT") {
            self.port = port
                .parse()
                .with_context(|| format!("PORT must be a valid port number, got {port:?}"))?;
        }
        if let Some(url) = var("DATABASE_URL") {
            self.database_url = url;
        }
        if let Some(dir) = var("CACHE_DIR") {
            self.cache_dir = PathBuf::from(dir);
        }
        if let Some(url) = var("COUNTRIES_API_URL") {
            self.countries_api_url = url;
        }
        if let Some(url) = var("EXCHANGE_API_URL") {
            self.exchange_api_url = url;
        }
        Ok(self)
    }
}

fn default_config_path() -> PathBuf {
    PathBuf::from("config.toml")
}

/// Defaults, then `config.toml` if present, then environment variables.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => read_config_file(path)?,
        None => {
            let path = default_config_path();
            if path.exists() {
                read_config_file(&path)?
            } else {
                Config::default()
            }
        }
    };

    config.apply_env(|key| env::var(key).ok())
}

fn read_config_file(path: &Path) -> anyhow::Result<Config> {
    let config_str = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: Config = toml::from_str(&config_str)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    Ok(config)
}

//! Application configuration loading from config.toml
//!
//! The file is optional. It carries the HTTP server settings and the payment methods
//! and categories that are seeded into the database on first run.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Environment variable naming the config file
pub const CONFIG_PATH_VAR: &str = "CONTA_CORRENTE_CONFIG";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Payment methods to seed
    #[serde(default)]
    pub formas_pagamento: Vec<FormaPagamentoConfig>,
    /// Categories to seed
    #[serde(default)]
    pub categorias: Vec<CategoriaConfig>,
}

/// HTTP server settings
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Per-request timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

const fn default_request_timeout_secs() -> u64 {
    30
}

/// A payment method to seed
#[derive(Debug, Deserialize, Clone)]
pub struct FormaPagamentoConfig {
    /// Label, e.g. `"PIX"`
    pub nome: String,
}

/// A category to seed
#[derive(Debug, Deserialize, Clone)]
pub struct CategoriaConfig {
    /// Unique name
    pub nome: String,
    /// Description
    #[serde(default)]
    pub descricao: String,
    /// Hex color, `#RRGGBB`
    pub cor: String,
}

/// Loads the application configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads the configuration named by `CONTA_CORRENTE_CONFIG` (default `./config.toml`).
///
/// A missing file is not an error: defaults are used and nothing is seeded.
pub fn load_default_config() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| "config.toml".to_string());
    if Path::new(&path).exists() {
        tracing::info!(path = %path, "Loading configuration");
        load_config(path)
    } else {
        tracing::warn!(path = %path, "Config file not found, using defaults");
        Ok(AppConfig::default())
    }
}

use std::{net::SocketAddr, path::Path};

use anyhow::Context;
use twelf::{Layer, config};

/// Optional YAML file read before the environment.
pub const CONFIG_FILE: &str = "vintage_reads.yaml";
/// Environment variables override the file, e.g. `VINTAGE_BIND_ADDR`.
pub const ENV_PREFIX: &str = "VINTAGE_";

const DEFAULT_DB_CONNECTION_STRING: &str = "sqlite://db.sqlite?mode=rwc";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_PUBLIC_URL: &str = "http://localhost:3000";

fn default_db_connection_string() -> String {
    DEFAULT_DB_CONNECTION_STRING.into()
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.into()
}

fn default_public_url() -> String {
    DEFAULT_PUBLIC_URL.into()
}

#[config]
#[derive(Debug, Clone)]
pub struct Config {
    #[serde(default = "default_db_connection_string")]
    pub db_connection_string: String,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Base URL advertised in the OpenAPI document
    #[serde(default = "default_public_url")]
    pub public_url: String,
    /// YAML list of books inserted when the catalog is empty
    #[serde(default)]
    pub catalog_seed_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            db_connection_string: default_db_connection_string(),
            bind_addr: default_bind_addr(),
            public_url: default_public_url(),
            catalog_seed_path: None,
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let mut layers = Vec::new();
        if Path::new(CONFIG_FILE).exists() {
            layers.push(Layer::Yaml(CONFIG_FILE.into()));
        }
        layers.push(Layer::Env(Some(ENV_PREFIX.to_string())));
        Config::with_layers(&layers).with_context(|| "Failed to load configuration")
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.db_connection_string.is_empty() {
            return Err("VINTAGE_DB_CONNECTION_STRING is empty".into());
        }
        if self.bind_addr.parse::<SocketAddr>().is_err() {
            return Err(format!("VINTAGE_BIND_ADDR is not a socket address: {}", self.bind_addr));
        }
        if !(self.public_url.starts_with("http://") || self.public_url.starts_with("https://")) {
            return Err(format!("VINTAGE_PUBLIC_URL must be an http(s) URL: {}", self.public_url));
        }
        if let Some(path) = &self.catalog_seed_path {
            if !Path::new(path).exists() {
                return Err(format!("VINTAGE_CATALOG_SEED_PATH does not exist: {}", path));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        let bad_addr = Config {
            bind_addr: "localhost".into(),
            ..Config::default()
        };
        assert!(bad_addr.validate().is_err());

        let bad_url = Config {
            public_url: "localhost:3000".into(),
            ..Config::default()
        };
        assert!(bad_url.validate().is_err());

        let missing_seed = Config {
            catalog_seed_path: Some("/definitely/not/here.yaml".into()),
            ..Config::default()
        };
        assert!(missing_seed.validate().is_err());
    }
}

//! Layered configuration.
//!
//! Defaults, then `agriha.toml` (or the file named by `AGRIHA_CONFIG`), then
//! `AGRIHA_*` environment variables. Nested keys use `__`, e.g.
//! `AGRIHA_GEOCODER__DEBOUNCE_MS=500`.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

use crate::error::Result;
use crate::geocoding::GeocodeParams;
use crate::listing::PageSizes;
use crate::map::MapSettings;

pub const DEFAULT_CONFIG_FILE: &str = "agriha.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlConfig {
    /// The real backend the proxy forwards to
    pub upstream: Url,
    pub timeout_secs: u64,
}

impl Default for GraphQlConfig {
    fn default() -> Self {
        Self {
            upstream: Url::parse("http://localhost:4000/graphql").expect("static upstream URL is valid"),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// JSON file standing in for browser local storage
    pub storage_path: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from(".agriha/session.json"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub graphql: GraphQlConfig,
    #[serde(default)]
    pub geocoder: GeocodeParams,
    #[serde(default)]
    pub map: MapSettings,
    #[serde(default)]
    pub listing: PageSizes,
    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    /// Load from the default file location plus environment.
    pub fn load() -> Result<Self> {
        let path = std::env::var("AGRIHA_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(path)
    }

    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        info!("Loading configuration (file: {})", path.display());
        Ok(Self::figment(path).extract()?)
    }

    pub fn figment(path: PathBuf) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("AGRIHA_").ignore(&["config"]).split("__"))
    }
}

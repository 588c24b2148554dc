//! Configuration loading for Straitwatch.
//! Reads straitwatch.toml from the current directory or the path in the STRAITWATCH_CONFIG env var.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use crate::error::{ConfigError, Result};

pub const CONFIG_ENV: &str = "STRAITWATCH_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "straitwatch.toml";

pub const BIND_ENV: &str = "STRAITWATCH_BIND";
pub const DATABASE_ENV: &str = "STRAITWATCH_DATABASE";
pub const KPLER_KEY_ENV: &str = "STRAITWATCH_KPLER_API_KEY";
pub const ADSB_KEY_ENV: &str = "STRAITWATCH_ADSB_API_KEY";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

fn default_bind() -> String { "127.0.0.1:8000".to_string() }

/// Locations of the three fitted artifacts loaded at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelsConfig {
    #[serde(default = "default_titanic_model")]
    pub titanic: PathBuf,
    #[serde(default = "default_housing_scaler")]
    pub housing_scaler: PathBuf,
    #[serde(default = "default_housing_model")]
    pub housing_model: PathBuf,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            titanic: default_titanic_model(),
            housing_scaler: default_housing_scaler(),
            housing_model: default_housing_model(),
        }
    }
}

fn default_titanic_model()  -> PathBuf { PathBuf::from("models/titanic_model.json") }
fn default_housing_scaler() -> PathBuf { PathBuf::from("models/housing_scaler.json") }
fn default_housing_model()  -> PathBuf { PathBuf::from("models/housing_model.json") }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: default_database_path() }
    }
}

fn default_database_path() -> PathBuf { PathBuf::from("data/straitwatch.db") }

#[derive(Debug, Deserialize)]
pub struct ProvidersConfig {
    /// Wall-clock bound on each upstream call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_maritime")]
    pub maritime: ProviderConfig,
    #[serde(default = "default_air")]
    pub air: ProviderConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            maritime: default_maritime(),
            air: default_air(),
        }
    }
}

fn default_timeout_secs() -> u64 { 10 }

fn default_maritime() -> ProviderConfig {
    ProviderConfig { url: "https://kpler-api-endpoint".to_string(), api_key: None }
}

fn default_air() -> ProviderConfig {
    ProviderConfig { url: "https://adsbexchange-api-endpoint".to_string(), api_key: None }
}

/// An upstream traffic data provider authenticated with a bearer token.
#[derive(Debug, Deserialize)]
pub struct ProviderConfig {
    pub url: String,
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub api_key: Option<SecretString>,
}

impl ProviderConfig {
    fn has_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> std::result::Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.map(SecretString::from))
}

impl Config {
    /// Load configuration for the gateway.
    ///
    /// Reads `.env` if present, then the TOML file named by STRAITWATCH_CONFIG
    /// (default `straitwatch.toml`), then applies environment overrides.
    pub fn load() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                warn!("Ignoring unreadable .env file: {}", e);
            }
        }

        let path = std::env::var(CONFIG_ENV)
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let mut config = Self::from_path_or_default(Path::new(&path))?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse the file at `path`, or fall back to defaults when it does not exist.
    pub fn from_path_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(
                "Config file not found: {} (using defaults; copy straitwatch.example.toml to configure)",
                path.display()
            );
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment overrides through `lookup`.
    ///
    /// API keys from the environment only fill in keys left empty in the file.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup(BIND_ENV).filter(|v| !v.is_empty()) {
            self.server.bind = bind;
        }
        if let Some(db) = lookup(DATABASE_ENV).filter(|v| !v.is_empty()) {
            self.database.path = PathBuf::from(db);
        }

        for (provider, env_key, name) in [
            (&mut self.providers.maritime, KPLER_KEY_ENV, "maritime"),
            (&mut self.providers.air, ADSB_KEY_ENV, "air"),
        ] {
            if provider.has_key() {
                continue;
            }
            match lookup(env_key).filter(|v| !v.is_empty()) {
                Some(key) => provider.api_key = Some(SecretString::from(key)),
                None => warn!(
                    "{} traffic provider has no API key (set providers.{}.api_key or {})",
                    name, name, env_key
                ),
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr()?;
        if self.providers.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "providers.timeout_secs must be greater than zero".to_string(),
            ));
        }
        for (name, provider) in [("maritime", &self.providers.maritime), ("air", &self.providers.air)] {
            if provider.url.is_empty() {
                return Err(ConfigError::Invalid(format!("providers.{}.url is empty", name)));
            }
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server.bind.parse().map_err(|e| {
            ConfigError::Invalid(format!("server.bind '{}': {}", self.server.bind, e))
        })
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.providers.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.bind, "127.0.0.1:8000");
        assert_eq!(config.providers.timeout_secs, 10);
        assert_eq!(config.provider_timeout(), Duration::from_secs(10));
        assert_eq!(config.database.path, PathBuf::from("data/straitwatch.db"));
        assert!(config.providers.maritime.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [server]
            bind = "0.0.0.0:9000"

            [providers.maritime]
            url = "https://maritime.example"
            api_key = "kpler-secret"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.providers.maritime.url, "https://maritime.example");
        assert_eq!(
            config.providers.maritime.api_key.as_ref().unwrap().expose_secret(),
            "kpler-secret"
        );
        assert_eq!(config.providers.air.url, "https://adsbexchange-api-endpoint");
        assert_eq!(config.models.titanic, PathBuf::from("models/titanic_model.json"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::from_toml_str(
            r#"
            [providers.air]
            url = "https://air.example"
            api_key = "from-file"
            "#,
        )
        .unwrap();

        config.apply_overrides(lookup_from(&[
            (BIND_ENV, "127.0.0.1:8123"),
            (DATABASE_ENV, "/tmp/other.db"),
            (KPLER_KEY_ENV, "from-env"),
            (ADSB_KEY_ENV, "ignored"),
        ]));

        assert_eq!(config.server.bind, "127.0.0.1:8123");
        assert_eq!(config.database.path, PathBuf::from("/tmp/other.db"));
        assert_eq!(
            config.providers.maritime.api_key.as_ref().unwrap().expose_secret(),
            "from-env"
        );
        // A key set in the file wins over the environment.
        assert_eq!(
            config.providers.air.api_key.as_ref().unwrap().expose_secret(),
            "from-file"
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        let config = Config::from_toml_str("[server]\nbind = \"not an address\"").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = Config::from_toml_str("[providers]\ntimeout_secs = 0").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        assert!(matches!(
            Config::from_toml_str("[server\nbind = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_path_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:8000");
    }

    #[test]
    fn test_secret_is_redacted_in_debug() {
        let config = Config::from_toml_str(
            "[providers.maritime]\nurl = \"https://m\"\napi_key = \"hunter2\"",
        )
        .unwrap();
        assert!(!format!("{:?}", config).contains("hunter2"));
    }
}

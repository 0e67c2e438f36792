use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NbpProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub nbp: Option<NbpProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            nbp: Some(NbpProviderConfig {
                base_url: "https://api.nbp.pl".to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BatchConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_delay_ms")]
    pub chunk_delay_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            chunk_size: default_chunk_size(),
            chunk_delay_ms: default_chunk_delay_ms(),
        }
    }
}

fn default_chunk_size() -> usize {
    50
}

fn default_chunk_delay_ms() -> u64 {
    100
}

fn default_currency() -> String {
    "EUR".to_string()
}

fn default_max_rate_fallbacks() -> usize {
    10
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default = "default_max_rate_fallbacks")]
    pub max_rate_fallbacks: usize,
    #[serde(default)]
    pub data_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            currency: default_currency(),
            batch: BatchConfig::default(),
            max_rate_fallbacks: default_max_rate_fallbacks(),
            data_path: None,
        }
    }
}

impl AppConfig {
    /// Loads the default config file, falling back to built-in defaults
    /// when none exists. The `setup` command materializes the file.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config file found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "mkowalik", "eur2pln")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("dev", "mkowalik", "eur2pln")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
providers:
  nbp:
    base_url: "http://example.com/nbp"
currency: "EUR"
batch:
  chunk_size: 25
  chunk_delay_ms: 250
max_rate_fallbacks: 5
data_path: "/tmp/eur2pln"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(
            config.providers.nbp.unwrap().base_url,
            "http://example.com/nbp"
        );
        assert_eq!(config.currency, "EUR");
        assert_eq!(config.batch.chunk_size, 25);
        assert_eq!(config.batch.chunk_delay_ms, 250);
        assert_eq!(config.max_rate_fallbacks, 5);
        assert_eq!(config.data_path, Some("/tmp/eur2pln".to_string()));
    }

    #[test]
    fn test_config_defaults_applied() {
        let config: AppConfig = serde_yaml::from_str("currency: \"EUR\"").unwrap();
        assert_eq!(config.batch.chunk_size, 50);
        assert_eq!(config.batch.chunk_delay_ms, 100);
        assert_eq!(config.max_rate_fallbacks, 10);
        assert_eq!(
            config.providers.nbp.unwrap().base_url,
            "https://api.nbp.pl"
        );
        assert!(config.data_path.is_none());
    }

    #[test]
    fn test_default_values() {
        let config = AppConfig::default();
        assert_eq!(config.currency, "EUR");
        assert_eq!(config.batch.chunk_size, 50);
        assert_eq!(config.max_rate_fallbacks, 10);
    }
}

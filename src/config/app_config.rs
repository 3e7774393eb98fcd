use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::provider_config::{MercadoLibreConfig, SamsConfig};

pub const DEFAULT_CONFIG_PATH: &str = "src/configs/providers.toml";

/// Top-level configuration for price resolution
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub batch: BatchConfig,
    pub scoring: ScoringWeights,
    pub shopping: ShoppingConfig,
    pub mercadolibre: MercadoLibreConfig,
    pub sams: SamsConfig,
}

/// Outbound request behaviour shared by both providers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_attempts: usize,
    pub retry_base_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Names resolved concurrently per window
    pub concurrency: usize,
}

/// Tuned weights of the best-match heuristic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub head_prefix_bonus: f64,
    pub head_substring_bonus: f64,
    pub token_match: f64,
    pub root_match: f64,
    /// Query tokens shorter than this are discarded
    pub min_token_chars: usize,
    /// Singular roots shorter than this never earn the root bonus
    pub min_root_chars: usize,
}

/// Rules deciding which inventory items land on the shopping list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShoppingConfig {
    pub low_stock_threshold: i64,
    pub expiring_within_days: i64,
    pub default_category: String,
    pub high_velocity_categories: Vec<String>,
}

impl AppConfig {
    /// Layer an optional TOML file and `PANTRY__*` environment variables over the defaults
    pub fn load(path: &str) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(Path::new(path)).required(false))
            .add_source(
                ::config::Environment::with_prefix("PANTRY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path))?;

        let config: AppConfig = settings
            .try_deserialize()
            .with_context(|| format!("Failed to parse configuration from {}", path))?;

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content).context("Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch.concurrency == 0 {
            return Err(anyhow!("Batch concurrency must be at least 1"));
        }

        if self.http.max_attempts == 0 {
            return Err(anyhow!("HTTP max_attempts must be at least 1"));
        }

        if self.mercadolibre.mock.modulus == 0 || self.sams.mock.modulus == 0 {
            return Err(anyhow!("Mock pricing modulus cannot be zero"));
        }

        for (name, template) in [
            ("mercadolibre.search_url", &self.mercadolibre.search_url),
            ("sams.search_url", &self.sams.search_url),
        ] {
            if !template.contains("{query}") {
                return Err(anyhow!("{} must contain a {{query}} placeholder", name));
            }
        }

        Ok(())
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
            timeout_seconds: 20,
            max_attempts: 2,
            retry_base_delay_ms: 250,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { concurrency: 3 }
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            head_prefix_bonus: 10.0,
            head_substring_bonus: 3.0,
            token_match: 1.0,
            root_match: 0.5,
            min_token_chars: 3,
            min_root_chars: 3,
        }
    }
}

impl Default for ShoppingConfig {
    fn default() -> Self {
        Self {
            low_stock_threshold: 1,
            expiring_within_days: 3,
            default_category: "Varios".to_string(),
            high_velocity_categories: vec![
                "Alimentos".to_string(),
                "Bebidas".to_string(),
                "Salud".to_string(),
                "Mascotas".to_string(),
                "Limpieza".to_string(),
                "Higiene".to_string(),
            ],
        }
    }
}

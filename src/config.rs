use crate::models::ImageStrategy;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub fetch: FetchSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    /// Minimum text similarity for a candidate to be included.
    /// Empirical constant from field use, not a derived optimum.
    #[serde(default = "default_text_threshold")]
    pub text_threshold: f64,
    #[serde(default)]
    pub strategy: ImageStrategy,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default)]
    pub advanced_weights: AdvancedWeightsConfig,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            text_threshold: default_text_threshold(),
            strategy: ImageStrategy::default(),
            concurrency: default_concurrency(),
            weights: WeightsConfig::default(),
            advanced_weights: AdvancedWeightsConfig::default(),
        }
    }
}

fn default_text_threshold() -> f64 {
    0.6
}
fn default_concurrency() -> usize {
    8
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_text_weight")]
    pub text: f64,
    #[serde(default = "default_image_weight")]
    pub image: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            text: default_text_weight(),
            image: default_image_weight(),
        }
    }
}

fn default_text_weight() -> f64 {
    0.7
}
fn default_image_weight() -> f64 {
    0.3
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdvancedWeightsConfig {
    #[serde(default = "default_advanced_text_weight")]
    pub text: f64,
    #[serde(default = "default_features_weight")]
    pub features: f64,
}

impl Default for AdvancedWeightsConfig {
    fn default() -> Self {
        Self {
            text: default_advanced_text_weight(),
            features: default_features_weight(),
        }
    }
}

fn default_advanced_text_weight() -> f64 {
    0.6
}
fn default_features_weight() -> f64 {
    0.4
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            cache_capacity: default_cache_capacity(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}
fn default_cache_capacity() -> u64 {
    256
}
fn default_cache_ttl_secs() -> u64 {
    600
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with SHOPMATCH_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with SHOPMATCH_)
            // e.g., SHOPMATCH__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("SHOPMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("SHOPMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub training: TrainingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the HTTP API
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Directory holding the persisted classifier, scaler and accuracy
    #[serde(default = "default_model_dir")]
    pub dir: PathBuf,
    /// Optional TOML file overriding the built-in narration tables
    #[serde(default)]
    pub narration_tables: Option<PathBuf>,
}

fn default_model_dir() -> PathBuf {
    PathBuf::from("models")
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            dir: default_model_dir(),
            narration_tables: None,
        }
    }
}

impl ModelConfig {
    pub fn classifier_path(&self) -> PathBuf {
        self.dir.join("classifier.json")
    }

    pub fn scaler_path(&self) -> PathBuf {
        self.dir.join("scaler.json")
    }

    pub fn accuracy_path(&self) -> PathBuf {
        self.dir.join("accuracy.json")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    /// Local path of the semicolon-delimited training CSV
    #[serde(default = "default_dataset_path")]
    pub path: PathBuf,
    /// Download URL used when the CSV is absent on disk
    #[serde(default)]
    pub url: Option<String>,
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("datasets/cardio_train.csv")
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
            url: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrainingConfig {
    /// Fraction of each class held out for the accuracy estimate
    #[serde(default = "default_test_fraction")]
    pub test_fraction: f64,
    /// Seed for the stratified shuffle (fixed for reproducible accuracy)
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Gradient-descent epochs
    #[serde(default = "default_epochs")]
    pub epochs: usize,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    /// L2 penalty applied to the weights (not the bias)
    #[serde(default = "default_l2")]
    pub l2: f64,
}

fn default_test_fraction() -> f64 {
    0.2
}

fn default_seed() -> u64 {
    42
}

fn default_epochs() -> usize {
    400
}

fn default_learning_rate() -> f64 {
    0.1
}

fn default_l2() -> f64 {
    1e-4
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_fraction: default_test_fraction(),
            seed: default_seed(),
            epochs: default_epochs(),
            learning_rate: default_learning_rate(),
            l2: default_l2(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("CARDIO_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (CARDIO_SERVER__PORT, etc.)
            .add_source(
                Environment::with_prefix("CARDIO")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_files() {
        let cfg = AppConfig::load_from("does/not/exist").unwrap();
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.training.seed, 42);
        assert!((cfg.training.test_fraction - 0.2).abs() < f64::EPSILON);
        assert_eq!(cfg.model.classifier_path(), PathBuf::from("models/classifier.json"));
        assert!(cfg.dataset.url.is_none());
    }
}

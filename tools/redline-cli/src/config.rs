//! CLI configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use redline_commerce::config::PricingConfig;
use redline_data::{DependencyTag, FetchPolicy, RetryPolicy, TimeoutConfig};
use serde::{Deserialize, Serialize};

/// File names searched for, in order, in each directory.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["redline.toml", ".redline.toml", "redline.json"];

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "REDLINE_CONFIG";

/// Redline configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedlineConfig {
    /// Totals: currency, shipping and tax.
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Catalog service.
    #[serde(default = "ServiceConfig::catalog")]
    pub catalog: ServiceConfig,

    /// Payment processor.
    #[serde(default = "ServiceConfig::payment")]
    pub payment: ServiceConfig,

    /// Local state.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for RedlineConfig {
    fn default() -> Self {
        Self {
            pricing: PricingConfig::default(),
            catalog: ServiceConfig::catalog(),
            payment: ServiceConfig::payment(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl RedlineConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Problems that make the config unusable, and ones worth a warning.
    pub fn check(&self) -> (Vec<String>, Vec<String>) {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if self.pricing.free_shipping_threshold_cents < 0 {
            errors.push("pricing.free_shipping_threshold_cents must not be negative".to_string());
        }
        if self.pricing.flat_shipping_cents < 0 {
            errors.push("pricing.flat_shipping_cents must not be negative".to_string());
        }
        if self.pricing.tax_rate.basis_points() > 5_000 {
            warnings.push(format!(
                "pricing.tax_rate {} looks too high",
                self.pricing.tax_rate.as_fraction()
            ));
        }

        for (name, service) in [("catalog", &self.catalog), ("payment", &self.payment)] {
            match service.base_url.as_deref() {
                None => warnings.push(format!("{name}.base_url is not set")),
                Some(url) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                    errors.push(format!("{name}.base_url must be an http(s) URL"))
                }
                Some(_) => {}
            }
            if service.timeout_secs == 0 {
                errors.push(format!("{name}.timeout_secs must be at least 1"));
            }
        }
        if self.payment.base_url.is_some() && self.payment.api_key.is_none() {
            warnings.push("payment.api_key is not set".to_string());
        }
        if self.storage.cart_id.trim().is_empty() {
            errors.push("storage.cart_id must not be empty".to_string());
        }

        (errors, warnings)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Settings for one outbound dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL, e.g. `https://api.example.com/v1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// API key sent as a bearer token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Total time allowed per attempt.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries after the first attempt.
    #[serde(default = "default_retries")]
    pub retries: u32,
}

fn default_timeout_secs() -> u64 {
    12
}

fn default_retries() -> u32 {
    1
}

impl ServiceConfig {
    fn for_tag(tag: DependencyTag) -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout_secs: tag.default_timeout().as_secs(),
            retries: tag.default_max_retries(),
        }
    }

    fn catalog() -> Self {
        Self::for_tag(DependencyTag::Catalog)
    }

    fn payment() -> Self {
        Self::for_tag(DependencyTag::Payment)
    }

    /// Timeout and retry policy for this service.
    pub fn fetch_policy(&self) -> FetchPolicy {
        FetchPolicy::new(
            TimeoutConfig::from_secs(self.timeout_secs.max(1)),
            RetryPolicy::new(self.retries),
        )
    }
}

/// Where local state lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// State directory, relative to the config file's directory.
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,

    /// Cart slot used by this shell.
    #[serde(default = "default_cart_id")]
    pub cart_id: String,
}

fn default_state_dir() -> PathBuf {
    PathBuf::from(".redline")
}

fn default_cart_id() -> String {
    "default".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
            cart_id: default_cart_id(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, one line per event.
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
}

/// Log output settings. `RUST_LOG` wins over `level` when set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: default_log_level(),
        }
    }
}

/// Generate a default redline.toml config file.
pub fn generate_default_config() -> String {
    r#"# Redline storefront configuration

[pricing]
currency = "USD"
free_shipping_threshold_cents = 9900
flat_shipping_cents = 1299
tax_rate = 0.085

[catalog]
# base_url = "https://catalog.example.com/v1"
# api_key = ""
timeout_secs = 12
retries = 1

[payment]
# base_url = "https://api.payments.example.com/v1"
# api_key = ""
timeout_secs = 12
retries = 1

[storage]
state_dir = ".redline"
cart_id = "default"

[logging]
format = "compact"
level = "warn"
"#
    .to_string()
}

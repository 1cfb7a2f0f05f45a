//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use redline_cache::Cache;
use redline_commerce::cart::CartSession;
use redline_commerce::checkout::OrderStore;
use redline_commerce::ids::CartId;
use redline_data::{CatalogClient, DependencyTag, FetchClient, PaymentClient};

use crate::config::{RedlineConfig, CONFIG_ENV_VAR, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// Loaded configuration.
    pub config: RedlineConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from an explicit path, `REDLINE_CONFIG`, or the nearest
    /// config file above the working directory.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let explicit = config_path
            .map(PathBuf::from)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

        let config_path = match explicit {
            Some(path) => Some(resolve(&cwd, &path)),
            None => find_config(&cwd),
        };
        let config = match &config_path {
            Some(path) => RedlineConfig::load(path)?,
            None => RedlineConfig::default(),
        };

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Directory the state directory is relative to.
    fn base_dir(&self) -> &Path {
        self.config_path
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or(self.cwd.as_path())
    }

    /// Resolved state directory.
    pub fn state_dir(&self) -> PathBuf {
        resolve(self.base_dir(), &self.config.storage.state_dir)
    }

    /// Open the local store.
    pub fn cache(&self) -> Result<Cache> {
        let dir = self.state_dir();
        Cache::open_dir(&dir).with_context(|| format!("Failed to open state directory {}", dir.display()))
    }

    /// Id of the cart this shell works on.
    pub fn cart_id(&self) -> CartId {
        CartId::new(self.config.storage.cart_id.trim())
    }

    /// Open the configured cart.
    pub fn cart_session(&self) -> Result<CartSession> {
        Ok(CartSession::open(self.cache()?, self.cart_id(), self.config.pricing.currency))
    }

    /// Open the order store.
    pub fn order_store(&self) -> Result<OrderStore> {
        Ok(OrderStore::new(self.cache()?, self.config.pricing.currency))
    }

    /// Client for the catalog service.
    pub fn catalog_client(&self) -> Result<CatalogClient> {
        let service = &self.config.catalog;
        let Some(base_url) = service.base_url.as_deref() else {
            bail!("catalog.base_url is not configured. Run `redline config init` and set it.");
        };
        let fetch = FetchClient::with_reqwest(DependencyTag::Catalog, service.fetch_policy())?;
        let mut client = CatalogClient::new(fetch, base_url).with_currency(self.config.pricing.currency);
        if let Some(key) = &service.api_key {
            client = client.with_api_key(key.as_str());
        }
        Ok(client)
    }

    /// Client for the payment processor.
    pub fn payment_client(&self) -> Result<PaymentClient> {
        let service = &self.config.payment;
        let (Some(base_url), Some(key)) = (service.base_url.as_deref(), service.api_key.as_deref()) else {
            bail!("payment.base_url and payment.api_key must be configured to take card payments");
        };
        let fetch = FetchClient::with_reqwest(DependencyTag::Payment, service.fetch_policy())?;
        Ok(PaymentClient::new(fetch, base_url, key))
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Find the nearest config file in the directory tree.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in &CONFIG_FILE_NAMES {
            let candidate = current.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        if !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_config_walks_up() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.path().join(".redline.toml"), "").unwrap();

        let found = find_config(&nested).unwrap();
        assert_eq!(found, root.path().join(".redline.toml"));
    }

    #[test]
    fn test_nearest_config_wins() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("shop");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.path().join("redline.toml"), "").unwrap();
        std::fs::write(nested.join("redline.json"), "{}").unwrap();

        assert_eq!(find_config(&nested).unwrap(), nested.join("redline.json"));
    }
}

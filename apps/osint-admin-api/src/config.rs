use anyhow::{Context, Result, bail};
use osint_admin_core::Pricing;
use serde::Deserialize;
use std::fs;

const CONFIG_PATHS: &[&str] = &["/etc/osint-admin/api.toml", "./api.toml"];

#[derive(Clone, Deserialize)]
pub struct ApiConfig {
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,
    pub admin_user_ids: String,
    pub admin_api_key: String,
    #[serde(default = "default_price")]
    pub subscription_price: f64,
    #[serde(default = "default_currency")]
    pub subscription_currency: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_max_connections() -> u32 {
    10
}

fn default_price() -> f64 {
    399.0
}

fn default_currency() -> String {
    "PKR".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl ApiConfig {
    /// A TOML file wins if one exists; otherwise the environment.
    pub fn load() -> Result<Self> {
        for path in CONFIG_PATHS {
            if let Ok(contents) = fs::read_to_string(path) {
                tracing::info!("Loading config from {}", path);
                let config: Self = toml::from_str(&contents).with_context(|| format!("Invalid config file {}", path))?;
                return config.validated();
            }
        }
        tracing::info!("Loading config from environment");
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| get(key).with_context(|| format!("{} must be set", key));
        let config = Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections: parse_or(&get, "DATABASE_MAX_CONNECTIONS", default_max_connections())?,
            admin_user_ids: required("ADMIN_USER_IDS")?,
            admin_api_key: required("ADMIN_API_KEY")?,
            subscription_price: parse_or(&get, "SUBSCRIPTION_PRICE", default_price())?,
            subscription_currency: get("SUBSCRIPTION_CURRENCY").unwrap_or_else(default_currency),
            host: get("HOST").unwrap_or_else(default_host),
            port: parse_or(&get, "PORT", default_port())?,
        };
        config.validated()
    }

    fn validated(self) -> Result<Self> {
        if self.admin_api_key.trim().is_empty() {
            bail!("ADMIN_API_KEY must not be empty");
        }
        if self.admin_user_ids.trim().is_empty() {
            bail!("ADMIN_USER_IDS must not be empty");
        }
        if !self.subscription_price.is_finite() || self.subscription_price < 0.0 {
            bail!("SUBSCRIPTION_PRICE must be a non-negative number");
        }
        Ok(self)
    }

    pub fn pricing(&self) -> Pricing {
        Pricing {
            price: self.subscription_price,
            currency: self.subscription_currency.clone(),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: std::str::FromStr>(get: impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T> {
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} has an invalid value '{}'", key, raw)),
        None => Ok(default),
    }
}

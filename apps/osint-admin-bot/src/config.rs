use anyhow::{Context, Result, bail};
use osint_admin_core::Pricing;
use serde::Deserialize;
use std::fs;
use std::str::FromStr;

const CONFIG_PATHS: &[&str] = &["/etc/osint-admin/bot.toml", "./bot.toml"];

/// Where admin commands are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotBackendKind {
    /// Forward to the admin API over HTTP.
    #[default]
    Api,
    /// Own the database pool and run the service in-process.
    Local,
}

impl FromStr for BotBackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "api" => Ok(Self::Api),
            "local" => Ok(Self::Local),
            other => bail!("BOT_BACKEND must be 'api' or 'local', got '{}'", other),
        }
    }
}

#[derive(Clone, Deserialize)]
pub struct BotConfig {
    pub admin_bot_token: String,
    #[serde(default)]
    pub bot_backend: BotBackendKind,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    pub admin_api_key: Option<String>,
    pub database_url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,
    pub admin_user_ids: Option<String>,
    #[serde(default = "default_price")]
    pub subscription_price: f64,
    #[serde(default = "default_currency")]
    pub subscription_currency: String,
}

fn default_api_base_url() -> String {
    "http://localhost:5000".to_string()
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

impl BotConfig {
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
        let non_empty = |key: &str| get(key).filter(|v| !v.trim().is_empty());
        let config = Self {
            admin_bot_token: non_empty("ADMIN_BOT_TOKEN").context("ADMIN_BOT_TOKEN must be set")?,
            bot_backend: match non_empty("BOT_BACKEND") {
                Some(raw) => raw.parse()?,
                None => BotBackendKind::default(),
            },
            api_base_url: non_empty("API_BASE_URL").unwrap_or_else(default_api_base_url),
            admin_api_key: non_empty("ADMIN_API_KEY"),
            database_url: non_empty("DATABASE_URL"),
            database_max_connections: match non_empty("DATABASE_MAX_CONNECTIONS") {
                Some(raw) => raw.trim().parse().context("DATABASE_MAX_CONNECTIONS must be a number")?,
                None => default_max_connections(),
            },
            admin_user_ids: non_empty("ADMIN_USER_IDS"),
            subscription_price: match non_empty("SUBSCRIPTION_PRICE") {
                Some(raw) => raw.trim().parse().context("SUBSCRIPTION_PRICE must be a number")?,
                None => default_price(),
            },
            subscription_currency: non_empty("SUBSCRIPTION_CURRENCY").unwrap_or_else(default_currency),
        };
        config.validated()
    }

    fn validated(self) -> Result<Self> {
        match self.bot_backend {
            BotBackendKind::Api => {
                if self.admin_api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
                    bail!("ADMIN_API_KEY must be set when BOT_BACKEND=api");
                }
            }
            BotBackendKind::Local => {
                if self.database_url.is_none() {
                    bail!("DATABASE_URL must be set when BOT_BACKEND=local");
                }
                if self.admin_user_ids.is_none() {
                    bail!("ADMIN_USER_IDS must be set when BOT_BACKEND=local");
                }
            }
        }
        Ok(self)
    }

    pub fn pricing(&self) -> Pricing {
        Pricing {
            price: self.subscription_price,
            currency: self.subscription_currency.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn api_backend_is_the_default() {
        let config = BotConfig::from_lookup(lookup(&[("ADMIN_BOT_TOKEN", "123:abc"), ("ADMIN_API_KEY", "k")])).unwrap();
        assert_eq!(config.bot_backend, BotBackendKind::Api);
        assert_eq!(config.api_base_url, "http://localhost:5000");
    }

    #[test]
    fn each_backend_requires_its_settings() {
        assert!(BotConfig::from_lookup(lookup(&[("ADMIN_BOT_TOKEN", "123:abc")])).is_err());
        assert!(
            BotConfig::from_lookup(lookup(&[
                ("ADMIN_BOT_TOKEN", "123:abc"),
                ("BOT_BACKEND", "local"),
                ("DATABASE_URL", "postgres://localhost/osint"),
            ]))
            .is_err()
        );
        let local = BotConfig::from_lookup(lookup(&[
            ("ADMIN_BOT_TOKEN", "123:abc"),
            ("BOT_BACKEND", "LOCAL"),
            ("DATABASE_URL", "postgres://localhost/osint"),
            ("ADMIN_USER_IDS", "5682019164"),
        ]))
        .unwrap();
        assert_eq!(local.bot_backend, BotBackendKind::Local);
        assert_eq!(local.pricing(), Pricing::default());
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!("sqlite".parse::<BotBackendKind>().is_err());
    }
}

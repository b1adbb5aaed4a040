//! Runtime configuration
//!
//! Everything comes from environment variables and is threaded into
//! constructors at startup.

use crate::artifact::{S3ArtifactStore, StorageCredentials};
use crate::backend::{BackendClient, BackendEndpoints, HttpBackend, LocalStats, LoggingBackend};
use crate::conversation::Conversation;
use crate::gateway::Gateway;
use crate::market::{validate_limit, AssetList, Currency};
use crate::token::TokenCodec;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_ASSETS: &str = "BTC,ETH,TON";
pub const DEFAULT_DATA_URL: &str = "http://127.0.0.1:5001";
pub const DEFAULT_ANALYTICS_URL: &str = "http://127.0.0.1:5002";
pub const DEFAULT_PLOT_URL: &str = "http://127.0.0.1:5003";
/// Matches the legacy request TTL
pub const DEFAULT_TIMEOUT_SECS: u64 = 40;
pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_HISTORY_LIMIT: u32 = 10;
pub const DEFAULT_STORAGE_ENDPOINT: &str = "https://s3.cloud.ru";
pub const DEFAULT_STORAGE_REGION: &str = "ru-central-1";

/// `ANALYTICS_SERVICE_URL` value that computes statistics in-process
const LOCAL_ANALYTICS: &str = "local";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid {var}: {message}")]
    Invalid { var: &'static str, message: String },
    #[error("{0} is not set")]
    Missing(&'static str),
}

impl ConfigError {
    fn invalid(var: &'static str, message: impl ToString) -> Self {
        ConfigError::Invalid {
            var,
            message: message.to_string(),
        }
    }
}

/// Object storage holding rendered charts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSettings {
    pub endpoint: String,
    pub region: String,
    pub bucket: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub assets: AssetList,
    pub endpoints: BackendEndpoints,
    /// Compute statistics in-process instead of calling the analytics service
    pub local_analytics: bool,
    pub timeout: Duration,
    pub currency: Currency,
    pub history_limit: u32,
    pub port: Option<u16>,
    pub storage: StorageSettings,
    pub cryptocompare_api_key: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let assets = AssetList::new(
            or("COINSTAT_ASSETS", DEFAULT_ASSETS)
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty()),
        )
        .map_err(|e| ConfigError::invalid("COINSTAT_ASSETS", e))?;

        let analytics = or("ANALYTICS_SERVICE_URL", DEFAULT_ANALYTICS_URL);
        let local_analytics = analytics.eq_ignore_ascii_case(LOCAL_ANALYTICS);

        let timeout_secs: u64 = match get("COINSTAT_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::invalid("COINSTAT_TIMEOUT_SECS", format!("{raw:?}")))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let currency: Currency = or("COINSTAT_CURRENCY", DEFAULT_CURRENCY)
            .parse()
            .map_err(|e| ConfigError::invalid("COINSTAT_CURRENCY", e))?;

        let history_limit = match get("COINSTAT_HISTORY_LIMIT") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|e| ConfigError::invalid("COINSTAT_HISTORY_LIMIT", e))
                .and_then(|n| {
                    validate_limit(n).map_err(|e| ConfigError::invalid("COINSTAT_HISTORY_LIMIT", e))
                })?,
            None => DEFAULT_HISTORY_LIMIT,
        };

        let port = get("COINSTAT_PORT")
            .map(|raw| {
                raw.trim()
                    .parse::<u16>()
                    .map_err(|e| ConfigError::invalid("COINSTAT_PORT", e))
            })
            .transpose()?;

        Ok(Self {
            assets,
            endpoints: BackendEndpoints {
                data: or("DATA_SERVICE_URL", DEFAULT_DATA_URL),
                analytics,
                plot: or("PLOT_SERVICE_URL", DEFAULT_PLOT_URL),
            },
            local_analytics,
            timeout: Duration::from_secs(timeout_secs),
            currency,
            history_limit,
            port,
            storage: StorageSettings {
                endpoint: or("STORAGE_ENDPOINT", DEFAULT_STORAGE_ENDPOINT),
                region: or("STORAGE_REGION", DEFAULT_STORAGE_REGION),
                bucket: get("STORAGE_BUCKET"),
                access_key_id: get("STORAGE_ACCESS_KEY_ID"),
                secret_access_key: get("STORAGE_SECRET_ACCESS_KEY"),
            },
            cryptocompare_api_key: get("CRYPTOCOMPARE_API_KEY"),
        })
    }

    pub fn port_or(&self, default: u16) -> u16 {
        self.port.unwrap_or(default)
    }

    /// HTTP backend with call logging; statistics run in-process when
    /// `local_analytics` is set.
    pub fn backend(&self) -> Arc<dyn BackendClient> {
        let http = HttpBackend::new(self.endpoints.clone(), self.timeout);
        let inner: Arc<dyn BackendClient> = if self.local_analytics {
            Arc::new(LocalStats::new(http))
        } else {
            Arc::new(http)
        };
        Arc::new(LoggingBackend::new(inner))
    }

    /// Signed S3 client; bucket and both halves of the key pair are required
    pub fn artifact_store(&self) -> Result<S3ArtifactStore, ConfigError> {
        let storage = &self.storage;
        let bucket = storage
            .bucket
            .clone()
            .ok_or(ConfigError::Missing("STORAGE_BUCKET"))?;
        let credentials = StorageCredentials {
            access_key_id: storage
                .access_key_id
                .clone()
                .ok_or(ConfigError::Missing("STORAGE_ACCESS_KEY_ID"))?,
            secret_access_key: storage
                .secret_access_key
                .clone()
                .ok_or(ConfigError::Missing("STORAGE_SECRET_ACCESS_KEY"))?,
        };
        Ok(S3ArtifactStore::new(
            &storage.endpoint,
            &storage.region,
            bucket,
            credentials,
            self.timeout,
        ))
    }

    /// Conversation driver wired to the configured services and storage
    pub fn conversation(
        &self,
    ) -> Result<Conversation<Arc<dyn BackendClient>, S3ArtifactStore>, ConfigError> {
        Conversation::new(
            Gateway::new(self.backend()),
            self.artifact_store()?,
            TokenCodec::new(self.assets.clone()),
            self.currency.clone(),
            self.history_limit,
        )
        .map_err(|e| ConfigError::invalid("COINSTAT_HISTORY_LIMIT", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let s = settings(&[]).unwrap();
        let names: Vec<_> = s.assets.iter().map(ToString::to_string).collect();
        assert_eq!(names, vec!["BTC", "ETH", "TON"]);
        assert_eq!(s.endpoints.data, DEFAULT_DATA_URL);
        assert_eq!(s.endpoints.analytics, DEFAULT_ANALYTICS_URL);
        assert_eq!(s.endpoints.plot, DEFAULT_PLOT_URL);
        assert_eq!(s.timeout, Duration::from_secs(40));
        assert_eq!(s.currency.as_str(), "USD");
        assert_eq!(s.history_limit, 10);
        assert_eq!(s.port_or(5000), 5000);
        assert!(!s.local_analytics);
        assert_eq!(s.storage.endpoint, DEFAULT_STORAGE_ENDPOINT);
        assert_eq!(s.storage.region, DEFAULT_STORAGE_REGION);
        assert_eq!(s.storage.bucket, None);
        assert_eq!(s.storage.access_key_id, None);
        assert_eq!(s.cryptocompare_api_key, None);
    }

    #[test]
    fn overrides() {
        let s = settings(&[
            ("COINSTAT_ASSETS", " sol , btc "),
            ("ANALYTICS_SERVICE_URL", "local"),
            ("COINSTAT_TIMEOUT_SECS", "5"),
            ("COINSTAT_CURRENCY", "eur"),
            ("COINSTAT_HISTORY_LIMIT", "30"),
            ("COINSTAT_PORT", "8080"),
            ("STORAGE_BUCKET", "charts"),
            ("STORAGE_REGION", "eu-west-1"),
            ("STORAGE_ACCESS_KEY_ID", "key"),
            ("CRYPTOCOMPARE_API_KEY", ""),
        ])
        .unwrap();
        let names: Vec<_> = s.assets.iter().map(ToString::to_string).collect();
        assert_eq!(names, vec!["SOL", "BTC"]);
        assert!(s.local_analytics);
        assert_eq!(s.timeout, Duration::from_secs(5));
        assert_eq!(s.currency.as_str(), "EUR");
        assert_eq!(s.history_limit, 30);
        assert_eq!(s.port_or(5000), 8080);
        assert_eq!(s.storage.bucket.as_deref(), Some("charts"));
        assert_eq!(s.storage.region, "eu-west-1");
        assert_eq!(s.storage.access_key_id.as_deref(), Some("key"));
        assert_eq!(s.storage.secret_access_key, None);
        assert_eq!(s.cryptocompare_api_key, None);
    }

    #[test]
    fn invalid_values() {
        let cases = [
            ("COINSTAT_TIMEOUT_SECS", "soon"),
            ("COINSTAT_TIMEOUT_SECS", "0"),
            ("COINSTAT_ASSETS", ","),
            ("COINSTAT_ASSETS", "BTC_USD"),
            ("COINSTAT_HISTORY_LIMIT", "0"),
            ("COINSTAT_HISTORY_LIMIT", "5000"),
            ("COINSTAT_CURRENCY", "$"),
            ("COINSTAT_PORT", "99999"),
        ];
        for (var, value) in cases {
            match settings(&[(var, value)]) {
                Err(ConfigError::Invalid { var: got, .. }) => assert_eq!(got, var, "{value}"),
                other => panic!("{var}={value} gave {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn conversation_needs_bucket_and_credentials() {
        let s = settings(&[]).unwrap();
        assert!(matches!(
            s.conversation(),
            Err(ConfigError::Missing("STORAGE_BUCKET"))
        ));

        let s = settings(&[("STORAGE_BUCKET", "charts")]).unwrap();
        assert!(matches!(
            s.artifact_store(),
            Err(ConfigError::Missing("STORAGE_ACCESS_KEY_ID"))
        ));

        let s = settings(&[("STORAGE_BUCKET", "charts"), ("STORAGE_ACCESS_KEY_ID", "key")])
            .unwrap();
        assert!(matches!(
            s.artifact_store(),
            Err(ConfigError::Missing("STORAGE_SECRET_ACCESS_KEY"))
        ));

        let s = settings(&[
            ("STORAGE_BUCKET", "charts"),
            ("STORAGE_ACCESS_KEY_ID", "key"),
            ("STORAGE_SECRET_ACCESS_KEY", "secret"),
        ])
        .unwrap();
        let reply = s.conversation().unwrap().start();
        assert_eq!(reply.keyboard.buttons().count(), 3);
    }
}

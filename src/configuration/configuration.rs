use anyhow::{Context, Result};
use std::net::SocketAddr;

pub const WEBHOOK_URL_VAR: &str = "DISCORD_WEBHOOK_URL";
pub const LISTEN_ADDRESS_VAR: &str = "LISTEN_ADDRESS";
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";
pub const OTLP_ENDPOINT_VAR: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";

pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:8000";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Process settings, read once at startup and handed to the router
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub webhook_url: Option<String>,
    pub listen_address: SocketAddr,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup, empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let listen_address = get(LISTEN_ADDRESS_VAR)
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDRESS.to_string())
            .parse()
            .with_context(|| format!("Failed to parse {}", LISTEN_ADDRESS_VAR))?;

        Ok(Settings {
            webhook_url: get(WEBHOOK_URL_VAR),
            listen_address,
            log_level: get(LOG_LEVEL_VAR).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            otlp_endpoint: get(OTLP_ENDPOINT_VAR),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: BTreeMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();

        assert_eq!(settings.webhook_url, None);
        assert_eq!(settings.listen_address, "0.0.0.0:8000".parse().unwrap());
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.otlp_endpoint, None);
    }

    #[test]
    fn test_all_values() {
        let settings = Settings::from_lookup(lookup(&[
            (WEBHOOK_URL_VAR, "https://discord.com/api/webhooks/1/abc"),
            (LISTEN_ADDRESS_VAR, "127.0.0.1:3000"),
            (LOG_LEVEL_VAR, "debug"),
            (OTLP_ENDPOINT_VAR, "http://collector:4317"),
        ]))
        .unwrap();

        assert_eq!(
            settings.webhook_url.as_deref(),
            Some("https://discord.com/api/webhooks/1/abc")
        );
        assert_eq!(settings.listen_address, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.otlp_endpoint.as_deref(), Some("http://collector:4317"));
    }

    #[test]
    fn test_empty_webhook_is_unset() {
        let settings = Settings::from_lookup(lookup(&[(WEBHOOK_URL_VAR, "  ")])).unwrap();

        assert_eq!(settings.webhook_url, None);
    }

    #[test]
    fn test_invalid_listen_address() {
        let result = Settings::from_lookup(lookup(&[(LISTEN_ADDRESS_VAR, "not-an-address")]));

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains(LISTEN_ADDRESS_VAR));
    }
}

//! Extension configuration
//!
//! Environment variables:
//! - STEADYBIT_EXTENSION_ACCESS_TOKEN: Splunk bearer token (required)
//! - STEADYBIT_EXTENSION_API_BASE_URL: Splunk REST API base URL (required)
//! - STEADYBIT_EXTENSION_INSECURE_SKIP_VERIFY: skip TLS verification (default: false)
//! - STEADYBIT_EXTENSION_DISCOVERY_ATTRIBUTES_EXCLUDES_ALERT: comma-separated attribute keys
//! - STEADYBIT_EXTENSION_HOST: bind address (default: 0.0.0.0)
//! - STEADYBIT_EXTENSION_PORT: port (default: 8083)
//! - STEADYBIT_EXTENSION_REQUEST_TIMEOUT_SECS: per-request timeout (default: 30)

use std::time::Duration;

use crate::splunk::ClientConfig;

const PREFIX: &str = "STEADYBIT_EXTENSION_";

/// Settings fixed at startup
#[derive(Debug, Clone)]
pub struct ExtensionConfig {
    pub access_token: String,
    pub api_base_url: String,
    pub insecure_skip_verify: bool,
    pub discovery_attributes_excludes_alert: Vec<String>,
    pub host: String,
    pub port: u16,
    pub request_timeout: Duration,
}

impl ExtensionConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; keys are given without the prefix
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(&format!("{}{}", PREFIX, name))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |name: &str| get(name).ok_or_else(|| ConfigError::Missing(var(name)));

        let access_token = required("ACCESS_TOKEN")?;
        let api_base_url = required("API_BASE_URL")?;

        let insecure_skip_verify = match get("INSECURE_SKIP_VERIFY").as_deref() {
            None | Some("false") | Some("0") => false,
            Some("true") | Some("1") => true,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: var("INSECURE_SKIP_VERIFY"),
                    value: other.to_string(),
                })
            }
        };

        let discovery_attributes_excludes_alert = get("DISCOVERY_ATTRIBUTES_EXCLUDES_ALERT")
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or("PORT", get("PORT"), 8083)?;
        let request_timeout =
            Duration::from_secs(parse_or("REQUEST_TIMEOUT_SECS", get("REQUEST_TIMEOUT_SECS"), 30)?);

        Ok(Self {
            access_token,
            api_base_url,
            insecure_skip_verify,
            discovery_attributes_excludes_alert,
            host,
            port,
            request_timeout,
        })
    }

    /// Splunk client settings derived from this configuration
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.api_base_url, &self.access_token)
            .with_insecure_skip_verify(self.insecure_skip_verify)
            .with_timeout(self.request_timeout)
    }
}

fn var(name: &str) -> String {
    format!("{}{}", PREFIX, name)
}

fn parse_or<T: std::str::FromStr>(
    name: &str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v.parse().map_err(|_| ConfigError::Invalid {
            name: var(name),
            value: v,
        }),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(String),

    #[error("Invalid value '{value}' for {name}")]
    Invalid { name: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ExtensionConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (format!("{}{}", PREFIX, k), v.to_string()))
            .collect();
        ExtensionConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[
            ("ACCESS_TOKEN", "token"),
            ("API_BASE_URL", "https://splunk:8089"),
        ])
        .unwrap();

        assert_eq!(config.access_token, "token");
        assert_eq!(config.api_base_url, "https://splunk:8089");
        assert!(!config.insecure_skip_verify);
        assert!(config.discovery_attributes_excludes_alert.is_empty());
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8083);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_all_values() {
        let config = load(&[
            ("ACCESS_TOKEN", "token"),
            ("API_BASE_URL", "https://splunk:8089/"),
            ("INSECURE_SKIP_VERIFY", "true"),
            (
                "DISCOVERY_ATTRIBUTES_EXCLUDES_ALERT",
                "splunk.alert.author, splunk.alert.url,",
            ),
            ("PORT", "9000"),
            ("REQUEST_TIMEOUT_SECS", "5"),
        ])
        .unwrap();

        assert!(config.insecure_skip_verify);
        assert_eq!(
            config.discovery_attributes_excludes_alert,
            vec!["splunk.alert.author", "splunk.alert.url"]
        );
        assert_eq!(config.port, 9000);

        let client = config.client_config();
        assert!(client.insecure_skip_verify);
        assert_eq!(client.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_missing_token() {
        let err = load(&[("API_BASE_URL", "https://splunk:8089")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Missing(ref name) if name == "STEADYBIT_EXTENSION_ACCESS_TOKEN"
        ));
    }

    #[test]
    fn test_invalid_values() {
        let err = load(&[
            ("ACCESS_TOKEN", "token"),
            ("API_BASE_URL", "https://splunk:8089"),
            ("PORT", "eighty"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));

        let err = load(&[
            ("ACCESS_TOKEN", "token"),
            ("API_BASE_URL", "https://splunk:8089"),
            ("INSECURE_SKIP_VERIFY", "maybe"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }
}

//! Client configuration

use url::Url;

use crate::auth::AuthMethod;
use crate::error::{RestClientError, RestClientResult};

/// API version used when none is configured
pub const DEFAULT_API_VERSION: &str = "v2";

pub const DEFAULT_USER_AGENT: &str = concat!("awx-rest-client/", env!("CARGO_PKG_VERSION"));

/// Environment variables read by [`ClientConfig::from_env`]
pub const ENV_URL: &str = "AWX_URL";
pub const ENV_USERNAME: &str = "AWX_USERNAME";
pub const ENV_PASSWORD: &str = "AWX_PASSWORD";
pub const ENV_TOKEN: &str = "AWX_TOKEN";
pub const ENV_VERIFY_TLS: &str = "AWX_VERIFY_TLS";

/// Connection settings for an AWX instance
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub api_version: String,
    pub auth: AuthMethod,
    /// Disabling verification exposes the client to MITM attacks
    pub verify_tls: bool,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: Url, auth: AuthMethod) -> Self {
        Self {
            base_url,
            api_version: DEFAULT_API_VERSION.to_string(),
            auth,
            verify_tls: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Create a config from a base URL string
    pub fn from_url(base_url: &str, auth: AuthMethod) -> RestClientResult<Self> {
        let base_url = Url::parse(base_url)?;
        match base_url.scheme() {
            "http" | "https" => Ok(Self::new(base_url, auth)),
            other => Err(RestClientError::Config(format!(
                "unsupported URL scheme '{other}', expected http or https"
            ))),
        }
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_verify_tls(mut self, verify_tls: bool) -> Self {
        self.verify_tls = verify_tls;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build a config from `AWX_*` environment variables
    pub fn from_env() -> RestClientResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup using the `AWX_*` variable names
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> RestClientResult<Self> {
        let url = lookup(ENV_URL)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| RestClientError::Config(format!("{ENV_URL} is not set")))?;

        let username = lookup(ENV_USERNAME);
        let password = lookup(ENV_PASSWORD);
        let token = lookup(ENV_TOKEN);
        let auth = AuthMethod::from_credentials(
            username.as_deref(),
            password.as_deref(),
            token.as_deref(),
        )?;

        let mut config = Self::from_url(&url, auth)?;
        if let Some(raw) = lookup(ENV_VERIFY_TLS) {
            match parse_bool(&raw) {
                Some(verify) => config.verify_tls = verify,
                None => {
                    return Err(RestClientError::Config(format!(
                        "{ENV_VERIFY_TLS} must be a boolean, got '{raw}'"
                    )))
                }
            }
        }
        Ok(config)
    }
}

/// Parse a boolean setting such as `AWX_VERIFY_TLS`
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_from_url_defaults() {
        let config = ClientConfig::from_url("https://awx.example.com", AuthMethod::bearer("t")).unwrap();

        assert_eq!(config.api_version, "v2");
        assert!(config.verify_tls);
        assert!(config.user_agent.starts_with("awx-rest-client/"));
    }

    #[test]
    fn test_from_url_rejects_other_schemes() {
        let err = ClientConfig::from_url("ftp://awx.example.com", AuthMethod::bearer("t")).unwrap_err();
        assert!(matches!(err, RestClientError::Config(_)));
    }

    #[test]
    fn test_from_lookup_token() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("AWX_URL", "https://awx.example.com"),
            ("AWX_TOKEN", "secret"),
            ("AWX_VERIFY_TLS", "no"),
        ]))
        .unwrap();

        assert_eq!(config.auth.scheme(), "Bearer");
        assert!(!config.verify_tls);
    }

    #[test]
    fn test_from_lookup_basic() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("AWX_URL", "https://awx.example.com"),
            ("AWX_USERNAME", "admin"),
            ("AWX_PASSWORD", "password"),
        ]))
        .unwrap();

        assert_eq!(config.auth.scheme(), "Basic");
        assert!(config.verify_tls);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool(" False "), Some(false));
        assert_eq!(parse_bool("ON"), Some(true));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_from_lookup_errors() {
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[("AWX_TOKEN", "secret")])),
            Err(RestClientError::Config(_))
        ));
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[("AWX_URL", "https://awx.example.com")])),
            Err(RestClientError::Auth(_))
        ));
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[
                ("AWX_URL", "https://awx.example.com"),
                ("AWX_TOKEN", "secret"),
                ("AWX_VERIFY_TLS", "maybe"),
            ])),
            Err(RestClientError::Config(_))
        ));
    }
}

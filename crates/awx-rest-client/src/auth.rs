//! Authentication methods for the REST API client

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use secrecy::{ExposeSecret, SecretString};

use crate::error::{RestClientError, RestClientResult};

/// Authentication methods supported by the API
///
/// Exactly one method is used per client; the two are never combined.
#[derive(Debug, Clone)]
pub enum AuthMethod {
    /// HTTP Basic authentication (`Authorization: Basic <base64(user:pass)>`)
    ///
    /// Credentials travel in every request; use HTTPS.
    Basic {
        username: String,
        password: SecretString,
    },
    /// OAuth2 bearer token (`Authorization: Bearer <token>`)
    Bearer(SecretString),
}

impl AuthMethod {
    /// Create Basic authentication from a username and password
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Create bearer authentication from an OAuth2 token
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer(SecretString::from(token.into()))
    }

    /// Pick the authentication method from optional credentials
    ///
    /// A token selects bearer auth, a username and password pair selects
    /// Basic auth. Supplying both, or neither, is an error. Empty strings
    /// count as absent.
    pub fn from_credentials(
        username: Option<&str>,
        password: Option<&str>,
        token: Option<&str>,
    ) -> RestClientResult<Self> {
        fn present(v: Option<&str>) -> Option<&str> {
            v.filter(|s| !s.is_empty())
        }

        match (present(username), present(password), present(token)) {
            (None, None, Some(token)) => Ok(Self::bearer(token)),
            (_, _, Some(_)) => Err(RestClientError::Auth(
                "Cannot use both a token and username/password".to_string(),
            )),
            (Some(username), Some(password), None) => Ok(Self::basic(username, password)),
            _ => Err(RestClientError::Auth(
                "Either token or both username and password must be provided".to_string(),
            )),
        }
    }

    /// Scheme name as it appears in the `Authorization` header
    pub fn scheme(&self) -> &'static str {
        match self {
            AuthMethod::Basic { .. } => "Basic",
            AuthMethod::Bearer(_) => "Bearer",
        }
    }

    /// Build the `Authorization` header value
    pub fn authorization_value(&self) -> RestClientResult<HeaderValue> {
        let value = match self {
            AuthMethod::Basic { username, password } => {
                let credentials = format!("{}:{}", username, password.expose_secret());
                format!("Basic {}", STANDARD.encode(credentials))
            }
            AuthMethod::Bearer(token) => format!("Bearer {}", token.expose_secret()),
        };

        let mut header = HeaderValue::from_str(&value)
            .map_err(|e| RestClientError::Auth(format!("invalid credentials: {e}")))?;
        header.set_sensitive(true);
        Ok(header)
    }

    /// Apply authentication headers to a request
    pub fn apply_to_headers(&self, headers: &mut HeaderMap) -> RestClientResult<()> {
        headers.insert(AUTHORIZATION, self.authorization_value()?);
        Ok(())
    }

    /// Get headers for this authentication method
    pub fn headers(&self) -> RestClientResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        self.apply_to_headers(&mut headers)?;
        Ok(headers)
    }
}

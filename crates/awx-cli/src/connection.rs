//! Connection flags shared by every command

use anyhow::{Context, Result};
use awx_rest_client::{
    parse_bool, AuthMethod, AwxClient, ClientConfig, ENV_PASSWORD, ENV_TOKEN, ENV_URL,
    ENV_USERNAME, ENV_VERIFY_TLS,
};
use clap::Args;

/// Arguments selecting the AWX server and credentials
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Base URL of the AWX server
    #[arg(long, env = ENV_URL, global = true)]
    pub url: Option<String>,

    /// Username for Basic authentication
    #[arg(long, env = ENV_USERNAME, global = true)]
    pub username: Option<String>,

    /// Password for Basic authentication
    #[arg(long, env = ENV_PASSWORD, global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// OAuth2 token for bearer authentication
    #[arg(long, env = ENV_TOKEN, global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Verify the server's TLS certificate
    #[arg(long, env = ENV_VERIFY_TLS, global = true, value_name = "BOOL", value_parser = verify_tls_value)]
    pub verify_tls: Option<bool>,

    /// Skip TLS certificate verification (same as --verify-tls false)
    #[arg(long, global = true)]
    pub insecure: bool,
}

fn verify_tls_value(value: &str) -> Result<bool, String> {
    parse_bool(value).ok_or_else(|| format!("expected a boolean, got '{value}'"))
}

impl ConnectionArgs {
    /// Build a client configuration from the flags
    pub fn config(&self) -> Result<ClientConfig> {
        let url = self
            .url
            .as_deref()
            .context("--url (or AWX_URL) is required")?;

        let auth = AuthMethod::from_credentials(
            self.username.as_deref(),
            self.password.as_deref(),
            self.token.as_deref(),
        )?;

        Ok(ClientConfig::from_url(url, auth)?.with_verify_tls(self.verify_tls_enabled()))
    }

    /// Whether TLS certificates are verified; `--insecure` always wins
    pub fn verify_tls_enabled(&self) -> bool {
        !self.insecure && self.verify_tls.unwrap_or(true)
    }

    pub fn client(&self) -> Result<AwxClient> {
        Ok(AwxClient::new(self.config()?)?)
    }
}

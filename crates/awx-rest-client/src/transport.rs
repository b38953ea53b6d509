//! HTTP transport for the AWX REST API

use reqwest::{Client as HttpClient, Method, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::auth::AuthMethod;
use crate::config::ClientConfig;
use crate::error::{Operation, RestClientError, RestClientResult};

/// Low-level REST client issuing authenticated JSON requests
///
/// URLs have the shape `<base>/api/<version>/<resource>/[<id>/]`. The
/// underlying connection pool is shared between clones.
#[derive(Debug, Clone)]
pub struct RestClient {
    http_client: HttpClient,
    base_url: String,
    api_version: String,
    auth: AuthMethod,
}

impl RestClient {
    /// Create a new REST client
    pub fn new(config: ClientConfig) -> RestClientResult<Self> {
        if !config.verify_tls {
            warn!("TLS certificate verification is disabled for {}", config.base_url);
        }

        let http_client = HttpClient::builder()
            .user_agent(config.user_agent.as_str())
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            api_version: config.api_version,
            auth: config.auth,
        })
    }

    /// Get the base URL, without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Get the authentication method
    pub fn auth(&self) -> &AuthMethod {
        &self.auth
    }

    /// Build the URL of a collection, or of one object when an id is given
    pub fn build_url(&self, resource: &str, resource_id: Option<&str>) -> RestClientResult<Url> {
        let mut url = format!("{}/api/{}/{}/", self.base_url, self.api_version, resource);
        if let Some(id) = resource_id.filter(|id| !id.is_empty()) {
            url.push_str(id);
            url.push('/');
        }
        Ok(Url::parse(&url)?)
    }

    /// Retrieve a collection or a single object
    pub async fn get<T: DeserializeOwned>(
        &self,
        resource: &str,
        resource_id: Option<&str>,
    ) -> RestClientResult<T> {
        let url = self.build_url(resource, resource_id)?;
        self.request(Operation::Retrieve, Method::GET, url, None::<&()>).await
    }

    /// Retrieve a collection filtered by query parameters
    pub async fn get_query<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &[(&str, &str)],
    ) -> RestClientResult<T> {
        let mut url = self.build_url(resource, None)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        self.request(Operation::Retrieve, Method::GET, url, None::<&()>).await
    }

    /// Create an object in a collection
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        resource: &str,
        body: &B,
    ) -> RestClientResult<T> {
        let url = self.build_url(resource, None)?;
        self.request(Operation::Create, Method::POST, url, Some(body)).await
    }

    /// Partially update an object
    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        resource: &str,
        resource_id: &str,
        body: &B,
    ) -> RestClientResult<T> {
        let url = self.build_url(resource, Some(resource_id))?;
        self.request(Operation::Update, Method::PATCH, url, Some(body)).await
    }

    /// Delete an object; any response body is discarded
    pub async fn delete(&self, resource: &str, resource_id: &str) -> RestClientResult<()> {
        let url = self.build_url(resource, Some(resource_id))?;
        let _: Value = self.request(Operation::Delete, Method::DELETE, url, None::<&()>).await?;
        Ok(())
    }

    /// Check whether the configured credentials are accepted
    ///
    /// Calls `/api/<version>/me/`, which requires authentication. Status
    /// errors yield `Ok(false)`; transport failures are returned as errors.
    pub async fn is_authenticated(&self) -> RestClientResult<bool> {
        match self.get::<Value>("me", None).await {
            Ok(_) => Ok(true),
            Err(RestClientError::Status { status, .. }) => {
                debug!("Credentials rejected with status {}", status);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Send one authenticated request and decode the JSON response
    pub async fn request<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        operation: Operation,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> RestClientResult<T> {
        debug!("{} {} ({} auth)", method, url, self.auth.scheme());

        let mut request = self
            .http_client
            .request(method, url)
            .headers(self.auth.headers()?);

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        self.handle_response(operation, response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        operation: Operation,
        response: Response,
    ) -> RestClientResult<T> {
        let status = response.status();
        let url = response.url().clone();
        let text = response.text().await?;

        if status.is_success() {
            // Empty bodies (204 No Content) decode as JSON null
            let body = if text.trim().is_empty() { "null" } else { text.as_str() };
            return serde_json::from_str(body).map_err(RestClientError::from);
        }

        let detail = serde_json::from_str::<Value>(&text).ok().and_then(|value| {
            value
                .get("detail")
                .and_then(Value::as_str)
                .map(str::to_string)
        });
        warn!("Failed to {} resource at {}: {}", operation, url, status);

        Err(RestClientError::Status {
            operation,
            status,
            body: text,
            detail,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> RestClient {
        let config = ClientConfig::from_url(base_url, AuthMethod::bearer("token"))
            .unwrap()
            .with_api_version("v1");
        RestClient::new(config).unwrap()
    }

    #[test]
    fn test_build_url_without_resource_id() {
        let url = client("https://api.example.com").build_url("resource", None).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/api/v1/resource/");
    }

    #[test]
    fn test_build_url_with_resource_id() {
        let url = client("https://api.example.com/").build_url("resource", Some("123")).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/api/v1/resource/123/");
    }

    #[test]
    fn test_build_url_keeps_path_prefix() {
        let url = client("https://example.com/awx/").build_url("job_templates", None).unwrap();
        assert_eq!(url.as_str(), "https://example.com/awx/api/v1/job_templates/");
    }
}

//! Main AWX client

use url::Url;

use crate::auth::AuthMethod;
use crate::config::ClientConfig;
use crate::error::RestClientResult;
use crate::resources::{JobTemplateResource, WorkflowJobTemplateResource};
use crate::transport::RestClient;

/// Entry point to the AWX API
///
/// Holds the base URL and credentials and hands out one accessor per
/// resource type.
///
/// ```no_run
/// # async fn run() -> awx_rest_client::RestClientResult<()> {
/// use awx_rest_client::AwxClient;
///
/// let client = AwxClient::connect("https://awx.example.com", None, None, Some("token"), true)?;
/// let template = client.job_template().fetch("Backup Job").await?;
/// println!("{}", template.id);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AwxClient {
    transport: RestClient,
    job_template: JobTemplateResource,
    workflow_job_template: WorkflowJobTemplateResource,
}

impl AwxClient {
    /// Create a client from a full configuration
    pub fn new(config: ClientConfig) -> RestClientResult<Self> {
        let transport = RestClient::new(config)?;
        Ok(Self {
            job_template: JobTemplateResource::new(transport.clone()),
            workflow_job_template: WorkflowJobTemplateResource::new(transport.clone()),
            transport,
        })
    }

    /// Create a client from a URL and either a token or a username/password pair
    pub fn connect(
        url: &str,
        username: Option<&str>,
        password: Option<&str>,
        token: Option<&str>,
        verify_tls: bool,
    ) -> RestClientResult<Self> {
        let auth = AuthMethod::from_credentials(username, password, token)?;
        let config = ClientConfig::from_url(url, auth)?.with_verify_tls(verify_tls);
        Self::new(config)
    }

    /// Create a client from `AWX_*` environment variables
    pub fn from_env() -> RestClientResult<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Job templates
    pub fn job_template(&self) -> &JobTemplateResource {
        &self.job_template
    }

    /// Workflow job templates
    pub fn workflow_job_template(&self) -> &WorkflowJobTemplateResource {
        &self.workflow_job_template
    }

    /// The underlying transport, for endpoints without a typed accessor
    pub fn transport(&self) -> &RestClient {
        &self.transport
    }

    pub fn base_url(&self) -> RestClientResult<Url> {
        Ok(Url::parse(self.transport.base_url())?)
    }

    /// Whether the configured credentials are accepted by the server
    pub async fn is_authenticated(&self) -> RestClientResult<bool> {
        self.transport.is_authenticated().await
    }
}

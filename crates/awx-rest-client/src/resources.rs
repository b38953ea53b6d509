//! Typed accessors for AWX resource collections

use std::marker::PhantomData;

use awx_rest_api_contract::{
    validate_model, ApiModel, JobTemplate, ListResponse, ResourceId, ResourceRecord, ResourceRef,
    WorkflowJobTemplate,
};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{RestClientError, RestClientResult};
use crate::transport::RestClient;

/// Accessor for job templates (`/api/v2/job_templates/`)
pub type JobTemplateResource = ResourceAdapter<JobTemplate>;

/// Accessor for workflow job templates (`/api/v2/workflow_job_templates/`)
pub type WorkflowJobTemplateResource = ResourceAdapter<WorkflowJobTemplate>;

/// Fetch, create, update and delete objects of one collection by name
///
/// Models are validated before anything is sent, so an invalid model never
/// reaches the network. Named references inside a model are resolved to
/// ids with one lookup per name.
#[derive(Debug, Clone)]
pub struct ResourceAdapter<M> {
    transport: RestClient,
    _model: PhantomData<fn() -> M>,
}

impl<M: ApiModel> ResourceAdapter<M> {
    pub fn new(transport: RestClient) -> Self {
        Self {
            transport,
            _model: PhantomData,
        }
    }

    /// Collection path segment of this resource
    pub fn endpoint(&self) -> &'static str {
        M::ENDPOINT
    }

    /// List the first page of the collection
    pub async fn list(&self) -> RestClientResult<Vec<ResourceRecord>> {
        let page: ListResponse = self.transport.get(M::ENDPOINT, None).await?;
        Ok(page.results)
    }

    /// Fetch an object by name
    pub async fn fetch(&self, name: &str) -> RestClientResult<ResourceRecord> {
        find_by_name(&self.transport, M::ENDPOINT, name).await
    }

    /// Fetch an object by name and decode it into the model
    pub async fn fetch_model(&self, name: &str) -> RestClientResult<M> {
        Ok(self.fetch(name).await?.into_model()?)
    }

    /// Fetch an object by primary key
    pub async fn fetch_by_id(&self, id: ResourceId) -> RestClientResult<ResourceRecord> {
        self.transport.get(M::ENDPOINT, Some(&id.to_string())).await
    }

    /// Resolve an object's id from its name
    pub async fn id_by_name(&self, name: &str) -> RestClientResult<ResourceId> {
        Ok(self.fetch(name).await?.id)
    }

    /// Whether an object with this name exists
    pub async fn exists(&self, name: &str) -> RestClientResult<bool> {
        match self.fetch(name).await {
            Ok(_) => Ok(true),
            Err(RestClientError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Create a new object from a model
    pub async fn create(&self, model: &M) -> RestClientResult<ResourceRecord> {
        validate_model(model)?;
        let payload = self.resolve_references(model).await?;

        let record: ResourceRecord = self.transport.post(M::ENDPOINT, &payload).await?;
        info!("Created {} '{}' with id {}", M::ENDPOINT, record.name, record.id);
        Ok(record)
    }

    /// Update the object called `name` with the model's fields
    pub async fn update(&self, name: &str, model: &M) -> RestClientResult<ResourceRecord> {
        validate_model(model)?;
        let id = self.id_by_name(name).await?;
        let payload = self.resolve_references(model).await?;

        let record: ResourceRecord = self
            .transport
            .patch(M::ENDPOINT, &id.to_string(), &payload)
            .await?;
        info!("Updated {} '{}' (id {})", M::ENDPOINT, name, id);
        Ok(record)
    }

    /// Delete the object called `name`
    pub async fn delete(&self, name: &str) -> RestClientResult<()> {
        let id = self.id_by_name(name).await?;
        self.transport.delete(M::ENDPOINT, &id.to_string()).await?;
        info!("Deleted {} '{}' (id {})", M::ENDPOINT, name, id);
        Ok(())
    }

    /// Serialize the model, replacing referenced names with ids
    async fn resolve_references(&self, model: &M) -> RestClientResult<Value> {
        let mut payload = serde_json::to_value(model)?;

        for reference in model.references() {
            let ResourceRef::Name(name) = reference.target else {
                continue;
            };
            let id = find_by_name(&self.transport, reference.endpoint, name).await?.id;
            debug!("Resolved {} '{}' to id {}", reference.field, name, id);

            match payload.as_object_mut() {
                Some(fields) => {
                    fields.insert(reference.field.to_string(), Value::from(id));
                }
                None => {
                    return Err(RestClientError::UnexpectedResponse(format!(
                        "{} did not serialize to a JSON object",
                        M::ENDPOINT
                    )))
                }
            }
        }

        Ok(payload)
    }
}

/// Find the object with exactly this name in a collection
///
/// Uses the API's `?name=` filter, so one request is issued regardless of
/// the collection size.
async fn find_by_name(
    transport: &RestClient,
    endpoint: &str,
    name: &str,
) -> RestClientResult<ResourceRecord> {
    let page: ListResponse = transport.get_query(endpoint, &[("name", name)]).await?;

    page.results
        .into_iter()
        .find(|record| record.name == name)
        .ok_or_else(|| RestClientError::NotFound {
            resource: endpoint.to_string(),
            name: name.to_string(),
        })
}

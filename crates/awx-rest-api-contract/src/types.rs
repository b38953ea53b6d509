//! API contract types for the AWX REST service

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::error::ApiContractError;
use crate::wire;

/// Numeric primary key of an AWX object
pub type ResourceId = u64;

/// Job execution type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    /// Normal execution
    #[default]
    Run,
    /// Dry-run mode
    Check,
    /// Analysis
    Scan,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::Run => "run",
            JobType::Check => "check",
            JobType::Scan => "scan",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = ApiContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "run" => Ok(JobType::Run),
            "check" => Ok(JobType::Check),
            "scan" => Ok(JobType::Scan),
            other => Err(ApiContractError::InvalidJobType(other.to_string())),
        }
    }
}

/// Webhook service integrated with a template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebhookService {
    Github,
    Gitlab,
}

impl WebhookService {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookService::Github => "github",
            WebhookService::Gitlab => "gitlab",
        }
    }
}

impl fmt::Display for WebhookService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WebhookService {
    type Err = ApiContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "github" => Ok(WebhookService::Github),
            "gitlab" => Ok(WebhookService::Gitlab),
            other => Err(ApiContractError::InvalidWebhookService(other.to_string())),
        }
    }
}

/// Reference to another AWX object, by primary key or by name
///
/// Names are resolved to ids by the client before a request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceRef {
    Id(ResourceId),
    Name(String),
}

impl ResourceRef {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn id(&self) -> Option<ResourceId> {
        match self {
            ResourceRef::Id(id) => Some(*id),
            ResourceRef::Name(_) => None,
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceRef::Id(id) => write!(f, "#{id}"),
            ResourceRef::Name(name) => f.write_str(name),
        }
    }
}

impl From<ResourceId> for ResourceRef {
    fn from(id: ResourceId) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for ResourceRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for ResourceRef {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

/// A model field that points at another API collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference<'a> {
    /// Field name in the serialized payload
    pub field: &'static str,
    /// Collection the referenced object lives in
    pub endpoint: &'static str,
    pub target: &'a ResourceRef,
}

/// A resource model that can be sent to an AWX collection endpoint
pub trait ApiModel: Serialize + DeserializeOwned + Validate + Send + Sync {
    /// Collection path segment under `/api/<version>/`
    const ENDPOINT: &'static str;

    /// Fields of this model that reference other objects
    fn references(&self) -> Vec<Reference<'_>>;

    /// Set-valued fields sent as one comma-separated string
    fn comma_separated_fields(&self) -> Vec<(&'static str, &BTreeSet<String>)> {
        Vec::new()
    }
}

fn default_job_slice_count() -> u32 {
    1
}

/// Job template
///
/// Fields starting with `ask_` prompt for the value at launch time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct JobTemplate {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub job_type: JobType,
    /// Required when creating a template. AWX reports `null` here for
    /// templates that prompt for the inventory at launch; such records stay
    /// readable as [`ResourceRecord`] but do not decode into this model.
    pub inventory: ResourceRef,
    pub project: ResourceRef,
    #[validate(length(min = 1, message = "Playbook cannot be empty"))]
    pub playbook: String,
    #[serde(default)]
    pub scm_branch: String,
    #[serde(default)]
    pub forks: u32,
    #[serde(default)]
    pub limit: String,
    #[validate(range(max = 5, message = "Verbosity must be between 0 and 5"))]
    #[serde(default)]
    pub verbosity: u8,
    #[serde(with = "wire::json_text", default)]
    pub extra_vars: Map<String, Value>,
    #[serde(with = "wire::comma_separated", default)]
    pub job_tags: BTreeSet<String>,
    #[serde(default)]
    pub force_handlers: bool,
    #[serde(default)]
    pub skip_tags: String,
    #[serde(default)]
    pub start_at_task: String,
    /// Maximum run time in seconds, 0 for no limit
    #[serde(default)]
    pub timeout: u32,
    #[serde(default)]
    pub use_fact_cache: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_environment: Option<ResourceRef>,
    #[serde(default)]
    pub host_config_key: String,
    #[serde(default)]
    pub ask_scm_branch_on_launch: bool,
    #[serde(default)]
    pub ask_diff_mode_on_launch: bool,
    #[serde(default)]
    pub ask_variables_on_launch: bool,
    #[serde(default)]
    pub ask_limit_on_launch: bool,
    #[serde(default)]
    pub ask_tags_on_launch: bool,
    #[serde(default)]
    pub ask_skip_tags_on_launch: bool,
    #[serde(default)]
    pub ask_job_type_on_launch: bool,
    #[serde(default)]
    pub ask_verbosity_on_launch: bool,
    #[serde(default)]
    pub ask_inventory_on_launch: bool,
    #[serde(default)]
    pub ask_credential_on_launch: bool,
    #[serde(default)]
    pub ask_execution_environment_on_launch: bool,
    #[serde(default)]
    pub ask_labels_on_launch: bool,
    #[serde(default)]
    pub ask_forks_on_launch: bool,
    #[serde(default)]
    pub ask_job_slice_count_on_launch: bool,
    #[serde(default)]
    pub ask_timeout_on_launch: bool,
    #[serde(default)]
    pub ask_instance_groups_on_launch: bool,
    #[serde(default)]
    pub survey_enabled: bool,
    #[serde(default)]
    pub become_enabled: bool,
    #[serde(default)]
    pub diff_mode: bool,
    #[serde(default)]
    pub allow_simultaneous: bool,
    #[validate(range(min = 1, message = "Job slice count must be at least 1"))]
    #[serde(default = "default_job_slice_count")]
    pub job_slice_count: u32,
    #[serde(
        default,
        deserialize_with = "wire::empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub webhook_service: Option<WebhookService>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_credential: Option<ResourceRef>,
    #[serde(default)]
    pub prevent_instance_group_fallback: bool,
}

impl JobTemplate {
    /// Create a job template with the required fields and API defaults
    pub fn new(
        name: impl Into<String>,
        inventory: impl Into<ResourceRef>,
        project: impl Into<ResourceRef>,
        playbook: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            job_type: JobType::default(),
            inventory: inventory.into(),
            project: project.into(),
            playbook: playbook.into(),
            scm_branch: String::new(),
            forks: 0,
            limit: String::new(),
            verbosity: 0,
            extra_vars: Map::new(),
            job_tags: BTreeSet::new(),
            force_handlers: false,
            skip_tags: String::new(),
            start_at_task: String::new(),
            timeout: 0,
            use_fact_cache: false,
            execution_environment: None,
            host_config_key: String::new(),
            ask_scm_branch_on_launch: false,
            ask_diff_mode_on_launch: false,
            ask_variables_on_launch: false,
            ask_limit_on_launch: false,
            ask_tags_on_launch: false,
            ask_skip_tags_on_launch: false,
            ask_job_type_on_launch: false,
            ask_verbosity_on_launch: false,
            ask_inventory_on_launch: false,
            ask_credential_on_launch: false,
            ask_execution_environment_on_launch: false,
            ask_labels_on_launch: false,
            ask_forks_on_launch: false,
            ask_job_slice_count_on_launch: false,
            ask_timeout_on_launch: false,
            ask_instance_groups_on_launch: false,
            survey_enabled: false,
            become_enabled: false,
            diff_mode: false,
            allow_simultaneous: false,
            job_slice_count: default_job_slice_count(),
            webhook_service: None,
            webhook_credential: None,
            prevent_instance_group_fallback: false,
        }
    }
}

impl ApiModel for JobTemplate {
    const ENDPOINT: &'static str = "job_templates";

    fn comma_separated_fields(&self) -> Vec<(&'static str, &BTreeSet<String>)> {
        vec![("job_tags", &self.job_tags)]
    }

    fn references(&self) -> Vec<Reference<'_>> {
        let mut refs = vec![
            Reference {
                field: "inventory",
                endpoint: "inventories",
                target: &self.inventory,
            },
            Reference {
                field: "project",
                endpoint: "projects",
                target: &self.project,
            },
        ];
        if let Some(ee) = &self.execution_environment {
            refs.push(Reference {
                field: "execution_environment",
                endpoint: "execution_environments",
                target: ee,
            });
        }
        if let Some(credential) = &self.webhook_credential {
            refs.push(Reference {
                field: "webhook_credential",
                endpoint: "credentials",
                target: credential,
            });
        }
        refs
    }
}

/// Workflow job template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct WorkflowJobTemplate {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "wire::json_text", default)]
    pub extra_vars: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<ResourceRef>,
    #[serde(default)]
    pub survey_enabled: bool,
    #[serde(default)]
    pub allow_simultaneous: bool,
    #[serde(default)]
    pub ask_variables_on_launch: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory: Option<ResourceRef>,
    #[serde(default)]
    pub limit: String,
    #[serde(default)]
    pub scm_branch: String,
    #[serde(default)]
    pub ask_inventory_on_launch: bool,
    #[serde(default)]
    pub ask_scm_branch_on_launch: bool,
    #[serde(default)]
    pub ask_limit_on_launch: bool,
    #[serde(
        default,
        deserialize_with = "wire::empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub webhook_service: Option<WebhookService>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_credential: Option<ResourceRef>,
    #[serde(default)]
    pub ask_labels_on_launch: bool,
    #[serde(default)]
    pub ask_skip_tags_on_launch: bool,
    #[serde(default)]
    pub ask_tags_on_launch: bool,
    #[serde(default)]
    pub skip_tags: String,
    #[serde(with = "wire::comma_separated", default)]
    pub job_tags: BTreeSet<String>,
}

impl WorkflowJobTemplate {
    /// Create a workflow job template with API defaults
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            extra_vars: Map::new(),
            organization: None,
            survey_enabled: false,
            allow_simultaneous: false,
            ask_variables_on_launch: false,
            inventory: None,
            limit: String::new(),
            scm_branch: String::new(),
            ask_inventory_on_launch: false,
            ask_scm_branch_on_launch: false,
            ask_limit_on_launch: false,
            webhook_service: None,
            webhook_credential: None,
            ask_labels_on_launch: false,
            ask_skip_tags_on_launch: false,
            ask_tags_on_launch: false,
            skip_tags: String::new(),
            job_tags: BTreeSet::new(),
        }
    }
}

impl ApiModel for WorkflowJobTemplate {
    const ENDPOINT: &'static str = "workflow_job_templates";

    fn comma_separated_fields(&self) -> Vec<(&'static str, &BTreeSet<String>)> {
        vec![("job_tags", &self.job_tags)]
    }

    fn references(&self) -> Vec<Reference<'_>> {
        [
            ("organization", "organizations", self.organization.as_ref()),
            ("inventory", "inventories", self.inventory.as_ref()),
            ("webhook_credential", "credentials", self.webhook_credential.as_ref()),
        ]
        .into_iter()
        .filter_map(|(field, endpoint, target)| {
            target.map(|target| Reference {
                field,
                endpoint,
                target,
            })
        })
        .collect()
    }
}

/// An object as returned by the API
///
/// `id` and `name` are common to every named AWX resource; the rest of the
/// payload is kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub id: ResourceId,
    pub name: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ResourceRecord {
    /// Look up a raw field of the record
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Decode the record into a resource model
    pub fn into_model<M: DeserializeOwned>(self) -> Result<M, ApiContractError> {
        let value = serde_json::to_value(self)?;
        Ok(serde_json::from_value(value)?)
    }
}

/// A page of a collection listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<ResourceRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_template_defaults() {
        let template = JobTemplate::new("Backup Job", "db_inventory", "backup_project", "backup.yml");

        assert_eq!(template.job_type, JobType::Run);
        assert_eq!(template.job_slice_count, 1);
        assert_eq!(template.inventory, ResourceRef::name("db_inventory"));
        assert!(template.extra_vars.is_empty());
    }

    #[test]
    fn test_job_template_serialization() {
        let mut template = JobTemplate::new("Backup Job", "db_inventory", 7u64, "backup.yml");
        template.extra_vars.insert("retention".into(), json!(30));
        template.job_tags.insert("db".into());

        let value = serde_json::to_value(&template).unwrap();
        assert_eq!(value["inventory"], json!("db_inventory"));
        assert_eq!(value["project"], json!(7));
        assert_eq!(value["job_type"], json!("run"));
        assert_eq!(value["extra_vars"], json!("{\"retention\":30}"));
        assert_eq!(value["job_tags"], json!("db"));
        assert!(value.get("webhook_service").is_none());
    }

    #[test]
    fn test_job_template_references() {
        let mut template = JobTemplate::new("t", "inv", 3u64, "site.yml");
        template.webhook_credential = Some("gh-token".into());

        let refs = template.references();
        let endpoints: Vec<_> = refs.iter().map(|r| (r.field, r.endpoint)).collect();
        assert_eq!(
            endpoints,
            vec![
                ("inventory", "inventories"),
                ("project", "projects"),
                ("webhook_credential", "credentials"),
            ]
        );
    }

    #[test]
    fn test_workflow_references_skip_unset_fields() {
        let mut workflow = WorkflowJobTemplate::new("Release");
        assert!(workflow.references().is_empty());

        workflow.organization = Some("Default".into());
        let refs = workflow.references();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].endpoint, "organizations");
    }

    #[test]
    fn test_record_into_model() {
        let record: ResourceRecord = serde_json::from_value(json!({
            "id": 31,
            "name": "Deploy",
            "url": "/api/v2/job_templates/31/",
            "job_type": "check",
            "inventory": 1,
            "project": 2,
            "playbook": "deploy.yml",
            "extra_vars": "{\"env\": \"prod\"}",
            "job_tags": "a,b",
            "webhook_service": "",
            "execution_environment": null,
            "summary_fields": {}
        }))
        .unwrap();

        assert_eq!(record.id, 31);
        assert_eq!(record.field("playbook"), Some(&json!("deploy.yml")));

        let template: JobTemplate = record.into_model().unwrap();
        assert_eq!(template.name, "Deploy");
        assert_eq!(template.job_type, JobType::Check);
        assert_eq!(template.inventory, ResourceRef::Id(1));
        assert_eq!(template.extra_vars["env"], json!("prod"));
        assert_eq!(template.job_tags.len(), 2);
        assert_eq!(template.webhook_service, None);
        assert_eq!(template.job_slice_count, 1);
    }

    #[test]
    fn test_record_without_inventory_stays_raw() {
        let record: ResourceRecord = serde_json::from_value(json!({
            "id": 32,
            "name": "Prompted",
            "inventory": null,
            "project": 2,
            "playbook": "deploy.yml",
            "ask_inventory_on_launch": true
        }))
        .unwrap();

        assert_eq!(record.field("inventory"), Some(&Value::Null));
        assert!(matches!(
            record.into_model::<JobTemplate>(),
            Err(ApiContractError::Json(_))
        ));
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("scan".parse::<JobType>().unwrap(), JobType::Scan);
        assert!(matches!(
            "deploy".parse::<JobType>(),
            Err(ApiContractError::InvalidJobType(_))
        ));
        assert_eq!("gitlab".parse::<WebhookService>().unwrap(), WebhookService::Gitlab);
        assert!("bitbucket".parse::<WebhookService>().is_err());
    }
}

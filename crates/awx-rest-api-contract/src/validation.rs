//! Validation helpers for API contract types

use std::borrow::Cow;

use crate::error::ApiContractError;
use crate::types::*;
use validator::{Validate, ValidationError, ValidationErrors};

/// Validate any resource model before it is serialized
///
/// Runs the field constraints declared on the model, checks that every
/// named reference carries a non-empty name and that no item of a
/// comma-separated field contains a comma.
pub fn validate_model<M: ApiModel>(model: &M) -> Result<(), ApiContractError> {
    let mut errors = match model.validate() {
        Ok(()) => ValidationErrors::new(),
        Err(errors) => errors,
    };

    for reference in model.references() {
        if let ResourceRef::Name(name) = reference.target {
            if name.trim().is_empty() {
                let mut error = ValidationError::new("empty_reference");
                error.message = Some(Cow::Borrowed("Referenced object name cannot be empty"));
                errors.add(reference.field, error);
            }
        }
    }

    for (field, items) in model.comma_separated_fields() {
        if items.iter().any(|item| item.contains(',')) {
            let mut error = ValidationError::new("embedded_comma");
            error.message = Some(Cow::Borrowed("Items of this field cannot contain ','"));
            errors.add(field, error);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiContractError::Validation(errors))
    }
}

/// Validate a job template
pub fn validate_job_template(template: &JobTemplate) -> Result<(), ApiContractError> {
    validate_model(template)
}

/// Validate a workflow job template
pub fn validate_workflow_job_template(
    template: &WorkflowJobTemplate,
) -> Result<(), ApiContractError> {
    validate_model(template)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_errors(err: &ApiContractError) -> Vec<String> {
        let mut fields: Vec<String> = err
            .validation_errors()
            .expect("validation error")
            .field_errors()
            .keys()
            .map(|k| k.to_string())
            .collect();
        fields.sort();
        fields
    }

    #[test]
    fn test_validate_job_template_valid() {
        let template = JobTemplate::new("Backup Job", "db_inventory", "backup_project", "backup.yml");
        let before = template.clone();

        assert!(validate_job_template(&template).is_ok());
        assert_eq!(template, before);
    }

    #[test]
    fn test_validate_job_template_empty_required_fields() {
        let template = JobTemplate::new("", "db_inventory", "backup_project", "");

        let err = validate_job_template(&template).unwrap_err();
        assert_eq!(field_errors(&err), vec!["name", "playbook"]);
    }

    #[test]
    fn test_validate_job_template_ranges() {
        let mut template = JobTemplate::new("t", "inv", "proj", "site.yml");
        template.verbosity = 6;
        template.job_slice_count = 0;

        let err = validate_job_template(&template).unwrap_err();
        assert_eq!(field_errors(&err), vec!["job_slice_count", "verbosity"]);
    }

    #[test]
    fn test_validate_job_tags_without_commas() {
        let mut template = JobTemplate::new("t", "inv", "proj", "site.yml");
        template.job_tags.insert("deploy".into());
        assert!(validate_job_template(&template).is_ok());

        template.job_tags.insert("a,b".into());
        let err = validate_job_template(&template).unwrap_err();
        assert_eq!(field_errors(&err), vec!["job_tags"]);
    }

    #[test]
    fn test_validate_empty_reference_name() {
        let template = JobTemplate::new("t", "  ", "proj", "site.yml");

        let err = validate_job_template(&template).unwrap_err();
        assert_eq!(field_errors(&err), vec!["inventory"]);
    }

    #[test]
    fn test_validate_workflow_job_template() {
        let mut workflow = WorkflowJobTemplate::new("Release Deployment Workflow");
        workflow.inventory = Some("prod_inventory".into());
        assert!(validate_workflow_job_template(&workflow).is_ok());

        workflow.name.clear();
        workflow.organization = Some(ResourceRef::name(""));
        let err = validate_workflow_job_template(&workflow).unwrap_err();
        assert_eq!(field_errors(&err), vec!["name", "organization"]);

        workflow.name = "Release".into();
        workflow.organization = None;
        workflow.job_tags.insert("deploy,prod".into());
        let err = validate_model(&workflow).unwrap_err();
        assert_eq!(field_errors(&err), vec!["job_tags"]);
    }
}

//! Template subcommands, shared by job and workflow job templates

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use awx_rest_client::contract::ApiModel;
use awx_rest_client::ResourceAdapter;
use clap::Subcommand;
use serde::Serialize;

#[derive(Subcommand, Debug, Clone)]
pub enum TemplateCommands {
    /// Show a template by name
    Fetch {
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// List templates (first page)
    List,
    /// Report whether a template exists
    Exists {
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Create a template from a JSON model file
    Create {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Update the named template from a JSON model file
    Update {
        #[arg(value_name = "NAME")]
        name: String,
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Delete a template by name
    Delete {
        #[arg(value_name = "NAME")]
        name: String,
    },
}

impl TemplateCommands {
    /// Run the command against one resource collection
    pub async fn run<M: ApiModel>(self, resource: &ResourceAdapter<M>) -> Result<String> {
        match self {
            TemplateCommands::Fetch { name } => to_json(&resource.fetch(&name).await?),
            TemplateCommands::List => to_json(&resource.list().await?),
            TemplateCommands::Exists { name } => Ok(resource.exists(&name).await?.to_string()),
            TemplateCommands::Create { file } => {
                let model: M = load_model(&file)?;
                to_json(&resource.create(&model).await?)
            }
            TemplateCommands::Update { name, file } => {
                let model: M = load_model(&file)?;
                to_json(&resource.update(&name, &model).await?)
            }
            TemplateCommands::Delete { name } => {
                resource.delete(&name).await?;
                Ok(format!("Deleted '{}' from {}", name, resource.endpoint()))
            }
        }
    }
}

/// Read a model from a JSON file
pub fn load_model<M: ApiModel>(path: &Path) -> Result<M> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid model in {}", path.display()))
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

//! AWX command-line interface library

pub mod connection;
pub mod templates;

// Re-export CLI types for testing
pub use clap::{Parser, Subcommand};

use anyhow::Result;
use connection::ConnectionArgs;
use templates::TemplateCommands;
use tracing::debug;

#[derive(Parser)]
#[command(name = "awx")]
#[command(about = "Manage AWX job templates and workflow job templates")]
#[command(version, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Log requests at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Job template commands
    JobTemplate {
        #[command(subcommand)]
        subcommand: TemplateCommands,
    },
    /// Workflow job template commands
    WorkflowJobTemplate {
        #[command(subcommand)]
        subcommand: TemplateCommands,
    },
    /// Check that the server accepts the configured credentials
    Ping,
}

impl Cli {
    /// Run the selected command and return the text to print
    pub async fn run(self) -> Result<String> {
        let client = self.connection.client()?;
        debug!("Using AWX server at {}", client.transport().base_url());

        match self.command {
            Commands::JobTemplate { subcommand } => subcommand.run(client.job_template()).await,
            Commands::WorkflowJobTemplate { subcommand } => {
                subcommand.run(client.workflow_job_template()).await
            }
            Commands::Ping => {
                if client.is_authenticated().await? {
                    Ok(format!("Authenticated against {}", client.transport().base_url()))
                } else {
                    anyhow::bail!(
                        "Credentials were rejected by {}",
                        client.transport().base_url()
                    )
                }
            }
        }
    }
}

//! Label command - apply a label to a repository path

use clap::Args;
use sscm_core::SurroundClient;

/// Arguments for the label command
#[derive(Args, Debug)]
pub struct LabelArgs {
    /// Label to apply
    pub label: String,

    /// Address to label recursively; must name a repository
    pub source: String,
}

impl LabelArgs {
    /// Execute the label command
    pub async fn execute(&self, client: &SurroundClient) -> anyhow::Result<()> {
        client.apply_label(&self.label, &self.source).await?;
        println!("Applied label '{}' to {}", self.label, self.source);
        Ok(())
    }
}

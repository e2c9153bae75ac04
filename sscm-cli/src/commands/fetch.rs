//! Get commands - fetch latest, labeled or single files

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use sscm_core::SurroundClient;

/// Arguments for the get command
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Address to fetch recursively
    pub source: String,

    /// Local directory to fetch into (created if missing)
    pub target: PathBuf,
}

impl GetArgs {
    /// Execute the get command
    pub async fn execute(&self, client: &SurroundClient) -> anyhow::Result<()> {
        client.get_latest(&self.source, &self.target).await?;
        println!("Fetched {} into {}", self.source, self.target.display());
        Ok(())
    }
}

/// Arguments for the get-labeled command
#[derive(Args, Debug)]
pub struct GetLabeledArgs {
    /// Label to fetch
    pub label: String,

    /// Address to fetch recursively
    pub source: String,

    /// Local directory to fetch into (created if missing)
    pub target: PathBuf,
}

impl GetLabeledArgs {
    /// Execute the get-labeled command
    pub async fn execute(&self, client: &SurroundClient) -> anyhow::Result<()> {
        client
            .get_labeled(&self.label, &self.source, &self.target)
            .await?;
        println!(
            "Fetched {} at label '{}' into {}",
            self.source,
            self.label,
            self.target.display()
        );
        Ok(())
    }
}

/// Arguments for the cat command
#[derive(Args, Debug)]
pub struct CatArgs {
    /// File to read, as repository/path/to/file
    pub file: String,

    /// Write the contents to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl CatArgs {
    /// Execute the cat command
    pub async fn execute(&self, client: &SurroundClient) -> anyhow::Result<()> {
        let contents = client.get_file_contents(&self.file).await?;

        match self.output {
            Some(ref path) => {
                tokio::fs::write(path, &contents).await?;
                eprintln!("Wrote {} bytes to {}", contents.len(), path.display());
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(&contents)?;
                stdout.flush()?;
            }
        }

        Ok(())
    }
}

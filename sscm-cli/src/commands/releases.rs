//! Releases command - check folder paths against the release filter

use clap::Args;
use sscm_core::Config;

/// Arguments for the releases command
#[derive(Args, Debug)]
pub struct ReleasesArgs {
    /// Release number substituted for %RELNO% in the filter
    pub release: String,

    /// Folder paths to test
    #[arg(required = true)]
    pub folders: Vec<String>,
}

impl ReleasesArgs {
    /// Execute the releases command
    ///
    /// Prints the folders that belong to the release, one per line.
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let filter = config.release_filter(&self.release)?;

        let matching: Vec<&String> = self
            .folders
            .iter()
            .filter(|folder| filter.matches(folder))
            .collect();

        if matching.is_empty() {
            anyhow::bail!("No folders match release {}", self.release);
        }

        for folder in matching {
            println!("{}", folder);
        }

        Ok(())
    }
}

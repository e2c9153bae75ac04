//! Source control operations built on the sscm client
//!
//! Each operation resolves an address, then issues a fixed sequence of sscm
//! commands through a [`CommandRunner`].

use std::path::Path;

use crate::address::Address;
use crate::config::ServerConfig;
use crate::listing::{build_tree, parse_branch_root, BranchEntry, PathTranslation, TreeNode};
use crate::process::{CommandRunner, Invocation, SscmRunner};
use crate::{Error, Result};

/// Client for browsing, fetching and labeling Surround SCM content
///
/// Holds no connection state; every operation launches its own subprocesses.
#[derive(Debug, Clone)]
pub struct SurroundClient<R = SscmRunner> {
    runner: R,
}

impl SurroundClient<SscmRunner> {
    /// Create a client that runs the configured sscm executable
    pub fn new(config: ServerConfig) -> Self {
        Self::with_runner(SscmRunner::new(config))
    }
}

impl<R: CommandRunner> SurroundClient<R> {
    /// Create a client around a custom runner
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    /// Get the underlying runner
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Check that the client can be launched and reach the server
    ///
    /// Returns the version text printed by sscm.
    pub async fn validate_connection(&self) -> Result<Vec<String>> {
        self.sscm("version", Vec::<String>::new()).await
    }

    /// Recursively get the latest version of `source_path` into `target_path`
    pub async fn get_latest(&self, source_path: &str, target_path: &Path) -> Result<()> {
        require(source_path, "source_path")?;
        let target = path_arg(target_path, "target_path")?;

        let address = Address::parse(source_path);
        tracing::info!(source = %address, target = %target, "Getting latest");

        tokio::fs::create_dir_all(target_path).await?;
        self.sscm_silent(
            "get",
            [
                address.path().to_string(),
                format!("-d{}", target),
                "-r".to_string(),
                format!("-p{}", address.repository()),
                format!("-b{}", address.branch()),
            ],
        )
        .await
    }

    /// Recursively get the files carrying `label` under `source_path`
    pub async fn get_labeled(&self, label: &str, source_path: &str, target_path: &Path) -> Result<()> {
        require(label, "label")?;
        require(source_path, "source_path")?;
        let target = path_arg(target_path, "target_path")?;

        let address = Address::parse(source_path);
        tracing::info!(label, source = %address, target = %target, "Getting labeled files");

        tokio::fs::create_dir_all(target_path).await?;
        self.sscm_silent(
            "get",
            [
                format!("{}*", address.path()),
                format!("-d{}", target),
                "-r".to_string(),
                format!("-p{}", address.repository()),
                format!("-l{}", label),
                format!("-b{}", address.branch()),
            ],
        )
        .await
    }

    /// Apply `label` to everything under `source_path`
    pub async fn apply_label(&self, label: &str, source_path: &str) -> Result<()> {
        require(label, "label")?;
        require(source_path, "source_path")?;

        let address = Address::parse(source_path.trim_matches('/'));
        if address.is_top_level() {
            return Err(Error::InvalidArgument(
                "Invalid source path. Must specify a repository.".to_string(),
            ));
        }

        tracing::info!(label, source = %address, "Applying label");
        self.sscm_silent(
            "label",
            [
                address.path().to_string(),
                format!("-b{}", address.branch()),
                format!("-l{}", label),
                "-c-".to_string(),
                format!("-p{}", address.repository()),
                "-r".to_string(),
            ],
        )
        .await
    }

    /// Read the current contents of a single file
    ///
    /// `file_path` is `<repository>/<path/to/file>` on the repository's
    /// mainline. The file is fetched into a private staging directory that is
    /// removed before returning.
    pub async fn get_file_contents(&self, file_path: &str) -> Result<Vec<u8>> {
        require(file_path, "file_path")?;

        let trimmed = file_path.trim_start_matches('/');
        let (repository, sub_path) = match trimmed.split_once('/') {
            Some((repository, rest)) if !rest.is_empty() => (repository, rest),
            Some((repository, _)) => (repository, "/"),
            None => (trimmed, "/"),
        };
        if repository.is_empty() {
            return Err(Error::missing("repository in file_path"));
        }

        let file_name = file_path.rsplit('/').next().unwrap_or_default();
        if file_name.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "'{}' does not name a file",
                file_path
            )));
        }

        let staging = tempfile::Builder::new().prefix("sscm-get-").tempdir()?;
        let staging_dir = path_arg(staging.path(), "staging directory")?;
        tracing::debug!(file = file_path, staging = %staging_dir, "Fetching single file");

        self.sscm_silent(
            "get",
            [
                sub_path.to_string(),
                format!("-d{}", staging_dir),
                "-r".to_string(),
                format!("-p{}", repository),
            ],
        )
        .await?;

        let contents = tokio::fs::read(staging.path().join(file_name)).await?;
        staging.close()?;
        Ok(contents)
    }

    /// Browse the tree at `source_path`
    ///
    /// An empty path lists every repository and branch. Returns `Ok(None)`
    /// when the client reports nothing for the path.
    pub async fn browse(&self, source_path: &str) -> Result<Option<TreeNode>> {
        let address = Address::parse(source_path.trim_matches('/'));

        if address.is_top_level() {
            self.list_repositories().await.map(Some)
        } else {
            self.list_directory(&address).await
        }
    }

    /// Native root path of a branch within its repository
    pub async fn branch_root(&self, branch: &str, repository: &str) -> Result<String> {
        let properties = self
            .sscm("bp", [format!("-b{}", branch), format!("-p{}", repository)])
            .await?;
        parse_branch_root(&properties, branch)
    }

    async fn list_directory(&self, address: &Address) -> Result<Option<TreeNode>> {
        let translation = if address.is_explicit_branch() {
            PathTranslation::Branch {
                repository: address.repository().to_string(),
                branch: address.branch().to_string(),
                root: self.branch_root(address.branch(), address.repository()).await?,
            }
        } else {
            PathTranslation::Native
        };

        let lines = self
            .sscm(
                "ls",
                [
                    address.path().to_string(),
                    format!("-b{}", address.branch()),
                    format!("-p{}", address.repository()),
                    "-r".to_string(),
                ],
            )
            .await?;

        let tree = build_tree(&lines, &translation)?;
        if tree.is_none() {
            tracing::debug!(address = %address, "Listing returned no entries");
        }
        Ok(tree)
    }

    /// Enumerate mainlines and their branches as top-level entries
    async fn list_repositories(&self) -> Result<TreeNode> {
        let mut root = TreeNode::directory("");

        let mainlines = self.sscm("lsmainline", Vec::<String>::new()).await?;
        for mainline in mainlines.iter().map(|m| m.trim()) {
            let branches = self.sscm("lsbranch", [format!("-p{}", mainline)]).await?;

            for line in &branches {
                let path = match BranchEntry::parse(line) {
                    BranchEntry::Mainline => mainline.to_string(),
                    BranchEntry::Named(name) => {
                        let branch_root = self.branch_root(&name, mainline).await?;
                        format!("{}:{}", branch_root, name)
                    }
                };

                root.children.push(TreeNode {
                    name: path.clone(),
                    full_path: path,
                    children: Vec::new(),
                    is_leaf: false,
                });
            }
        }

        Ok(root)
    }

    async fn sscm<I, S>(&self, command: &str, args: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.runner.run(Invocation::capture(command, args)).await
    }

    async fn sscm_silent<I, S>(&self, command: &str, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.runner.run(Invocation::silent(command, args)).await?;
        Ok(())
    }
}

fn require(value: &str, name: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::missing(name));
    }
    Ok(())
}

fn path_arg<'a>(path: &'a Path, name: &str) -> Result<&'a str> {
    if path.as_os_str().is_empty() {
        return Err(Error::missing(name));
    }
    path.to_str()
        .ok_or_else(|| Error::InvalidArgument(format!("{} is not valid UTF-8: {}", name, path.display())))
}

//! Ls command - browse repositories, branches and directories

use clap::Args;
use sscm_core::{SurroundClient, TreeNode};

/// Arguments for the ls command
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Address to list: repo, repo/sub/path, repo:branch or repo:branch/sub/path.
    /// Omit to list every repository and branch.
    #[arg(default_value = "")]
    pub path: String,

    /// Print the tree as JSON
    #[arg(long)]
    pub json: bool,
}

impl LsArgs {
    /// Execute the ls command
    pub async fn execute(&self, verbose: bool, client: &SurroundClient) -> anyhow::Result<()> {
        if verbose {
            tracing::info!(path = %self.path, "Listing");
        }

        let Some(tree) = client.browse(&self.path).await? else {
            anyhow::bail!("Directory not found: {}", self.path);
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&tree)?);
        } else {
            print_tree(&tree, 0);
        }

        Ok(())
    }
}

fn print_tree(node: &TreeNode, depth: usize) {
    let indent = "  ".repeat(depth);
    if node.is_leaf {
        println!("{}{}", indent, node.name);
        return;
    }

    if node.full_path.is_empty() {
        println!("{}(all repositories)", indent);
    } else {
        println!("{}{}/", indent, node.name);
    }

    for child in &node.children {
        print_tree(child, depth + 1);
    }
}

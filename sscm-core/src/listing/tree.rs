//! Rebuilds a directory tree from `sscm ls -r` output
//!
//! The recursive listing is flat. Directory lines start at column zero and
//! carry the full native path; file lines are indented and belong to the most
//! recent directory. Nesting is encoded by repeating the parent path as a
//! prefix, not by indentation depth:
//!
//! ```text
//! repoA
//! repoA/sub
//!   file1.txt           current    3  ...
//!   file2.txt           old        1  ...
//! repoA/sub2
//! Total 2 files
//! ```

use std::iter::Peekable;

use serde::Serialize;

use crate::{Error, Result};

/// Marker that separates a live file's name from its revision details
const CURRENT_MARKER: &str = " current ";

/// A directory or file in a reconstructed listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    /// Last path segment
    pub name: String,
    /// Path from the tree root, in the caller's address scheme
    pub full_path: String,
    /// Subdirectories and files in listing order; always empty for files
    pub children: Vec<TreeNode>,
    /// True for files
    pub is_leaf: bool,
}

impl TreeNode {
    /// Create an empty directory node
    pub fn directory(full_path: impl Into<String>) -> Self {
        let full_path = full_path.into();
        Self {
            name: last_segment(&full_path).to_string(),
            full_path,
            children: Vec::new(),
            is_leaf: false,
        }
    }

    /// Create a file node inside the directory at `parent_path`
    pub fn file(parent_path: &str, name: impl Into<String>) -> Self {
        let name = name.into();
        let full_path = if parent_path.is_empty() {
            name.clone()
        } else {
            format!("{}/{}", parent_path, name)
        };
        Self {
            name,
            full_path,
            children: Vec::new(),
            is_leaf: true,
        }
    }

    /// Iterate over the subdirectories
    pub fn directories(&self) -> impl Iterator<Item = &TreeNode> {
        self.children.iter().filter(|c| !c.is_leaf)
    }

    /// Iterate over the files
    pub fn files(&self) -> impl Iterator<Item = &TreeNode> {
        self.children.iter().filter(|c| c.is_leaf)
    }

    /// Find a direct child by name
    pub fn child(&self, name: &str) -> Option<&TreeNode> {
        self.children.iter().find(|c| c.name == name)
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, name)| name)
}

/// How native paths are rewritten into the caller's address scheme
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathTranslation {
    /// Paths are reported as the client prints them
    Native,
    /// Paths are re-rooted under `<repository>:<branch>`
    Branch {
        repository: String,
        branch: String,
        /// Native path where the branch's content begins
        root: String,
    },
}

impl PathTranslation {
    /// Translate a native directory path
    pub fn translate(&self, native: &str) -> Result<String> {
        match self {
            Self::Native => Ok(native.trim_matches('/').to_string()),
            Self::Branch {
                repository,
                branch,
                root,
            } => {
                let relative = strip_path_prefix(native, root)
                    .or_else(|| strip_path_prefix(native, repository))
                    .ok_or_else(|| {
                        Error::Parse(format!(
                            "directory '{}' is outside the root '{}' of branch '{}'",
                            native, root, branch
                        ))
                    })?;

                let translated = format!("{}:{}/{}", repository, branch, relative.trim_start_matches('/'));
                Ok(translated.trim_matches('/').to_string())
            }
        }
    }
}

/// Strip `prefix` from `path` when it ends on a segment boundary
fn strip_path_prefix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let prefix = prefix.trim_end_matches('/');
    let rest = path.strip_prefix(prefix)?;
    (rest.is_empty() || rest.starts_with('/')).then_some(rest)
}

/// Build a tree from the lines of a recursive listing
///
/// The last line is the client's summary and is discarded. Returns
/// `Ok(None)` when nothing is left to report, which callers treat as
/// "directory not found".
pub fn build_tree<S: AsRef<str>>(
    lines: &[S],
    translation: &PathTranslation,
) -> Result<Option<TreeNode>> {
    if lines.len() < 2 {
        return Ok(None);
    }

    let body = &lines[..lines.len() - 1];
    let mut lines = body
        .iter()
        .map(|line| AsRef::<str>::as_ref(line))
        .filter(|line| !line.is_empty())
        .peekable();

    let header = match lines.next() {
        Some(line) if is_directory_line(line) => line,
        Some(line) => {
            return Err(Error::Parse(format!(
                "file entry before any directory: '{}'",
                line.trim()
            )))
        }
        None => return Ok(None),
    };

    let root = parse_directory(header, &mut lines, translation)?;

    if let Some(stray) = lines.next() {
        return Err(Error::Parse(format!(
            "directory '{}' is not inside listing root '{}'",
            stray, header
        )));
    }

    Ok(Some(root))
}

fn is_directory_line(line: &str) -> bool {
    line.chars().next().is_some_and(|c| !c.is_whitespace())
}

/// Parse one directory and everything nested beneath it
///
/// Consumes lines until a directory line that is not under `header` appears,
/// leaving that line for the caller.
fn parse_directory<'a, I>(
    header: &str,
    lines: &mut Peekable<I>,
    translation: &PathTranslation,
) -> Result<TreeNode>
where
    I: Iterator<Item = &'a str>,
{
    let mut node = TreeNode::directory(translation.translate(header)?);
    let child_prefix = format!("{}/", header);

    while let Some(&line) = lines.peek() {
        if is_directory_line(line) {
            if !line.starts_with(&child_prefix) {
                break;
            }
            lines.next();
            let child = parse_directory(line, lines, translation)?;
            node.children.push(child);
        } else {
            lines.next();
            if let Some(name) = current_file_name(line) {
                let file = TreeNode::file(&node.full_path, name);
                node.children.push(file);
            }
        }
    }

    Ok(node)
}

/// Name of a live file entry; `None` for historical revisions
///
/// The marker is normally followed by revision columns, but a line may also
/// end right after `current`.
fn current_file_name(line: &str) -> Option<&str> {
    let trailing = CURRENT_MARKER.trim_end();
    let marker = line.rfind(CURRENT_MARKER).or_else(|| {
        let trimmed = line.trim_end();
        trimmed
            .ends_with(trailing)
            .then(|| trimmed.len() - trailing.len())
    })?;
    if marker == 0 {
        return None;
    }
    let name = line[..marker].trim();
    (!name.is_empty()).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(lines: &[&str]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.to_string())
            .chain(std::iter::once("Total 3 files".to_string()))
            .collect()
    }

    fn names<'a>(nodes: impl Iterator<Item = &'a TreeNode>) -> Vec<&'a str> {
        nodes.map(|n| n.name.as_str()).collect()
    }

    #[test]
    fn test_builds_nested_tree() {
        let lines = listing(&[
            "repoA",
            "repoA/sub",
            "  file1.txt current ",
            "  file2.txt old",
            "repoA/sub2",
        ]);

        let root = build_tree(&lines, &PathTranslation::Native).unwrap().unwrap();
        assert_eq!(root.name, "repoA");
        assert_eq!(root.full_path, "repoA");
        assert_eq!(names(root.directories()), vec!["sub", "sub2"]);
        assert_eq!(root.files().count(), 0);

        let sub = root.child("sub").unwrap();
        assert_eq!(sub.full_path, "repoA/sub");
        assert_eq!(names(sub.files()), vec!["file1.txt"]);
        assert_eq!(sub.files().next().unwrap().full_path, "repoA/sub/file1.txt");
        assert_eq!(sub.directories().count(), 0);

        let sub2 = root.child("sub2").unwrap();
        assert!(sub2.children.is_empty());
        assert!(!sub2.is_leaf);
    }

    #[test]
    fn test_marker_at_end_of_line() {
        let lines = vec![
            "repoA",
            "repoA/sub",
            "  file1.txt current",
            "  file2.txt old",
            "repoA/sub2",
            "Total 2 files",
        ];

        let root = build_tree(&lines, &PathTranslation::Native).unwrap().unwrap();
        assert_eq!(names(root.directories()), vec!["sub", "sub2"]);

        let sub = root.child("sub").unwrap();
        assert_eq!(names(sub.files()), vec!["file1.txt"]);
        assert!(root.child("sub2").unwrap().children.is_empty());
    }

    #[test]
    fn test_realistic_file_columns() {
        let lines = listing(&[
            "repoA",
            "  build notes.md           current    12  06/01/2024 10:15 AM",
            "  README.md                current     4  06/01/2024 10:15 AM",
            "  removed.txt              old         2  05/01/2024 09:00 AM",
        ]);

        let root = build_tree(&lines, &PathTranslation::Native).unwrap().unwrap();
        assert_eq!(names(root.files()), vec!["build notes.md", "README.md"]);
    }

    #[test]
    fn test_deep_nesting_returns_to_parent() {
        let lines = listing(&[
            "repo",
            "repo/a",
            "repo/a/b",
            "  deep.c current 1",
            "repo/a/b/c",
            "repo/d",
            "  top.c current 1",
        ]);

        let root = build_tree(&lines, &PathTranslation::Native).unwrap().unwrap();
        assert_eq!(names(root.directories()), vec!["a", "d"]);

        let a = root.child("a").unwrap();
        let b = a.child("b").unwrap();
        assert_eq!(names(b.files()), vec!["deep.c"]);
        assert_eq!(b.child("c").unwrap().full_path, "repo/a/b/c");
        assert_eq!(names(root.child("d").unwrap().files()), vec!["top.c"]);
    }

    #[test]
    fn test_sibling_with_shared_name_prefix_is_not_a_child() {
        // "repo/ab" starts with "repo/a" but not with "repo/a/"
        let lines = listing(&["repo", "repo/a", "repo/ab"]);

        let root = build_tree(&lines, &PathTranslation::Native).unwrap().unwrap();
        assert_eq!(names(root.directories()), vec!["a", "ab"]);
        assert!(root.child("a").unwrap().children.is_empty());
    }

    #[test]
    fn test_files_and_directories_keep_listing_order() {
        let lines = listing(&["repo", "  first.txt current 1", "repo/dir", "repo/dir2"]);

        let root = build_tree(&lines, &PathTranslation::Native).unwrap().unwrap();
        assert_eq!(names(root.children.iter()), vec!["first.txt", "dir", "dir2"]);
    }

    #[test]
    fn test_short_listing_is_not_found() {
        let empty: Vec<String> = Vec::new();
        assert!(build_tree(&empty, &PathTranslation::Native).unwrap().is_none());
        assert!(build_tree(&["Total 0 files"], &PathTranslation::Native)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_file_before_directory_is_rejected() {
        let lines = listing(&["  orphan.txt current 1", "repo"]);
        let err = build_tree(&lines, &PathTranslation::Native).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_directory_outside_root_is_rejected() {
        let lines = listing(&["repoA/sub", "repoA/sub/x", "repoB"]);
        let err = build_tree(&lines, &PathTranslation::Native).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
        assert!(err.to_string().contains("repoB"));
    }

    #[test]
    fn test_branch_translation() {
        let translation = PathTranslation::Branch {
            repository: "repoA".to_string(),
            branch: "branchName".to_string(),
            root: "repoA/base".to_string(),
        };
        let lines = listing(&[
            "repoA/base",
            "repoA/base/sub",
            "  file1.txt current 2",
            "repoA/base/sub2",
        ]);

        let root = build_tree(&lines, &translation).unwrap().unwrap();
        assert_eq!(root.full_path, "repoA:branchName");
        assert_eq!(root.name, "repoA:branchName");

        let sub = root.child("sub").unwrap();
        assert_eq!(sub.full_path, "repoA:branchName/sub");
        assert_eq!(
            sub.files().next().unwrap().full_path,
            "repoA:branchName/sub/file1.txt"
        );
        assert_eq!(root.child("sub2").unwrap().full_path, "repoA:branchName/sub2");
    }

    #[test]
    fn test_branch_translation_falls_back_to_repository() {
        let translation = PathTranslation::Branch {
            repository: "repoA/base".to_string(),
            branch: "feature".to_string(),
            root: "elsewhere".to_string(),
        };
        assert_eq!(
            translation.translate("repoA/base/src").unwrap(),
            "repoA/base:feature/src"
        );
    }

    #[test]
    fn test_branch_translation_rejects_foreign_paths() {
        let translation = PathTranslation::Branch {
            repository: "repoA".to_string(),
            branch: "feature".to_string(),
            root: "repoA/base".to_string(),
        };
        assert!(matches!(
            translation.translate("repoB/base"),
            Err(Error::Parse(_))
        ));
        // A shared name prefix is not a path prefix
        assert!(translation.translate("repoAB").is_err());
    }

    #[test]
    fn test_current_file_name() {
        assert_eq!(current_file_name("  a.txt current 1"), Some("a.txt"));
        assert_eq!(current_file_name("  a.txt old 1"), None);
        assert_eq!(current_file_name(" current 1"), None);
        assert_eq!(current_file_name("   current 1"), None);
        assert_eq!(current_file_name("  a.txt current"), Some("a.txt"));
        assert_eq!(current_file_name("  a.txt current  \t"), Some("a.txt"));
        assert_eq!(current_file_name("  a.txt notcurrent"), None);
        assert_eq!(current_file_name(" current"), None);
    }
}

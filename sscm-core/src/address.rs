//! Composite address parsing
//!
//! Callers address Surround content with a single string:
//! - `repo` - a repository root on its mainline
//! - `repo/sub/path` - a directory inside a repository
//! - `repo:branch` - the root of an explicit branch
//! - `repo:branch/sub/path` - a directory inside an explicit branch
//! - `""` - the top level, i.e. every repository

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// A parsed repository/branch/sub-path address
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    repository: String,
    /// Only set when the address named a branch after a colon
    branch: Option<String>,
    /// Stored without a leading slash and with exactly one trailing slash
    sub_path: Option<String>,
}

impl Address {
    /// Parse a composite address string
    ///
    /// Parsing never fails; an empty string yields the top-level address.
    pub fn parse(input: &str) -> Self {
        if input.is_empty() {
            return Self::default();
        }

        if let Some(colon) = input.find(':') {
            let repository = input[..colon].to_string();
            let rest = &input[colon + 1..];

            let (branch, sub_path) = match rest.find('/') {
                None => (rest, None),
                Some(slash) => (&rest[..slash], Some(normalize_sub_path(&rest[slash + 1..]))),
            };

            return Self {
                repository,
                branch: (!branch.is_empty()).then(|| branch.to_string()),
                sub_path,
            };
        }

        match input.split_once('/') {
            None => Self {
                repository: input.to_string(),
                branch: None,
                sub_path: None,
            },
            Some((repository, rest)) => Self {
                repository: repository.to_string(),
                branch: None,
                sub_path: Some(normalize_sub_path(rest)),
            },
        }
    }

    /// The repository component; empty for the top-level address
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// The branch to pass to the client, falling back to the repository name
    pub fn branch(&self) -> &str {
        self.branch.as_deref().unwrap_or(&self.repository)
    }

    /// The sub-path to pass to the client, falling back to `/`
    pub fn path(&self) -> &str {
        self.sub_path.as_deref().unwrap_or("/")
    }

    /// The sub-path without leading or trailing slashes
    pub fn display_path(&self) -> &str {
        self.path().trim_matches('/')
    }

    /// True for the synthetic root of all repositories
    pub fn is_top_level(&self) -> bool {
        self.repository.is_empty()
    }

    /// True when a branch was named explicitly after a colon
    ///
    /// `repo` and `repo:repo` resolve to the same branch, but only the latter
    /// is an explicit branch and gets branch-root path translation.
    pub fn is_explicit_branch(&self) -> bool {
        self.branch.is_some()
    }
}

fn normalize_sub_path(raw: &str) -> String {
    format!("{}/", raw.trim_matches('/'))
}

impl From<&str> for Address {
    fn from(input: &str) -> Self {
        Self::parse(input)
    }
}

impl FromStr for Address {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repository)?;
        if let Some(ref branch) = self.branch {
            write!(f, ":{}", branch)?;
        }
        let sub = self.display_path();
        if !sub.is_empty() {
            write!(f, "/{}", sub)?;
        }
        Ok(())
    }
}

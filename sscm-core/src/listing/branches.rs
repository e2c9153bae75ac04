//! Branch list and branch property parsing

use crate::{Error, Result};

/// Property in `sscm bp` output naming the path a branch was created from
const CREATED_FROM_KEY: &str = "Created from path";

/// Suffix `sscm lsbranch` prints after a repository's mainline
const MAINLINE_SUFFIX: &str = "(mainline)";

/// One line of `sscm lsbranch` output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchEntry {
    /// The repository's own mainline
    Mainline,
    /// A named branch; its root path must be looked up separately
    Named(String),
}

impl BranchEntry {
    /// Classify a branch list line such as `Feature (workspace)`
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let is_mainline = line
            .get(line.len().saturating_sub(MAINLINE_SUFFIX.len())..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(MAINLINE_SUFFIX));
        if is_mainline {
            return Self::Mainline;
        }

        let name = line.rfind(" (").map_or(line, |idx| &line[..idx]);
        Self::Named(name.to_string())
    }
}

/// Find a branch's native root path in `sscm bp` output
///
/// Properties are `key: value` lines; the key is matched case-insensitively.
pub fn parse_branch_root<S: AsRef<str>>(properties: &[S], branch: &str) -> Result<String> {
    properties
        .iter()
        .filter_map(|line| AsRef::<str>::as_ref(line).split_once(':'))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case(CREATED_FROM_KEY))
        .map(|(_, value)| value.trim_start().to_string())
        .ok_or_else(|| {
            Error::Config(format!(
                "Could not determine root path of '{}' branch.",
                branch
            ))
        })
}

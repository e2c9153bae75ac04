//! Listing output parsers
//!
//! Turns the text printed by `sscm ls`, `sscm lsbranch` and `sscm bp` into
//! typed values.

mod branches;
mod tree;

pub use branches::{parse_branch_root, BranchEntry};
pub use tree::{build_tree, PathTranslation, TreeNode};

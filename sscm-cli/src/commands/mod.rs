//! CLI command implementations

pub mod fetch;
pub mod label;
pub mod ls;
pub mod releases;

pub use fetch::{CatArgs, GetArgs, GetLabeledArgs};
pub use label::LabelArgs;
pub use ls::LsArgs;
pub use releases::ReleasesArgs;

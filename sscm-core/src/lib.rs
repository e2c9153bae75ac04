//! Sscm Core - Drive the Surround SCM command line client
//!
//! This crate runs `sscm` as a subprocess, captures its output, and rebuilds
//! repository/branch/directory trees from its flat recursive listings.

pub mod address;
pub mod client;
pub mod config;
pub mod error;
pub mod listing;
pub mod process;

#[cfg(test)]
mod testing;

pub use address::Address;
pub use client::SurroundClient;
pub use config::{Config, ReleaseFilter, ServerConfig, ServerOverrides};
pub use error::{Error, Result};
pub use listing::{PathTranslation, TreeNode};
pub use process::{CommandRunner, Invocation, SscmRunner};

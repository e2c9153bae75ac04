//! Process module for running the sscm command line client

mod invocation;
mod runner;

pub use invocation::Invocation;
pub use runner::{credential_args, CommandRunner, SscmRunner};

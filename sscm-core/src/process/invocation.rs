//! A single sscm command to run

use std::path::PathBuf;

/// One call of the sscm client: a command verb plus its arguments
///
/// The executable and the credential flags belong to the runner, so the same
/// invocation can be replayed against any configured server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Command verb, e.g. `get` or `ls`
    pub command: String,
    /// Arguments in the order they are passed to the client
    pub args: Vec<String>,
    /// Directory to run the client in
    pub working_dir: Option<PathBuf>,
    /// Whether stdout lines are collected and returned
    pub capture_output: bool,
}

impl Invocation {
    /// An invocation whose stdout lines are returned
    pub fn capture<I, S>(command: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: command.into(),
            args: args.into_iter().map(Into::into).collect(),
            working_dir: None,
            capture_output: true,
        }
    }

    /// An invocation whose stdout is discarded
    pub fn silent<I, S>(command: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            capture_output: false,
            ..Self::capture(command, args)
        }
    }

    /// Run the client in a specific directory
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture() {
        let inv = Invocation::capture("ls", ["/", "-r"]);
        assert_eq!(inv.command, "ls");
        assert_eq!(inv.args, vec!["/", "-r"]);
        assert!(inv.capture_output);
        assert!(inv.working_dir.is_none());
    }

    #[test]
    fn test_silent_in_dir() {
        let inv = Invocation::silent("get", vec!["/".to_string()]).in_dir("/tmp");
        assert!(!inv.capture_output);
        assert_eq!(inv.working_dir, Some(PathBuf::from("/tmp")));
    }
}

//! Subprocess execution for the sscm client

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;

use crate::config::ServerConfig;
use crate::{Error, Result};

use super::invocation::Invocation;

/// Trait for anything that can execute sscm invocations
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run an invocation to completion
    ///
    /// Returns the non-empty stdout lines in order (empty when the invocation
    /// does not capture output). A non-zero exit yields
    /// [`Error::ExternalTool`] carrying the captured stderr text.
    async fn run(&self, invocation: Invocation) -> Result<Vec<String>>;
}

/// Build the server and user flags appended to every command
///
/// The password only ever travels as a suffix of the user flag, so a password
/// configured without a user name is not sent at all.
pub fn credential_args(config: &ServerConfig) -> Vec<String> {
    let mut args = Vec::new();

    if !config.server.is_empty() {
        args.push(format!("-z{}", config.server_with_port()));
    }

    if !config.username.is_empty() {
        if config.password.is_empty() {
            args.push(format!("-y{}", config.username));
        } else {
            args.push(format!("-y{}:{}", config.username, config.password));
        }
    }

    args
}

/// Runs invocations against the configured sscm executable
///
/// There is no timeout: a client that never exits blocks the caller.
#[derive(Debug, Clone)]
pub struct SscmRunner {
    config: ServerConfig,
}

impl SscmRunner {
    /// Create a runner for the given server settings
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Get the server settings
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Full argument vector: command, its arguments, then credentials
    fn argv(&self, invocation: &Invocation, config: &ServerConfig) -> Vec<String> {
        let mut argv = Vec::with_capacity(invocation.args.len() + 3);
        argv.push(invocation.command.clone());
        argv.extend(invocation.args.iter().cloned());
        argv.extend(credential_args(config));
        argv
    }

    /// Quoted command line for logs, with the password masked
    pub fn display_command_line(&self, invocation: &Invocation) -> String {
        let mut masked = self.config.clone();
        if !masked.password.is_empty() {
            masked.password = "****".to_string();
        }

        let mut line = self.config.exe_path.clone();
        let mut argv = self.argv(invocation, &masked).into_iter();
        if let Some(command) = argv.next() {
            line.push(' ');
            line.push_str(&command);
        }
        for arg in argv {
            line.push_str(&format!(" \"{}\"", arg));
        }
        line
    }

    fn build_command(&self, invocation: &Invocation) -> Command {
        let mut cmd = Command::new(&self.config.exe_path);
        cmd.args(self.argv(invocation, &self.config))
            .stdin(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if invocation.capture_output {
            cmd.stdout(Stdio::piped());
        } else {
            cmd.stdout(Stdio::null());
        }

        if let Some(ref dir) = invocation.working_dir {
            cmd.current_dir(dir);
        }

        cmd
    }
}

#[async_trait]
impl CommandRunner for SscmRunner {
    async fn run(&self, invocation: Invocation) -> Result<Vec<String>> {
        let mut cmd = self.build_command(&invocation);

        tracing::debug!(
            command_line = %self.display_command_line(&invocation),
            working_dir = ?invocation.working_dir,
            "Executing sscm"
        );
        tracing::info!("Running sscm...");

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::ToolNotFound(self.config.exe_path.clone())
            } else {
                Error::Io(e)
            }
        })?;

        // Both pipes are drained while the process runs so neither can fill up
        let stdout_task = child.stdout.take().map(|stdout| tokio::spawn(read_lines(stdout)));
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::Io(std::io::Error::other("sscm stderr was not piped")))?;
        let stderr_task = tokio::spawn(read_lines(stderr));

        let status = child.wait().await?;

        let output = match stdout_task {
            Some(task) => join_reader(task).await?,
            None => Vec::new(),
        };
        let error_text = join_reader(stderr_task).await?.join("\n");

        tracing::debug!(status = %status, "sscm has exited");

        if !status.success() {
            return Err(Error::ExternalTool(error_text));
        }

        Ok(output.into_iter().filter(|line| !line.is_empty()).collect())
    }
}

/// Read a stream to EOF as lines, decoding lossily and dropping line endings
async fn read_lines<R>(reader: R) -> std::io::Result<Vec<String>>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut lines = Vec::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let bytes_read = reader.read_until(b'\n', &mut buf).await?;
        if bytes_read == 0 {
            // EOF
            break;
        }

        let line = String::from_utf8_lossy(&buf);
        lines.push(line.trim_end_matches(['\n', '\r']).to_string());
    }

    Ok(lines)
}

async fn join_reader(task: JoinHandle<std::io::Result<Vec<String>>>) -> Result<Vec<String>> {
    task.await
        .map_err(|e| Error::Io(std::io::Error::other(e)))?
        .map_err(Error::Io)
}

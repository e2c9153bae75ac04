//! Scripted command runner for tests

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::process::{CommandRunner, Invocation};
use crate::{Error, Result};

/// Canned response to one invocation
#[derive(Debug, Clone)]
pub enum Reply {
    /// Succeed with these stdout lines
    Lines(Vec<String>),
    /// Exit non-zero with this stderr text
    Fail(String),
    /// Succeed after writing a file into the `-d` destination
    WriteFile { name: String, contents: Vec<u8> },
}

/// Runner that replays replies in order and records every invocation
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<Invocation>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, lines: &[&str]) -> Self {
        self.push(Reply::Lines(lines.iter().map(|l| l.to_string()).collect()))
    }

    pub fn fail(self, stderr: &str) -> Self {
        self.push(Reply::Fail(stderr.to_string()))
    }

    pub fn write_file(self, name: &str, contents: &[u8]) -> Self {
        self.push(Reply::WriteFile {
            name: name.to_string(),
            contents: contents.to_vec(),
        })
    }

    fn push(self, reply: Reply) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    /// Every invocation received so far
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    /// Command verb and arguments of every invocation, flattened
    pub fn command_lines(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .map(|inv| std::iter::once(inv.command).chain(inv.args).collect())
            .collect()
    }
}

/// Value of the `-d` destination argument
pub fn destination_arg(invocation: &Invocation) -> Option<&str> {
    invocation.args.iter().find_map(|a| a.strip_prefix("-d"))
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, invocation: Invocation) -> Result<Vec<String>> {
        self.calls.lock().unwrap().push(invocation.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Reply::Lines(Vec::new()));

        match reply {
            Reply::Lines(lines) if invocation.capture_output => Ok(lines),
            Reply::Lines(_) => Ok(Vec::new()),
            Reply::Fail(stderr) => Err(Error::ExternalTool(stderr)),
            Reply::WriteFile { name, contents } => {
                let dir = destination_arg(&invocation)
                    .ok_or_else(|| Error::InvalidArgument("no -d argument".to_string()))?;
                std::fs::write(Path::new(dir).join(name), contents)?;
                Ok(Vec::new())
            }
        }
    }
}

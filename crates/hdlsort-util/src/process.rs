use std::collections::BTreeMap;
use std::process::{Command, ExitStatus};

use crate::errors::HdlSortError;

/// An external command, usually a per-file shell line built from an
/// `--execute` template.
pub struct CommandBuilder {
    program: String,
    args: Vec<String>,
    env: BTreeMap<String, String>,
}

impl CommandBuilder {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
        }
    }

    /// Run `command_line` through the platform shell.
    pub fn shell(command_line: impl Into<String>) -> Self {
        if cfg!(windows) {
            Self::new("cmd").arg("/C").arg(command_line)
        } else {
            Self::new("sh").arg("-c").arg(command_line)
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Set an environment variable for the child process.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Run with inherited stdio and wait. Only a failure to spawn is an
    /// error; a non-zero exit is returned to the caller.
    pub fn run(&self) -> Result<ExitStatus, HdlSortError> {
        tracing::debug!(program = %self.program, args = ?self.args, "spawn");
        Command::new(&self.program)
            .args(&self.args)
            .envs(&self.env)
            .status()
            .map_err(|e| HdlSortError::Command {
                message: format!("{}: {e}", self.program),
            })
    }
}

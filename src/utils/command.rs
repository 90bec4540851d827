//! Command execution utilities

use crate::error::{PatchnovaError, Result};
use std::fmt;
use std::process::{Command, Stdio};

/// A program plus its argument vector, executed without a shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Prefix the command with an elevation helper such as `sudo`
    pub fn elevated(self, helper: Option<&str>) -> Self {
        match helper.map(str::trim).filter(|h| !h.is_empty()) {
            Some(helper) => {
                let mut args = Vec::with_capacity(self.args.len() + 1);
                args.push(self.program);
                args.extend(self.args);
                Self {
                    program: helper.to_string(),
                    args,
                }
            }
            None => self,
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Executes external commands on behalf of the update and inventory actions
pub trait CommandRunner {
    /// Run to completion with the terminal attached; fail on non-zero exit
    fn run(&self, spec: &CommandSpec) -> Result<()>;

    /// Run to completion and return stdout; stderr is captured and discarded
    fn capture(&self, spec: &CommandSpec) -> Result<String>;
}

/// Runs commands as real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> Result<()> {
        tracing::debug!(command = %spec, "running command");
        let status = Command::new(&spec.program)
            .args(&spec.args)
            .status()
            .map_err(|source| PatchnovaError::Spawn {
                command: spec.to_string(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(PatchnovaError::CommandFailed {
                command: spec.to_string(),
                code: status.code(),
            })
        }
    }

    fn capture(&self, spec: &CommandSpec) -> Result<String> {
        tracing::debug!(command = %spec, "capturing command output");
        if !command_exists(&spec.program) {
            return Err(PatchnovaError::Detection(format!(
                "'{}' was not found in PATH",
                spec.program
            )));
        }
        let output = Command::new(&spec.program)
            .args(&spec.args)
            .stdin(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| PatchnovaError::Spawn {
                command: spec.to_string(),
                source,
            })?;

        if !output.stderr.is_empty() {
            tracing::trace!(
                command = %spec,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "discarding stderr"
            );
        }

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(PatchnovaError::CommandFailed {
                command: spec.to_string(),
                code: output.status.code(),
            })
        }
    }
}

/// Execute a command and return stdout as a trimmed String
pub fn run_command(program: &str, args: &[&str]) -> Result<String> {
    SystemRunner
        .capture(&CommandSpec::new(program, args.iter().copied()))
        .map(|out| out.trim().to_string())
}

/// Check if a command exists in PATH
pub fn command_exists(program: &str) -> bool {
    let Some(path) = std::env::var_os("PATH") else {
        return false;
    };

    std::env::split_paths(&path).any(|dir| {
        let candidate = dir.join(program);
        if candidate.is_file() {
            return true;
        }
        cfg!(windows)
            && ["exe", "cmd", "bat"]
                .iter()
                .any(|ext| candidate.with_extension(ext).is_file())
    })
}

/// Whether the process already runs with administrative rights
pub fn is_elevated() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid has no preconditions and cannot fail.
        unsafe { libc::geteuid() == 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}

use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use crate::error::{Result, CaprenderError};

/// Abstract external tool invocation
#[derive(Debug, Clone)]
pub struct ToolCommand {
    pub binary: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub description: String,
}

impl ToolCommand {
    /// Create a new tool command
    pub fn new<S1: Into<String>, S2: Into<String>>(binary: S1, description: S2) -> Self {
        Self {
            binary: binary.into(),
            args: Vec::new(),
            working_dir: None,
            description: description.into(),
        }
    }

    /// Add an argument
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(|s| s.into()));
        self
    }

    /// Run the tool from the given directory
    pub fn working_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.working_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Execute the command, blocking until the tool exits. Non-zero exit
    /// status is fatal; the tool's stderr is surfaced in the error.
    pub fn execute(&self) -> Result<()> {
        debug!("Executing tool command: {} {:?}", self.binary, self.args);
        debug!("Description: {}", self.description);

        let mut cmd = Command::new(&self.binary);
        cmd.args(&self.args);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output()
            .map_err(|e| CaprenderError::Tool(format!(
                "Failed to execute {}: {}", self.binary, e
            )))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CaprenderError::Tool(format!(
                "{} failed: {}",
                self.description,
                stderr.trim()
            )));
        }

        Ok(())
    }

    /// Execute without treating failure as fatal; returns whether the tool
    /// reported success. Used for best-effort invocations.
    pub fn execute_best_effort(&self) -> bool {
        debug!("Executing best-effort tool command: {} {:?}", self.binary, self.args);

        let mut cmd = Command::new(&self.binary);
        cmd.args(&self.args);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        matches!(cmd.output(), Ok(output) if output.status.success())
    }
}

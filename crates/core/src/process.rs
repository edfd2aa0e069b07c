//! Process execution utilities
//!
//! Command lookup and output capture for the toolchain probes run by the doctor.

use crate::error::{Error, Result};
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

/// Result of a command execution
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Whether the command succeeded (exit code 0)
    pub success: bool,
    /// Exit code of the command
    pub exit_code: i32,
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
}

impl CommandResult {
    /// Create from `std::process::Output`
    #[must_use]
    pub fn from_output(output: &Output) -> Self {
        Self {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    /// First non-empty line of stdout, falling back to stderr.
    ///
    /// Some tools (`java -version`) print their version on stderr.
    #[must_use]
    pub fn first_line(&self) -> Option<&str> {
        self.stdout
            .lines()
            .chain(self.stderr.lines())
            .map(str::trim)
            .find(|l| !l.is_empty())
    }
}

/// Run a command and capture output
pub fn run_command(program: &str, args: &[&str]) -> Result<CommandResult> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| Error::process(format!("Failed to execute {program}: {e}")).with_source(e))?;

    Ok(CommandResult::from_output(&output))
}

/// Check if a command exists in PATH
#[must_use]
pub fn command_exists(program: &str) -> bool {
    which::which(program).is_ok()
}

/// Get the path to a command
#[must_use]
pub fn which_command(program: &str) -> Option<PathBuf> {
    which::which(program).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_command_exists_sh() {
        assert!(command_exists("sh"));
        assert!(which_command("sh").is_some());
    }

    #[test]
    fn test_command_exists_nonexistent() {
        assert!(!command_exists("nonexistent_command_12345"));
        assert!(which_command("nonexistent_command_12345").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_command_echo() {
        let result = run_command("echo", &["hello"]).unwrap();
        assert!(result.success);
        assert_eq!(result.first_line(), Some("hello"));
    }

    #[test]
    fn test_run_missing_command_is_process_error() {
        let err = run_command("nonexistent_command_12345", &[]).unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::ProcessError);
    }

    #[test]
    fn test_first_line_falls_back_to_stderr() {
        let result = CommandResult {
            success: true,
            exit_code: 0,
            stdout: "\n".to_string(),
            stderr: "openjdk version \"17.0.2\"\nmore".to_string(),
        };
        assert_eq!(result.first_line(), Some("openjdk version \"17.0.2\""));
    }
}

//! Health check system for verifying tool dependencies and environment
//!
//! Provides health checks for:
//! - Required tools (flutter, java, ...)
//! - Environment configuration
//! - File system layout

use crate::env::{EnvSource, ProcessEnv};
use crate::process::{command_exists, run_command};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Health check status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// All checks passed
    Healthy,
    /// Some optional checks failed
    Degraded,
    /// Required checks failed
    Unhealthy,
}

impl HealthStatus {
    /// Returns true if status is healthy
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }

    /// Returns true if status is healthy or degraded (still operational)
    #[must_use]
    pub fn is_operational(&self) -> bool {
        matches!(self, HealthStatus::Healthy | HealthStatus::Degraded)
    }
}

/// Individual health check result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// Name of the check
    pub name: String,
    /// Status of the check
    pub status: HealthStatus,
    /// Optional message with details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Duration of the check in milliseconds
    pub duration_ms: u64,
    /// Additional details as key-value pairs
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, String>,
}

impl CheckResult {
    fn with_status(name: impl Into<String>, status: HealthStatus, message: Option<String>) -> Self {
        Self {
            name: name.into(),
            status,
            message,
            duration_ms: 0,
            details: BTreeMap::new(),
        }
    }

    /// Create a healthy check result
    pub fn healthy(name: impl Into<String>) -> Self {
        Self::with_status(name, HealthStatus::Healthy, None)
    }

    /// Create an unhealthy check result with a message
    pub fn unhealthy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_status(name, HealthStatus::Unhealthy, Some(message.into()))
    }

    /// Create a degraded check result with a message
    pub fn degraded(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_status(name, HealthStatus::Degraded, Some(message.into()))
    }

    /// Set the duration of the check
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = duration.as_millis() as u64;
        self
    }

    /// Add a detail key-value pair
    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

/// Overall health report containing all check results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    /// Overall status based on all checks
    pub status: HealthStatus,
    /// Individual check results
    pub checks: Vec<CheckResult>,
    /// Total duration of all checks in milliseconds
    pub total_duration_ms: u64,
    /// Timestamp when the report was generated
    pub timestamp: String,
    /// Version of the tool
    pub version: String,
}

impl HealthReport {
    /// Create a new health report from check results
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(checks: Vec<CheckResult>, duration: Duration) -> Self {
        let status = if checks.iter().all(|c| c.status == HealthStatus::Healthy) {
            HealthStatus::Healthy
        } else if checks.iter().any(|c| c.status == HealthStatus::Unhealthy) {
            HealthStatus::Unhealthy
        } else {
            HealthStatus::Degraded
        };

        Self {
            status,
            checks,
            total_duration_ms: duration.as_millis() as u64,
            timestamp: chrono::Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Returns true if overall status is healthy
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status.is_healthy()
    }

    /// Get all checks that failed (not healthy)
    #[must_use]
    pub fn failed_checks(&self) -> Vec<&CheckResult> {
        self.checks
            .iter()
            .filter(|c| !c.status.is_healthy())
            .collect()
    }
}

/// Trait for implementing health checks
pub trait HealthCheck: Send + Sync {
    /// Perform the health check and return a result
    fn check(&self) -> CheckResult;
}

/// Health checker with configurable checks
#[derive(Default)]
pub struct HealthChecker {
    checks: Vec<Box<dyn HealthCheck>>,
}

impl HealthChecker {
    /// Create a new health checker with no checks
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a health check
    #[must_use]
    pub fn add_check(mut self, check: impl HealthCheck + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Number of registered checks
    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Whether no checks are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Run all health checks
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn run(&self) -> HealthReport {
        let start = Instant::now();
        let mut results = Vec::with_capacity(self.checks.len());

        for check in &self.checks {
            let check_start = Instant::now();
            let mut result = check.check();
            result.duration_ms = check_start.elapsed().as_millis() as u64;
            tracing::debug!(check = %result.name, status = ?result.status, "Health check finished");
            results.push(result);
        }

        HealthReport::new(results, start.elapsed())
    }
}

/// Check if a command is available
pub struct CommandCheck {
    command: String,
    version_arg: Option<String>,
    required: bool,
}

impl CommandCheck {
    /// Create a required command check
    pub fn new(command: impl Into<String>, version_arg: Option<&str>) -> Self {
        Self {
            command: command.into(),
            version_arg: version_arg.map(String::from),
            required: true,
        }
    }

    /// Create an optional command check (degraded if missing, not unhealthy)
    pub fn optional(command: impl Into<String>, version_arg: Option<&str>) -> Self {
        Self {
            required: false,
            ..Self::new(command, version_arg)
        }
    }
}

impl HealthCheck for CommandCheck {
    fn check(&self) -> CheckResult {
        if !command_exists(&self.command) {
            return if self.required {
                CheckResult::unhealthy(&self.command, format!("{} is not installed", self.command))
            } else {
                CheckResult::degraded(
                    &self.command,
                    format!("{} is not installed (optional)", self.command),
                )
            };
        }

        let Some(arg) = &self.version_arg else {
            return CheckResult::healthy(&self.command);
        };

        match run_command(&self.command, &[arg]) {
            Ok(output) if output.success => {
                let version = output.first_line().unwrap_or_default().to_string();
                CheckResult::healthy(&self.command).with_detail("version", version)
            }
            _ => CheckResult::healthy(&self.command),
        }
    }
}

/// Check if an environment variable is set
pub struct EnvVarCheck<E = ProcessEnv> {
    var_name: String,
    required: bool,
    env: E,
}

impl EnvVarCheck {
    /// Create a required environment variable check
    pub fn new(var_name: impl Into<String>) -> Self {
        Self::with_env(var_name, ProcessEnv)
    }

    /// Create an optional environment variable check
    pub fn optional(var_name: impl Into<String>) -> Self {
        Self {
            required: false,
            ..Self::new(var_name)
        }
    }
}

impl<E: EnvSource> EnvVarCheck<E> {
    /// Required check against a specific environment
    pub fn with_env(var_name: impl Into<String>, env: E) -> Self {
        Self {
            var_name: var_name.into(),
            required: true,
            env,
        }
    }

    /// Optional check against a specific environment
    pub fn optional_with_env(var_name: impl Into<String>, env: E) -> Self {
        Self {
            required: false,
            ..Self::with_env(var_name, env)
        }
    }
}

impl<E: EnvSource + Send + Sync> HealthCheck for EnvVarCheck<E> {
    fn check(&self) -> CheckResult {
        match self.env.non_empty_var(&self.var_name) {
            Some(value) => CheckResult::healthy(&self.var_name).with_detail("value", value),
            None if self.required => {
                CheckResult::unhealthy(&self.var_name, format!("{} is not set", self.var_name))
            }
            None => CheckResult::degraded(
                &self.var_name,
                format!("{} is not set (optional)", self.var_name),
            ),
        }
    }
}

/// Check that a directory exists
pub struct DirectoryCheck {
    name: String,
    path: PathBuf,
}

impl DirectoryCheck {
    /// Create a check named `name` for `path`
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

impl HealthCheck for DirectoryCheck {
    fn check(&self) -> CheckResult {
        let display = self.path.display().to_string();
        if self.path.is_dir() {
            CheckResult::healthy(&self.name).with_detail("path", display)
        } else if self.path.exists() {
            CheckResult::unhealthy(&self.name, format!("{display} is not a directory"))
        } else {
            CheckResult::unhealthy(&self.name, format!("{display} does not exist"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MapEnv;

    #[test]
    fn test_command_check_optional() {
        let check = CommandCheck::optional("nonexistent_command_12345", None);
        let result = check.check();
        // Should be degraded, not unhealthy
        assert_eq!(result.status, HealthStatus::Degraded);
    }

    #[test]
    fn test_command_check_required_missing() {
        let result = CommandCheck::new("nonexistent_command_12345", Some("--version")).check();
        assert_eq!(result.status, HealthStatus::Unhealthy);
    }

    #[test]
    fn test_env_var_check() {
        let env = MapEnv::new().with("ANDROID_HOME", "/opt/android");
        let result = EnvVarCheck::with_env("ANDROID_HOME", env).check();
        assert!(result.status.is_healthy());
        assert_eq!(result.details.get("value").map(String::as_str), Some("/opt/android"));

        let missing = EnvVarCheck::with_env("ANDROID_HOME", MapEnv::new()).check();
        assert_eq!(missing.status, HealthStatus::Unhealthy);
    }

    #[test]
    fn test_directory_check() {
        let dir = tempfile::tempdir().unwrap();
        assert!(DirectoryCheck::new("dir", dir.path()).check().status.is_healthy());

        let missing = DirectoryCheck::new("dir", dir.path().join("missing")).check();
        assert_eq!(missing.status, HealthStatus::Unhealthy);
        assert!(missing.message.unwrap().contains("does not exist"));
    }

    #[test]
    fn test_health_report() {
        let checks = vec![CheckResult::healthy("check1"), CheckResult::healthy("check2")];
        let report = HealthReport::new(checks, Duration::from_millis(100));
        assert!(report.is_healthy());
        assert!(report.failed_checks().is_empty());
    }

    #[test]
    fn test_health_report_degraded() {
        let checks = vec![
            CheckResult::healthy("check1"),
            CheckResult::degraded("check2", "optional"),
        ];
        let report = HealthReport::new(checks, Duration::from_millis(100));
        assert_eq!(report.status, HealthStatus::Degraded);
        assert!(report.status.is_operational());
    }

    #[test]
    fn test_health_report_with_failure() {
        let checks = vec![
            CheckResult::healthy("check1"),
            CheckResult::unhealthy("check2", "Failed"),
        ];
        let report = HealthReport::new(checks, Duration::from_millis(100));
        assert!(!report.is_healthy());
        assert_eq!(report.status, HealthStatus::Unhealthy);
        assert_eq!(report.failed_checks().len(), 1);
    }

    #[test]
    fn test_checker_runs_all_checks() {
        let report = HealthChecker::new()
            .add_check(EnvVarCheck::with_env("A", MapEnv::new().with("A", "1")))
            .add_check(CommandCheck::optional("nonexistent_command_12345", None))
            .run();
        assert_eq!(report.checks.len(), 2);
        assert_eq!(report.status, HealthStatus::Degraded);
    }
}

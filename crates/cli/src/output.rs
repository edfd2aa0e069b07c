//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output. Status lines go to stdout,
//! warnings and errors to stderr. Colors are applied only when the target
//! stream supports them and `owo_colors::set_override(false)` has not been called.

use flutterenv_core::health::{HealthReport, HealthStatus};
use owo_colors::{OwoColorize, Stream};
use std::time::Duration;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".if_supports_color(Stream::Stdout, |t| t.green()), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".if_supports_color(Stream::Stderr, |t| t.red()), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".if_supports_color(Stream::Stderr, |t| t.yellow()), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".if_supports_color(Stream::Stdout, |t| t.blue()), message);
    }

    /// Print an indented detail line under the previous status
    pub fn detail(label: &str, value: &str) {
        let label = format!("{label}:");
        println!("    {} {}", label.if_supports_color(Stream::Stdout, |t| t.dimmed()), value);
    }

    /// Print an indented detail line under an error, on stderr
    pub fn error_detail(label: &str, value: &str) {
        let label = format!("{label}:");
        eprintln!("    {} {}", label.if_supports_color(Stream::Stderr, |t| t.dimmed()), value);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.if_supports_color(Stream::Stdout, |t| t.bold()));
        println!("{}", "─".repeat(message.chars().count()));
    }
}

/// Print every check of a health report followed by a summary line
pub fn print_health_report(report: &HealthReport) {
    for check in &report.checks {
        let line = match &check.message {
            Some(message) => format!("{}: {}", check.name, message),
            None => check.name.clone(),
        };
        match check.status {
            HealthStatus::Healthy => Status::success(&line),
            HealthStatus::Degraded => Status::warning(&line),
            HealthStatus::Unhealthy => Status::error(&line),
        }
        for (key, value) in &check.details {
            Status::detail(key, value);
        }
    }

    println!();
    let failed = report.failed_checks().len();
    let summary = format!(
        "{} run, {} in {}",
        format_count(report.checks.len(), "check", "checks"),
        format_count(failed, "issue", "issues"),
        format_duration(Duration::from_millis(report.total_duration_ms)),
    );
    match report.status {
        HealthStatus::Healthy => Status::success(&summary),
        HealthStatus::Degraded => Status::warning(&summary),
        HealthStatus::Unhealthy => Status::error(&summary),
    }
}

/// Format a duration for display
#[allow(clippy::cast_precision_loss)]
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f32();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs % 60.0;
        format!("{}m {:.0}s", mins, remaining_secs)
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

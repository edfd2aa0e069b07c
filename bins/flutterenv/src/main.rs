//! flutterenv CLI
//!
//! Flutter SDK resolution and Gradle settings tooling for Flutter Android projects.

use anyhow::Result;
use clap::{Parser, Subcommand};
use flutterenv_android::settings::SettingsScript;
use flutterenv_android::{doctor, SdkResolver};
use flutterenv_cli::output::{print_health_report, Status};
use flutterenv_core::config::Config;
use flutterenv_core::env::ProcessEnv;
use flutterenv_core::error::{exit_codes, Error};
use flutterenv_telemetry::{TelemetryConfig, Timer};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "flutterenv")]
#[command(about = "Resolve the Flutter SDK and generate Gradle settings for Flutter Android projects")]
#[command(version)]
struct Cli {
    /// Android project directory (where local.properties lives)
    #[arg(short = 'C', long, global = true, default_value = ".", env = "FLUTTERENV_PROJECT_DIR")]
    project_dir: PathBuf,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase output verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Emit log events as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved Flutter SDK path
    Sdk {
        /// Output as JSON, including where the path came from
        #[arg(long)]
        json: bool,
    },

    /// Render settings.gradle.kts
    Settings {
        /// Write the script into the project directory instead of printing it
        #[arg(long, conflicts_with = "check")]
        write: bool,
        /// Fail if the existing script differs from the rendering
        #[arg(long)]
        check: bool,
    },

    /// Diagnose the Flutter Android environment
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }

    flutterenv_telemetry::init_with_config(
        TelemetryConfig::from_verbosity(cli.verbose, cli.quiet).with_json(cli.log_json),
    )?;

    let config = match Config::load(&cli.project_dir, cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => std::process::exit(report_error(&e)),
    };

    let exit_code = match cli.command {
        Commands::Sdk { json } => run_sdk(&cli.project_dir, &config, json),
        Commands::Settings { write, check } => {
            run_settings(&cli.project_dir, &config, write, check, cli.quiet)
        }
        Commands::Doctor { json } => run_doctor(&cli.project_dir, &config, json),
    };

    std::process::exit(exit_code);
}

/// Print an error with its context and suggestion to stderr; returns the exit code
fn report_error(err: &Error) -> i32 {
    tracing::debug!(code = %err.code, "Command failed");
    Status::error(&err.message);
    if let Some(context) = &err.context {
        Status::error_detail("context", context);
    }
    if let Some(suggestion) = &err.suggestion {
        Status::error_detail("hint", suggestion);
    }
    err.exit_code()
}

/// Like [`report_error`], also printing the error as JSON on stdout
fn report_error_json(err: &Error) -> i32 {
    if let Ok(text) = serde_json::to_string_pretty(&serde_json::json!({ "error": err.to_report() })) {
        println!("{text}");
    }
    report_error(err)
}

fn run_sdk(project_dir: &Path, config: &Config, json: bool) -> i32 {
    let resolver = SdkResolver::from_config(project_dir, &config.schema.sdk);
    let timer = Timer::start("sdk.resolve");
    let resolved = resolver.resolve(&ProcessEnv);
    timer.stop();

    let sdk = match resolved {
        Ok(sdk) => sdk,
        Err(e) if json => return report_error_json(&Error::from(e)),
        Err(e) => return report_error(&Error::from(e)),
    };

    if json {
        let included_build = sdk.included_build_path(resolver.included_build());
        let output = serde_json::json!({
            "path": sdk.path,
            "source": sdk.source,
            "included_build": included_build,
        });
        match serde_json::to_string_pretty(&output) {
            Ok(text) => println!("{text}"),
            Err(e) => return report_error(&Error::from(e)),
        }
    } else {
        println!("{}", sdk.path);
    }

    exit_codes::SUCCESS
}

fn run_settings(project_dir: &Path, config: &Config, write: bool, check: bool, quiet: bool) -> i32 {
    let script = match SettingsScript::from_config(&config.schema) {
        Ok(script) => script,
        Err(e) => return report_error(&Error::from(e)),
    };
    let path = SettingsScript::path_in(project_dir);

    if check {
        return match std::fs::read_to_string(&path) {
            Ok(existing) if script.matches(&existing) => {
                if !quiet {
                    Status::success(&format!("{} is up to date", path.display()));
                }
                exit_codes::SUCCESS
            }
            Ok(_) => {
                tracing::warn!(path = %path.display(), "Settings script differs from configuration");
                Status::error(&format!("{} is out of date", path.display()));
                Status::error_detail("hint", "Run `flutterenv settings --write` to regenerate it");
                exit_codes::FAILURE
            }
            Err(e) => report_error(&Error::from(e).with_context(path.display().to_string())),
        };
    }

    let rendered = script.render();

    if write {
        if let Err(e) = std::fs::write(&path, &rendered) {
            return report_error(&Error::from(e).with_context(path.display().to_string()));
        }
        tracing::info!(path = %path.display(), "Settings script written");
        if !quiet {
            Status::success(&format!("Wrote {}", path.display()));
        }
    } else {
        print!("{rendered}");
    }

    exit_codes::SUCCESS
}

fn run_doctor(project_dir: &Path, config: &Config, json: bool) -> i32 {
    let resolver = SdkResolver::from_config(project_dir, &config.schema.sdk);
    let report = doctor::checker(&resolver, ProcessEnv).run();

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{text}"),
            Err(e) => return report_error(&Error::from(e)),
        }
    } else {
        Status::header("Flutter Android environment");
        if let Some(path) = &config.path {
            Status::info(&format!("Using config {}", path.display()));
        }
        print_health_report(&report);
    }

    if report.status.is_operational() {
        exit_codes::SUCCESS
    } else {
        exit_codes::FAILURE
    }
}

//! Error types for SDK resolution and settings validation

use flutterenv_core::properties::PropertiesError;
use flutterenv_core::{Error as CoreError, ErrorCode};
use std::path::PathBuf;
use thiserror::Error;

/// Result of SDK resolution
pub type Result<T> = std::result::Result<T, SdkError>;

/// Failures while locating the Flutter SDK
#[derive(Error, Debug)]
pub enum SdkError {
    /// The properties file exists but is malformed
    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        /// File that failed to parse
        path: PathBuf,
        /// Parser failure
        #[source]
        source: PropertiesError,
    },

    /// Neither source yields a non-empty value
    #[error(
        "Flutter SDK not found. Define '{key}' in {file_name} or set {env_var} environment variable."
    )]
    Missing {
        /// Properties key that was looked up
        key: String,
        /// Name of the properties file
        file_name: String,
        /// Environment variable that was looked up
        env_var: String,
    },

    /// The properties file exists but cannot be read
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying IO failure
        #[source]
        source: std::io::Error,
    },
}

/// Problems with a settings script declaration
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    /// Plugin id is not a dotted identifier
    #[error("Invalid plugin id: '{0}'")]
    InvalidPluginId(String),

    /// Version given but empty
    #[error("Plugin '{0}' has an empty version")]
    EmptyVersion(String),

    /// Same plugin id declared twice
    #[error("Plugin '{0}' is declared more than once")]
    DuplicatePlugin(String),

    /// Include path without a leading `:`
    #[error("Invalid project path '{0}': must start with ':'")]
    InvalidProjectPath(String),

    /// Unknown repository shorthand or non-http URL
    #[error("Invalid repository '{0}': expected google, mavenCentral, gradlePluginPortal or an http(s) URL")]
    InvalidRepository(String),

    /// Empty repository list
    #[error("No plugin repositories declared")]
    NoRepositories,
}

impl From<SdkError> for CoreError {
    fn from(err: SdkError) -> Self {
        match err {
            SdkError::Missing {
                ref key,
                ref file_name,
                ref env_var,
            } => {
                let suggestion = format!(
                    "Add '{key}=/path/to/flutter' to {file_name} or export {env_var}=/path/to/flutter"
                );
                CoreError::sdk_not_found(err.to_string()).with_suggestion(suggestion)
            }
            SdkError::Parse { ref source, .. } => {
                let mut converted = CoreError::config_parse(err.to_string());
                if let Some(line) = source.line() {
                    converted = converted.with_context(format!("line {line}"));
                }
                converted
                    .with_suggestion("Fix the malformed entry or regenerate the file with `flutter pub get`")
                    .with_source(err)
            }
            SdkError::Io { ref source, .. } => {
                let code = match source.kind() {
                    std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
                    _ => ErrorCode::IoError,
                };
                CoreError::new(code, err.to_string()).with_source(err)
            }
        }
    }
}

impl From<SettingsError> for CoreError {
    fn from(err: SettingsError) -> Self {
        let code = match err {
            SettingsError::InvalidRepository(_) | SettingsError::NoRepositories => {
                ErrorCode::InvalidConfigValue
            }
            _ => ErrorCode::ConfigValidationError,
        };
        CoreError::new(code, err.to_string()).with_suggestion("Check the [settings] table in .flutterenv.toml")
    }
}

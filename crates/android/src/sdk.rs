//! Flutter SDK path resolution
//!
//! The SDK location comes from one of two layered sources, in priority order:
//!
//! 1. the `flutter.sdk` key of `local.properties` (written by `flutter pub get`
//!    and Android Studio)
//! 2. the `FLUTTER_ROOT` environment variable
//!
//! Empty values count as absent. When neither source yields a value resolution
//! fails with [`SdkError::Missing`]; there is no further fallback.

use crate::error::{Result, SdkError};
use flutterenv_core::config::SdkConfig;
use flutterenv_core::env::EnvSource;
use flutterenv_core::properties::{Properties, PropertiesError};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default properties file name
pub const DEFAULT_PROPERTIES_FILE: &str = "local.properties";
/// Default key holding the SDK path
pub const DEFAULT_PROPERTY_KEY: &str = "flutter.sdk";
/// Default fallback environment variable
pub const DEFAULT_ENV_VAR: &str = "FLUTTER_ROOT";
/// Plugin-loader build inside the SDK
pub const DEFAULT_INCLUDED_BUILD: &str = "packages/flutter_tools/gradle";

/// Where a resolved SDK path came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SdkSource {
    /// A key in a properties file
    Properties {
        /// The file that was read
        file: PathBuf,
        /// The key that held the path
        key: String,
    },
    /// An environment variable
    Environment {
        /// The variable that held the path
        var: String,
    },
}

/// A resolved SDK location and its provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSdk {
    /// SDK root exactly as configured
    pub path: String,
    /// Source that supplied `path`
    pub source: SdkSource,
}

impl ResolvedSdk {
    /// SDK root as a filesystem path
    #[must_use]
    pub fn root(&self) -> &Path {
        Path::new(&self.path)
    }

    /// Build included into plugin management, e.g. `<sdk>/packages/flutter_tools/gradle`
    #[must_use]
    pub fn included_build_path(&self, subdir: &str) -> PathBuf {
        self.root().join(subdir)
    }
}

/// Resolve the SDK path from `properties_file` / `property_key`, falling back to `env_var`.
///
/// A missing properties file is not an error.
pub fn resolve_sdk_path(
    properties_file: &Path,
    property_key: &str,
    env_var: &str,
    env: &dyn EnvSource,
) -> Result<String> {
    SdkResolver::new(properties_file)
        .with_property_key(property_key)
        .with_env_var(env_var)
        .resolve(env)
        .map(|sdk| sdk.path)
}

/// Configurable SDK lookup
#[derive(Debug, Clone)]
pub struct SdkResolver {
    properties_file: PathBuf,
    property_key: String,
    env_var: String,
    included_build: String,
}

impl SdkResolver {
    /// Resolver reading `properties_file` with the default key and variable
    pub fn new(properties_file: impl Into<PathBuf>) -> Self {
        Self {
            properties_file: properties_file.into(),
            property_key: DEFAULT_PROPERTY_KEY.to_string(),
            env_var: DEFAULT_ENV_VAR.to_string(),
            included_build: DEFAULT_INCLUDED_BUILD.to_string(),
        }
    }

    /// Resolver for an Android project directory using tool configuration
    #[must_use]
    pub fn from_config(project_dir: &Path, config: &SdkConfig) -> Self {
        Self {
            properties_file: project_dir.join(&config.properties_file),
            property_key: config.property_key.clone(),
            env_var: config.env_var.clone(),
            included_build: config.included_build.clone(),
        }
    }

    /// Override the properties key
    #[must_use]
    pub fn with_property_key(mut self, key: impl Into<String>) -> Self {
        self.property_key = key.into();
        self
    }

    /// Override the fallback environment variable
    #[must_use]
    pub fn with_env_var(mut self, var: impl Into<String>) -> Self {
        self.env_var = var.into();
        self
    }

    /// Properties file consulted first
    #[must_use]
    pub fn properties_file(&self) -> &Path {
        &self.properties_file
    }

    /// Key looked up in the properties file
    #[must_use]
    pub fn property_key(&self) -> &str {
        &self.property_key
    }

    /// Environment variable consulted second
    #[must_use]
    pub fn env_var(&self) -> &str {
        &self.env_var
    }

    /// Plugin-loader build relative to the SDK root
    #[must_use]
    pub fn included_build(&self) -> &str {
        &self.included_build
    }

    /// Resolve the SDK location
    pub fn resolve(&self, env: &dyn EnvSource) -> Result<ResolvedSdk> {
        if let Some(props) = self.read_properties()? {
            if let Some(path) = props.get_non_empty(&self.property_key) {
                debug!(
                    file = %self.properties_file.display(),
                    key = %self.property_key,
                    "Flutter SDK resolved from properties"
                );
                return Ok(ResolvedSdk {
                    path: path.to_string(),
                    source: SdkSource::Properties {
                        file: self.properties_file.clone(),
                        key: self.property_key.clone(),
                    },
                });
            }
            debug!(key = %self.property_key, "Key absent or empty in properties file");
        }

        if let Some(path) = env.non_empty_var(&self.env_var) {
            debug!(var = %self.env_var, "Flutter SDK resolved from environment");
            return Ok(ResolvedSdk {
                path,
                source: SdkSource::Environment {
                    var: self.env_var.clone(),
                },
            });
        }

        Err(SdkError::Missing {
            key: self.property_key.clone(),
            file_name: self.file_name(),
            env_var: self.env_var.clone(),
        })
    }

    /// Parse the properties file, or `None` when it does not exist
    fn read_properties(&self) -> Result<Option<Properties>> {
        match Properties::load(&self.properties_file) {
            Ok(props) => Ok(Some(props)),
            Err(PropertiesError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(file = %self.properties_file.display(), "Properties file not found");
                Ok(None)
            }
            Err(PropertiesError::Io(source)) => Err(SdkError::Io {
                path: self.properties_file.clone(),
                source,
            }),
            Err(source) => Err(SdkError::Parse {
                path: self.properties_file.clone(),
                source,
            }),
        }
    }

    fn file_name(&self) -> String {
        self.properties_file
            .file_name()
            .map_or_else(
                || self.properties_file.display().to_string(),
                |n| n.to_string_lossy().into_owned(),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flutterenv_core::env::MapEnv;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn project_with(contents: &str) -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("local.properties");
        std::fs::write(&file, contents).unwrap();
        (dir, file)
    }

    #[test]
    fn test_property_value_without_env() {
        let (_dir, file) = project_with("flutter.sdk=/opt/flutter\n");
        let path = resolve_sdk_path(&file, "flutter.sdk", "FLUTTER_ROOT", &MapEnv::new()).unwrap();
        assert_eq!(path, "/opt/flutter");
    }

    #[test]
    fn test_env_when_file_absent() {
        let dir = tempfile::tempdir().unwrap();
        let env = MapEnv::new().with("FLUTTER_ROOT", "/home/u/flutter");
        let path = resolve_sdk_path(
            &dir.path().join("local.properties"),
            "flutter.sdk",
            "FLUTTER_ROOT",
            &env,
        )
        .unwrap();
        assert_eq!(path, "/home/u/flutter");
    }

    #[test]
    fn test_missing_both_names_key_and_env_var() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_sdk_path(
            &dir.path().join("local.properties"),
            "flutter.sdk",
            "FLUTTER_ROOT",
            &MapEnv::new(),
        )
        .unwrap_err();

        assert!(matches!(err, SdkError::Missing { .. }));
        let message = err.to_string();
        assert!(message.contains("flutter.sdk"));
        assert!(message.contains("FLUTTER_ROOT"));
        assert!(message.contains("local.properties"));
    }

    #[test]
    fn test_property_takes_priority_over_env() {
        let (_dir, file) = project_with("flutter.sdk=/from/file\n");
        let env = MapEnv::new().with("FLUTTER_ROOT", "/from/env");

        let sdk = SdkResolver::new(&file).resolve(&env).unwrap();
        assert_eq!(sdk.path, "/from/file");
        assert_eq!(
            sdk.source,
            SdkSource::Properties {
                file: file.clone(),
                key: "flutter.sdk".into()
            }
        );
    }

    #[test]
    fn test_file_without_key_falls_back_to_env() {
        let (_dir, file) = project_with("sdk.dir=/opt/android\n");
        let env = MapEnv::new().with("FLUTTER_ROOT", "/from/env");

        let sdk = SdkResolver::new(&file).resolve(&env).unwrap();
        assert_eq!(sdk.path, "/from/env");
        assert_eq!(sdk.source, SdkSource::Environment { var: "FLUTTER_ROOT".into() });
    }

    #[test]
    fn test_empty_property_falls_through() {
        let (_dir, file) = project_with("flutter.sdk=\n");
        let env = MapEnv::new().with("FLUTTER_ROOT", "/from/env");

        let sdk = SdkResolver::new(&file).resolve(&env).unwrap();
        assert_eq!(sdk.path, "/from/env");
    }

    #[test]
    fn test_empty_env_is_missing() {
        let (_dir, file) = project_with("flutter.sdk=\n");
        let env = MapEnv::new().with("FLUTTER_ROOT", "");

        let err = SdkResolver::new(&file).resolve(&env).unwrap_err();
        assert!(matches!(err, SdkError::Missing { .. }));
    }

    #[test]
    fn test_malformed_properties_is_parse_error() {
        let (_dir, file) = project_with("flutter.sdk=/opt/\\uZZZZ\n");
        let env = MapEnv::new().with("FLUTTER_ROOT", "/from/env");

        let err = SdkResolver::new(&file).resolve(&env).unwrap_err();
        assert!(matches!(
            err,
            SdkError::Parse {
                source: PropertiesError::MalformedUnicodeEscape { line: 1 },
                ..
            }
        ));
    }

    #[test]
    fn test_directory_in_place_of_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let as_dir = dir.path().join("local.properties");
        std::fs::create_dir(&as_dir).unwrap();

        let err = SdkResolver::new(&as_dir)
            .resolve(&MapEnv::new().with("FLUTTER_ROOT", "/from/env"))
            .unwrap_err();
        assert!(matches!(err, SdkError::Io { .. }));
    }

    #[test]
    fn test_custom_key_and_env_var() {
        let (_dir, file) = project_with("flutter.sdk=/ignored\ncustom.sdk=/custom\n");
        let config = SdkConfig {
            properties_file: "local.properties".into(),
            property_key: "custom.sdk".into(),
            env_var: "FLUTTER_HOME".into(),
            included_build: "packages/flutter_tools/gradle".into(),
        };

        let resolver = SdkResolver::from_config(file.parent().unwrap(), &config);
        assert_eq!(resolver.properties_file(), file.as_path());
        assert_eq!(resolver.resolve(&MapEnv::new()).unwrap().path, "/custom");
    }

    #[test]
    fn test_included_build_path() {
        let sdk = ResolvedSdk {
            path: "/opt/flutter".into(),
            source: SdkSource::Environment { var: "FLUTTER_ROOT".into() },
        };
        assert_eq!(
            sdk.included_build_path(DEFAULT_INCLUDED_BUILD),
            PathBuf::from("/opt/flutter/packages/flutter_tools/gradle")
        );
    }

    #[test]
    fn test_resolved_sdk_serializes_source_kind() {
        let sdk = ResolvedSdk {
            path: "/opt/flutter".into(),
            source: SdkSource::Environment { var: "FLUTTER_ROOT".into() },
        };
        let json = serde_json::to_value(&sdk).unwrap();
        assert_eq!(json["source"]["kind"], "environment");
        assert_eq!(json["source"]["var"], "FLUTTER_ROOT");
    }

    proptest! {
        #[test]
        fn prop_property_wins_regardless_of_env(
            value in "/[A-Za-z0-9_./-]{1,40}",
            env_value in proptest::option::of("[A-Za-z0-9_./-]{0,20}"),
        ) {
            let (_dir, file) = project_with(&format!("flutter.sdk={value}\n"));
            let env = match &env_value {
                Some(v) => MapEnv::new().with("FLUTTER_ROOT", v.clone()),
                None => MapEnv::new(),
            };
            let path = resolve_sdk_path(&file, "flutter.sdk", "FLUTTER_ROOT", &env).unwrap();
            prop_assert_eq!(path, value);
        }

        #[test]
        fn prop_env_value_returned_exactly(value in "[A-Za-z0-9 /._~:-]{1,40}") {
            let dir = tempfile::tempdir().unwrap();
            let env = MapEnv::new().with("FLUTTER_ROOT", value.clone());
            let path = resolve_sdk_path(
                &dir.path().join("local.properties"),
                "flutter.sdk",
                "FLUTTER_ROOT",
                &env,
            )
            .unwrap();
            prop_assert_eq!(path, value);
        }
    }
}

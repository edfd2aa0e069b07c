//! Environment diagnostics for Flutter Android builds
//!
//! Verifies that the SDK resolves and that it contains the plugin-loader build
//! the settings script includes.

use crate::sdk::{SdkResolver, SdkSource};
use flutterenv_core::env::EnvSource;
use flutterenv_core::health::{
    CheckResult, CommandCheck, DirectoryCheck, EnvVarCheck, HealthCheck, HealthChecker,
};

/// Check that the Flutter SDK path resolves
pub struct SdkCheck<E> {
    resolver: SdkResolver,
    env: E,
}

impl<E: EnvSource> SdkCheck<E> {
    /// Check `resolver` against `env`
    pub fn new(resolver: SdkResolver, env: E) -> Self {
        Self { resolver, env }
    }
}

impl<E: EnvSource + Send + Sync> HealthCheck for SdkCheck<E> {
    fn check(&self) -> CheckResult {
        match self.resolver.resolve(&self.env) {
            Ok(sdk) => {
                let source = match &sdk.source {
                    SdkSource::Properties { file, key } => {
                        format!("{key} in {}", file.display())
                    }
                    SdkSource::Environment { var } => format!("${var}"),
                };
                CheckResult::healthy("flutter-sdk")
                    .with_detail("path", sdk.path)
                    .with_detail("source", source)
            }
            Err(e) => CheckResult::unhealthy("flutter-sdk", e.to_string()),
        }
    }
}

/// Checks run by `flutterenv doctor`
pub fn checker<E>(resolver: &SdkResolver, env: E) -> HealthChecker
where
    E: EnvSource + Clone + Send + Sync + 'static,
{
    let mut checker = HealthChecker::new().add_check(SdkCheck::new(resolver.clone(), env.clone()));

    if let Ok(sdk) = resolver.resolve(&env) {
        checker = checker
            .add_check(DirectoryCheck::new("flutter-sdk-root", sdk.root()))
            .add_check(DirectoryCheck::new(
                "flutter-plugin-loader",
                sdk.included_build_path(resolver.included_build()),
            ));
    }

    checker
        .add_check(CommandCheck::optional("flutter", Some("--version")))
        .add_check(CommandCheck::optional("java", Some("-version")))
        .add_check(EnvVarCheck::optional_with_env("ANDROID_HOME", env))
}

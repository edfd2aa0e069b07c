//! Configuration schema definitions
//!
//! Defaults mirror the `settings.gradle.kts` generated by `flutter create`.

use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ConfigSchema {
    /// `[sdk]` table
    #[serde(default)]
    pub sdk: SdkConfig,

    /// `[settings]` table
    #[serde(default)]
    pub settings: SettingsConfig,
}

/// Where to look for the Flutter SDK
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SdkConfig {
    /// Properties file, relative to the Android project directory
    #[serde(default = "default_properties_file")]
    pub properties_file: String,

    /// Key holding the SDK path inside the properties file
    #[serde(default = "default_property_key")]
    pub property_key: String,

    /// Environment variable consulted when the key is absent
    #[serde(default = "default_env_var")]
    pub env_var: String,

    /// Plugin-loader build, relative to the SDK root
    #[serde(default = "default_included_build")]
    pub included_build: String,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            properties_file: default_properties_file(),
            property_key: default_property_key(),
            env_var: default_env_var(),
            included_build: default_included_build(),
        }
    }
}

fn default_properties_file() -> String {
    "local.properties".to_string()
}

fn default_property_key() -> String {
    "flutter.sdk".to_string()
}

fn default_env_var() -> String {
    "FLUTTER_ROOT".to_string()
}

fn default_included_build() -> String {
    "packages/flutter_tools/gradle".to_string()
}

/// Declarations emitted into `settings.gradle.kts`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SettingsConfig {
    /// Plugin repositories: `google`, `mavenCentral`, `gradlePluginPortal` or a Maven URL
    #[serde(default = "default_repositories")]
    pub repositories: Vec<String>,

    /// Plugins declared in the `plugins {}` block
    #[serde(default = "default_plugins")]
    pub plugins: Vec<PluginConfig>,

    /// Subprojects passed to `include(...)`
    #[serde(default = "default_include")]
    pub include: Vec<String>,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            repositories: default_repositories(),
            plugins: default_plugins(),
            include: default_include(),
        }
    }
}

fn default_repositories() -> Vec<String> {
    ["google", "mavenCentral", "gradlePluginPortal"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_plugins() -> Vec<PluginConfig> {
    vec![
        PluginConfig::new("dev.flutter.flutter-plugin-loader", "1.0.0", true),
        PluginConfig::new("com.android.application", "8.11.1", false),
        PluginConfig::new("org.jetbrains.kotlin.android", "2.2.20", false),
        PluginConfig::new("com.google.gms.google-services", "4.4.0", false),
    ]
}

fn default_include() -> Vec<String> {
    vec![":app".to_string()]
}

fn default_true() -> bool {
    true
}

/// A single plugin declaration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PluginConfig {
    /// Plugin id, e.g. `com.android.application`
    pub id: String,

    /// Version; omitted plugins are resolved by the build
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// `false` renders `apply false`
    #[serde(default = "default_true")]
    pub apply: bool,
}

impl PluginConfig {
    /// Plugin with a pinned version
    pub fn new(id: impl Into<String>, version: impl Into<String>, apply: bool) -> Self {
        Self {
            id: id.into(),
            version: Some(version.into()),
            apply,
        }
    }
}

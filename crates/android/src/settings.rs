//! Gradle settings script generation
//!
//! Models the `settings.gradle.kts` of a Flutter Android project: the Flutter
//! SDK lookup and plugin-loader `includeBuild`, plugin repositories, plugin
//! declarations and included subprojects. The script is only declared here;
//! Gradle evaluates it.

use crate::error::{SdkError, SettingsError};
use crate::sdk::{DEFAULT_ENV_VAR, DEFAULT_INCLUDED_BUILD, DEFAULT_PROPERTIES_FILE, DEFAULT_PROPERTY_KEY};
use flutterenv_core::config::{ConfigSchema, PluginConfig};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Conventional script file name
pub const SETTINGS_FILE: &str = "settings.gradle.kts";

static PLUGIN_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*(\.[A-Za-z0-9][A-Za-z0-9_-]*)*$").unwrap());

static PROJECT_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(:[A-Za-z0-9_][A-Za-z0-9_.-]*)+$").unwrap());

const INDENT: &str = "    ";

/// Plugin repository declared under `pluginManagement.repositories`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Repository {
    /// `google()`
    Google,
    /// `mavenCentral()`
    MavenCentral,
    /// `gradlePluginPortal()`
    GradlePluginPortal,
    /// `maven { url = uri("...") }`
    Maven(String),
}

impl Repository {
    fn render(&self) -> String {
        match self {
            Repository::Google => "google()".to_string(),
            Repository::MavenCentral => "mavenCentral()".to_string(),
            Repository::GradlePluginPortal => "gradlePluginPortal()".to_string(),
            Repository::Maven(url) => format!("maven {{ url = uri({}) }}", kotlin_string(url)),
        }
    }
}

impl FromStr for Repository {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "google" | "google()" => Ok(Repository::Google),
            "mavenCentral" | "mavenCentral()" => Ok(Repository::MavenCentral),
            "gradlePluginPortal" | "gradlePluginPortal()" => Ok(Repository::GradlePluginPortal),
            url if url.starts_with("https://") || url.starts_with("http://") => {
                Ok(Repository::Maven(url.to_string()))
            }
            other => Err(SettingsError::InvalidRepository(other.to_string())),
        }
    }
}

/// Entry in the `plugins {}` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plugin {
    /// Plugin id
    pub id: String,
    /// Pinned version
    pub version: Option<String>,
    /// `false` renders `apply false`
    pub apply: bool,
}

impl Plugin {
    /// Plugin applied to the settings
    pub fn applied(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: Some(version.into()),
            apply: true,
        }
    }

    /// Plugin put on the classpath for subprojects (`apply false`)
    pub fn declared(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            apply: false,
            ..Self::applied(id, version)
        }
    }

    fn render(&self) -> String {
        let mut line = format!("id({})", kotlin_string(&self.id));
        if let Some(version) = &self.version {
            let _ = write!(line, " version {}", kotlin_string(version));
        }
        if !self.apply {
            line.push_str(" apply false");
        }
        line
    }
}

impl From<&PluginConfig> for Plugin {
    fn from(config: &PluginConfig) -> Self {
        Self {
            id: config.id.clone(),
            version: config.version.clone(),
            apply: config.apply,
        }
    }
}

/// How the script itself finds the Flutter SDK at Gradle configuration time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkLookup {
    /// Properties file, relative to the settings directory
    pub properties_file: String,
    /// Key holding the SDK path
    pub property_key: String,
    /// Fallback environment variable
    pub env_var: String,
    /// Plugin-loader build relative to the SDK root
    pub included_build: String,
}

impl Default for SdkLookup {
    fn default() -> Self {
        Self {
            properties_file: DEFAULT_PROPERTIES_FILE.to_string(),
            property_key: DEFAULT_PROPERTY_KEY.to_string(),
            env_var: DEFAULT_ENV_VAR.to_string(),
            included_build: DEFAULT_INCLUDED_BUILD.to_string(),
        }
    }
}

impl SdkLookup {
    /// Message thrown when neither source is set; identical to [`SdkError::Missing`]
    fn missing_message(&self) -> String {
        let file_name = Path::new(&self.properties_file)
            .file_name()
            .map_or_else(|| self.properties_file.clone(), |n| n.to_string_lossy().into_owned());

        SdkError::Missing {
            key: self.property_key.clone(),
            file_name,
            env_var: self.env_var.clone(),
        }
        .to_string()
    }
}

/// A complete `settings.gradle.kts`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsScript {
    /// SDK lookup and included build
    pub sdk: SdkLookup,
    /// Plugin repositories
    pub repositories: Vec<Repository>,
    /// Plugin declarations
    pub plugins: Vec<Plugin>,
    /// Included subprojects
    pub includes: Vec<String>,
}

impl SettingsScript {
    /// The script `flutter create` generates
    #[must_use]
    pub fn flutter_default() -> Self {
        Self {
            sdk: SdkLookup::default(),
            repositories: vec![
                Repository::Google,
                Repository::MavenCentral,
                Repository::GradlePluginPortal,
            ],
            plugins: vec![
                Plugin::applied("dev.flutter.flutter-plugin-loader", "1.0.0"),
                Plugin::declared("com.android.application", "8.11.1"),
                Plugin::declared("org.jetbrains.kotlin.android", "2.2.20"),
                Plugin::declared("com.google.gms.google-services", "4.4.0"),
            ],
            includes: vec![":app".to_string()],
        }
    }

    /// Build from tool configuration
    pub fn from_config(config: &ConfigSchema) -> Result<Self, SettingsError> {
        let repositories = config
            .settings
            .repositories
            .iter()
            .map(|r| r.parse())
            .collect::<Result<Vec<Repository>, _>>()?;

        let script = Self {
            sdk: SdkLookup {
                properties_file: config.sdk.properties_file.clone(),
                property_key: config.sdk.property_key.clone(),
                env_var: config.sdk.env_var.clone(),
                included_build: config.sdk.included_build.clone(),
            },
            repositories,
            plugins: config.settings.plugins.iter().map(Plugin::from).collect(),
            includes: config.settings.include.clone(),
        };
        script.validate()?;
        Ok(script)
    }

    /// Check declarations Gradle would reject
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.repositories.is_empty() {
            return Err(SettingsError::NoRepositories);
        }

        let mut seen = HashSet::new();
        for plugin in &self.plugins {
            if !PLUGIN_ID.is_match(&plugin.id) {
                return Err(SettingsError::InvalidPluginId(plugin.id.clone()));
            }
            if plugin.version.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(SettingsError::EmptyVersion(plugin.id.clone()));
            }
            if !seen.insert(plugin.id.as_str()) {
                return Err(SettingsError::DuplicatePlugin(plugin.id.clone()));
            }
        }

        if let Some(bad) = self.includes.iter().find(|p| !PROJECT_PATH.is_match(p)) {
            return Err(SettingsError::InvalidProjectPath(bad.clone()));
        }

        Ok(())
    }

    /// Render as Kotlin DSL
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let sdk = &self.sdk;
        let i2 = INDENT.repeat(2);
        let i3 = INDENT.repeat(3);
        let i4 = INDENT.repeat(4);

        out.push_str("pluginManagement {\n");
        let _ = writeln!(out, "{INDENT}val flutterSdkPath =");
        let _ = writeln!(out, "{i2}run {{");
        let _ = writeln!(out, "{i3}val properties = java.util.Properties()");
        let _ = writeln!(out, "{i3}val propFile = file({})", kotlin_string(&sdk.properties_file));
        let _ = writeln!(out, "{i3}if (propFile.exists()) {{");
        let _ = writeln!(out, "{i4}propFile.inputStream().use {{ properties.load(it) }}");
        let _ = writeln!(out, "{i3}}}");
        let _ = writeln!(
            out,
            "{i3}properties.getProperty({})?.takeIf {{ it.isNotEmpty() }}",
            kotlin_string(&sdk.property_key)
        );
        let _ = writeln!(
            out,
            "{i4}?: System.getenv({})?.takeIf {{ it.isNotEmpty() }}",
            kotlin_string(&sdk.env_var)
        );
        let _ = writeln!(
            out,
            "{i4}?: throw GradleException({})",
            kotlin_string(&sdk.missing_message())
        );
        let _ = writeln!(out, "{i2}}}");
        out.push('\n');
        let _ = writeln!(
            out,
            "{INDENT}includeBuild(\"$flutterSdkPath/{}\")",
            escape_kotlin(&sdk.included_build)
        );
        out.push('\n');
        let _ = writeln!(out, "{INDENT}repositories {{");
        for repo in &self.repositories {
            let _ = writeln!(out, "{i2}{}", repo.render());
        }
        let _ = writeln!(out, "{INDENT}}}");
        out.push_str("}\n");

        if !self.plugins.is_empty() {
            out.push_str("\nplugins {\n");
            for plugin in &self.plugins {
                let _ = writeln!(out, "{INDENT}{}", plugin.render());
            }
            out.push_str("}\n");
        }

        if !self.includes.is_empty() {
            let projects: Vec<String> = self.includes.iter().map(|p| kotlin_string(p)).collect();
            let _ = writeln!(out, "\ninclude({})", projects.join(", "));
        }

        out
    }

    /// Path of the script inside `project_dir`
    #[must_use]
    pub fn path_in(project_dir: &Path) -> PathBuf {
        project_dir.join(SETTINGS_FILE)
    }

    /// Whether `existing` matches the rendering, ignoring line-ending style
    #[must_use]
    pub fn matches(&self, existing: &str) -> bool {
        existing.replace("\r\n", "\n").trim_end() == self.render().trim_end()
    }
}

fn escape_kotlin(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

fn kotlin_string(s: &str) -> String {
    format!("\"{}\"", escape_kotlin(s))
}

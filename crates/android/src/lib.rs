//! Flutter Android build configuration
//!
//! This crate provides the Android side of flutterenv:
//! - Flutter SDK path resolution from `local.properties` and the environment
//! - Gradle `settings.gradle.kts` modelling and rendering
//! - Doctor checks for the resolved SDK

#![warn(missing_docs)]

pub mod doctor;
pub mod error;
pub mod sdk;
pub mod settings;

pub use error::{Result, SdkError};
pub use sdk::{resolve_sdk_path, ResolvedSdk, SdkResolver, SdkSource};
pub use settings::{Plugin, Repository, SettingsScript};

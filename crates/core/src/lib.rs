//! Core utilities for flutterenv
//!
//! This crate provides the building blocks shared by the platform crates and the CLI:
//!
//! - **Error handling**: coded errors with context and recovery suggestions
//! - **Properties**: Java `.properties` parsing (`local.properties`)
//! - **Environment**: injectable read-only environment lookup
//! - **Configuration**: TOML-based tool configuration with defaults
//! - **Health checks**: verify tool dependencies and environment
//! - **Process execution**: command lookup and version probing
//!
//! # Example
//!
//! ```rust,no_run
//! use flutterenv_core::{env::ProcessEnv, properties::Properties};
//! use flutterenv_core::env::EnvSource;
//!
//! let props = Properties::load("android/local.properties").expect("unreadable");
//! let sdk = props
//!     .get("flutter.sdk")
//!     .map(String::from)
//!     .or_else(|| ProcessEnv.var("FLUTTER_ROOT"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod env;
pub mod error;
pub mod health;
pub mod process;
pub mod properties;

pub use error::{Error, ErrorCode, ErrorReport, Result};

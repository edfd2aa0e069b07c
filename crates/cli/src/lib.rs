//! CLI utilities for flutterenv
//!
//! Provides shared CLI functionality:
//! - Status messages
//! - Health report rendering
//! - Duration and count formatting

#![warn(missing_docs)]

pub mod output;

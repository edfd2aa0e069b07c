//! Configuration loading and schema definitions
//!
//! Tool configuration read from `.flutterenv.toml`.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;

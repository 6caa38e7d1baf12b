// src/config/mod.rs

//! Configuration loading and validation for pollwatch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate targets and compile their patterns (`validate.rs`).
//! - Gather database settings from the environment (`env.rs`).

pub mod env;
pub mod loader;
pub mod model;
pub mod validate;

pub use env::DbSettings;
pub use loader::{load_and_validate, load_from_path};
pub use model::{ConfigFile, ConfigSection, RawConfigFile, TargetConfig};

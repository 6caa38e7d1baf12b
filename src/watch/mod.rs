// src/watch/mod.rs

//! Directory scanning and change detection.
//!
//! This module is responsible for:
//! - Compiling `exclude_regex` / `include_regex` rules per target.
//! - Listing the files directly under a target root that survive those rules.
//! - Deciding whether a file's current content differs from its latest
//!   snapshot.
//!
//! It never runs commands or writes snapshots; the engine does that.

pub mod detector;
pub mod patterns;
pub mod scanner;

pub use detector::{changed, content_differs, detect, Observation};
pub use patterns::PatternRules;
pub use scanner::{list_regular_files, scan_target};

// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`command`] splits configured command strings.
//! - [`pipeline`] runs a target's commands sequentially with
//!   `tokio::process::Command`, logging their output.
//! - [`backend`] provides the `ActionRunner` trait and the concrete
//!   `ProcessActionRunner` the watch loop uses in production, which tests can
//!   replace with a fake implementation.

pub mod backend;
pub mod command;
pub mod pipeline;

pub use backend::{ActionRunner, ProcessActionRunner};
pub use command::CommandLine;

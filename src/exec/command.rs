// src/exec/command.rs

//! Splitting configured command strings into program + arguments.

/// A command line split on whitespace.
///
/// There is no quoting or escaping: an argument containing spaces cannot be
/// expressed. Wrap such commands in a script instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    /// Returns `None` for a blank command string.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }
}

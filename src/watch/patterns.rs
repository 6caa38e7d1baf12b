// src/watch/patterns.rs

use std::fmt;

use regex::Regex;

use crate::errors::{PollwatchError, Result};

/// Compiled exclude / include regexes for one target.
///
/// Filenames (not paths) are matched with unanchored regex search, so
/// `\.log$` matches `debug.log` and `log` matches `catalog.txt`.
///
/// Evaluation is two-pass:
///
/// 1. every file starts out included;
/// 2. any matching exclude pattern removes it;
/// 3. any matching include pattern re-admits it.
///
/// So an include always wins over an exclude for the same filename.
#[derive(Clone, Default)]
pub struct PatternRules {
    exclude: Vec<Regex>,
    include: Vec<Regex>,
}

impl fmt::Debug for PatternRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternRules")
            .field("exclude", &self.exclude_patterns())
            .field("include", &self.include_patterns())
            .finish()
    }
}

impl PatternRules {
    pub fn compile(exclude: &[String], include: &[String]) -> Result<Self> {
        Ok(Self {
            exclude: compile_all(exclude, "exclude_regex")?,
            include: compile_all(include, "include_regex")?,
        })
    }

    /// Rules that admit every filename.
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn exclude_patterns(&self) -> Vec<&str> {
        self.exclude.iter().map(Regex::as_str).collect()
    }

    pub fn include_patterns(&self) -> Vec<&str> {
        self.include.iter().map(Regex::as_str).collect()
    }

    pub fn is_excluded(&self, filename: &str) -> bool {
        self.exclude.iter().any(|re| re.is_match(filename))
    }

    pub fn is_included(&self, filename: &str) -> bool {
        self.include.iter().any(|re| re.is_match(filename))
    }

    /// Final decision for a single filename.
    pub fn admits(&self, filename: &str) -> bool {
        !self.is_excluded(filename) || self.is_included(filename)
    }

    /// Keep the admitted filenames, preserving input order.
    pub fn filter<I, S>(&self, filenames: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        filenames
            .into_iter()
            .map(Into::into)
            .filter(|name| self.admits(name))
            .collect()
    }
}

fn compile_all(patterns: &[String], field: &str) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pat| {
            Regex::new(pat).map_err(|e| {
                PollwatchError::ConfigError(format!("invalid {field} pattern '{pat}': {e}"))
            })
        })
        .collect()
}

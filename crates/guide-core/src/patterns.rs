//! Pattern matching utilities for command lines.

use regex::Regex;

/// A compiled pattern for matching command lines.
#[derive(Debug)]
pub struct Pattern {
    /// Human-readable name for this pattern.
    pub name: &'static str,
    /// The regex pattern.
    regex: Regex,
}

impl Pattern {
    /// Creates a new pattern.
    pub fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).expect("Invalid regex pattern"),
        }
    }

    /// Pattern for a command that takes an optional payload.
    ///
    /// Matches `#name` alone or followed by whitespace, so `#turn` never
    /// matches a `#turntoward` line.
    pub fn with_payload(name: &'static str, marker: char) -> Self {
        let pattern = format!(
            r"^{}{}(?:\s|$)",
            regex::escape(&marker.to_string()),
            regex::escape(name)
        );
        Self::new(name, &pattern)
    }

    /// Pattern for a command that takes no payload at all.
    pub fn bare(name: &'static str, marker: char) -> Self {
        let pattern = format!(
            r"^{}{}\s*$",
            regex::escape(&marker.to_string()),
            regex::escape(name)
        );
        Self::new(name, &pattern)
    }

    /// Checks if the pattern matches the given text.
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

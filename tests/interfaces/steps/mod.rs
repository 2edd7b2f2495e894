//! Cucumber step definitions for interface tests.

pub mod chain_resolution;
pub mod proceed;

/// Split a comma separated step argument into trimmed entries.
pub fn list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .collect()
}

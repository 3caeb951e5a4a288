//! Row identity extraction.
//!
//! Benchmark names carry a numeric configuration id plus a free-form suffix
//! that differs between tool versions. The extractor reduces a row key to the
//! part that identifies the configuration, so rows for the same configuration
//! coalesce across files.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Conventions;

static FAIR: Lazy<Regex> = Lazy::new(|| Regex::new(r"fair[0-9][0-9]").expect("valid fair pattern"));

/// What to do with a matched key before using it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalize {
    /// Use the match verbatim.
    None,
    /// Zero-pad the workload number of a four-segment key to two digits.
    PadWorkloadNumber,
}

/// One naming convention: a pattern plus its normalization step.
#[derive(Debug, Clone)]
pub struct KeyMatcher {
    pub name: &'static str,
    pattern: Regex,
    normalize: Normalize,
}

impl KeyMatcher {
    pub fn new(name: &'static str, pattern: Regex, normalize: Normalize) -> Self {
        Self {
            name,
            pattern,
            normalize,
        }
    }

    /// The normalized identity if the pattern occurs in `raw`.
    pub fn extract(&self, raw: &str) -> Option<String> {
        let found = self.pattern.find(raw)?.as_str();
        Some(match self.normalize {
            Normalize::None => found.to_string(),
            Normalize::PadWorkloadNumber => pad_workload_number(found),
        })
    }
}

fn pad_workload_number(key: &str) -> String {
    let sections: Vec<&str> = key.split('-').collect();
    if sections.len() != 4 {
        return key.to_string();
    }
    match sections[3].parse::<u64>() {
        Ok(n) => format!("{}-{:02}", sections[..3].join("-"), n),
        Err(_) => key.to_string(),
    }
}

/// Tries each [`KeyMatcher`] in order; the first match wins.
#[derive(Debug, Clone)]
pub struct WorkloadKeyExtractor {
    matchers: Vec<KeyMatcher>,
}

impl WorkloadKeyExtractor {
    /// The standard matchers for the given workload-type identifiers.
    pub fn new(conventions: &Conventions) -> Self {
        let types: Vec<String> = conventions
            .workload_types
            .iter()
            .filter(|t| !t.is_empty())
            .map(|t| regex::escape(t))
            .collect();
        let class = format!("(?:{})", types.join("|"));

        let build = |pattern: String| Regex::new(&pattern).expect("workload patterns are valid");

        let fair = KeyMatcher::new("fair", FAIR.clone(), Normalize::None);
        if types.is_empty() {
            return Self { matchers: vec![fair] };
        }

        Self {
            matchers: vec![
                fair,
                KeyMatcher::new(
                    "typed-sp0",
                    build(format!(r"[0-9]+-t-{class}-[0-9]+-sp0-.*")),
                    Normalize::PadWorkloadNumber,
                ),
                KeyMatcher::new(
                    "typed",
                    build(format!(r"[0-9]+-t-{class}-[0-9]+")),
                    Normalize::PadWorkloadNumber,
                ),
                KeyMatcher::new(
                    "loose",
                    build(format!(r"t-{class}-[0-9]*-[0-9].*\S")),
                    Normalize::None,
                ),
            ],
        }
    }

    /// Build an extractor from an explicit matcher list.
    pub fn with_matchers(matchers: Vec<KeyMatcher>) -> Self {
        Self { matchers }
    }

    pub fn matchers(&self) -> &[KeyMatcher] {
        &self.matchers
    }

    /// The row identity for a raw first-column value. Unmatched keys are kept verbatim.
    pub fn extract(&self, raw: &str) -> String {
        self.matchers
            .iter()
            .find_map(|m| m.extract(raw))
            .unwrap_or_else(|| raw.to_string())
    }
}

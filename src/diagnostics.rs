//! Warning accumulator for partially failed builds
//!
//! Malformed configuration entries never abort a build. Each one is logged
//! through `tracing` and recorded here so callers can inspect what was
//! skipped after the fact.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single skipped or degraded configuration entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    /// Which entry the warning is about, e.g. `event:black_friday`
    pub subject: String,
    /// Human readable reason
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.subject, self.message)
    }
}

/// Warnings collected while generating features
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and emit it through `tracing`
    pub fn warn(&mut self, subject: impl Into<String>, message: impl Into<String>) {
        let warning = Warning {
            subject: subject.into(),
            message: message.into(),
        };
        tracing::warn!(subject = %warning.subject, "{}", warning.message);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    /// True if any warning was recorded for `subject`
    pub fn mentions(&self, subject: &str) -> bool {
        self.warnings.iter().any(|w| w.subject == subject)
    }

    /// Append another accumulator's warnings
    pub fn extend(&mut self, other: Diagnostics) {
        self.warnings.extend(other.warnings);
    }
}

//! Error handler contract
//!
//! Validation and structural problems are routed through a single extension
//! point so callers choose the failure policy. The default `FailFast` handler
//! aborts on the first report; bulk ingestion supplies a `Collector` that
//! records everything and lets the decode run to completion.

use crate::path::PropertyPath;
use serde::{Deserialize, Serialize};

/// Severity of a reported problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Severity {
    /// A hard constraint or structural rule was broken
    #[default]
    Violation,
    /// Suspicious but tolerable under a permissive policy
    Warning,
}

/// A single recorded problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Severity level
    pub severity: Severity,
    /// Where in the object graph the problem was found
    pub path: String,
    /// Human-readable message
    pub message: String,
}

/// Receives validation and structural problems as they are found
///
/// Implementations return `true` to continue processing or `false` to make
/// the caller abort the current operation.
pub trait ErrorHandler {
    /// Report a problem; returns whether processing should continue
    fn report(&mut self, severity: Severity, path: &PropertyPath, message: &str) -> bool;
}

/// Default policy: abort on the first report of any severity
#[derive(Debug, Clone, Copy, Default)]
pub struct FailFast;

impl ErrorHandler for FailFast {
    fn report(&mut self, _severity: Severity, _path: &PropertyPath, _message: &str) -> bool {
        false
    }
}

/// Permissive policy: record every report and continue
///
/// Enables best-effort decoding; the caller inspects the recorded reports
/// afterwards to decide what to do with the partially-valid document.
#[derive(Debug, Clone, Default)]
pub struct Collector {
    /// Everything reported so far, in discovery order
    pub reports: Vec<Report>,
}

impl Collector {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Count reports at `Severity::Violation`
    pub fn violation_count(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| r.severity == Severity::Violation)
            .count()
    }

    /// True when nothing has been reported
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

impl ErrorHandler for Collector {
    fn report(&mut self, severity: Severity, path: &PropertyPath, message: &str) -> bool {
        self.reports.push(Report {
            severity,
            path: path.to_string(),
            message: message.to_string(),
        });
        true
    }
}

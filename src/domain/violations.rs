//! Core domain models for naming violations and style reports
//!
//! Architecture: Rich Domain Models - Violations carry their own severity semantics
//! - A Violation knows whether it blocks a commit and how to render itself
//! - StyleReport is the aggregate root owning every violation found in a run
//! - Per-file reports are merged by value at the directory boundary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity levels for naming violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Style deviations that are reported but never fail a run
    Warning,
    /// Blocking violations that fail the check and reject commits
    Error,
}

impl Severity {
    /// Whether this severity level should cause the run to fail
    pub fn is_blocking(self) -> bool {
        matches!(self, Self::Error)
    }

    /// Convert to string for display
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A naming violation detected on a single source line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Identifier of the rule that produced this violation
    pub rule_id: String,
    /// Severity level of this violation
    pub severity: Severity,
    /// File path where the violation was found
    pub file_path: PathBuf,
    /// Line number (1-indexed)
    pub line_number: u32,
    /// Human-readable description of the violation
    pub message: String,
    /// The offending source line, trimmed
    pub context: Option<String>,
    /// Suggested rename or replacement
    pub suggested_fix: Option<String>,
}

impl Violation {
    /// Create a new violation
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        file_path: PathBuf,
        line_number: u32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            file_path,
            line_number,
            message: message.into(),
            context: None,
            suggested_fix: None,
        }
    }

    /// Add source code context
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a suggested fix
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggested_fix = Some(suggestion.into());
        self
    }

    /// Whether this violation is blocking
    pub fn is_blocking(&self) -> bool {
        self.severity.is_blocking()
    }

    /// Format as `path:line: message`
    pub fn format_display(&self) -> String {
        format!("{}:{}: {}", self.file_path.display(), self.line_number, self.message)
    }
}

/// Summary statistics for a style report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Number of files that were actually checked
    pub files_checked: usize,
    /// Number of violations by severity level
    pub violations_by_severity: ViolationCounts,
    /// Total execution time in milliseconds
    pub execution_time_ms: u64,
    /// When the run started
    pub validated_at: DateTime<Utc>,
}

/// Count of violations by severity level
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationCounts {
    pub error: usize,
    pub warning: usize,
}

impl ViolationCounts {
    /// Total number of violations across all severities
    pub fn total(&self) -> usize {
        self.error + self.warning
    }

    /// Whether there are any blocking violations
    pub fn has_blocking(&self) -> bool {
        self.error > 0
    }

    /// Count one more violation of the given severity
    pub fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Error => self.error += 1,
            Severity::Warning => self.warning += 1,
        }
    }
}

/// Accumulated result of a run: violations in discovery order plus counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleReport {
    /// All violations, in the order they were discovered
    pub violations: Vec<Violation>,
    /// Summary statistics
    pub summary: ReportSummary,
    /// Fingerprint of the configuration used for this run
    pub config_fingerprint: Option<String>,
}

impl StyleReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self {
            violations: Vec::new(),
            summary: ReportSummary {
                validated_at: Utc::now(),
                ..Default::default()
            },
            config_fingerprint: None,
        }
    }

    /// Append a violation
    pub fn add_violation(&mut self, violation: Violation) {
        self.summary.violations_by_severity.add(violation.severity);
        self.violations.push(violation);
    }

    /// Record that one more file was checked
    pub fn record_file_checked(&mut self) {
        self.summary.files_checked += 1;
    }

    /// Whether the report contains any violations
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Whether the report contains blocking violations
    pub fn has_errors(&self) -> bool {
        self.summary.violations_by_severity.has_blocking()
    }

    /// Process exit status for this report: 1 when any Error was recorded
    pub fn exit_code(&self) -> i32 {
        if self.has_errors() {
            1
        } else {
            0
        }
    }

    pub fn error_count(&self) -> usize {
        self.summary.violations_by_severity.error
    }

    pub fn warning_count(&self) -> usize {
        self.summary.violations_by_severity.warning
    }

    /// Get violations of a specific severity
    pub fn violations_by_severity(&self, severity: Severity) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.severity == severity)
    }

    /// Set the execution time
    pub fn set_execution_time(&mut self, duration_ms: u64) {
        self.summary.execution_time_ms = duration_ms;
    }

    /// Set the configuration fingerprint
    pub fn set_config_fingerprint(&mut self, fingerprint: impl Into<String>) {
        self.config_fingerprint = Some(fingerprint.into());
    }

    /// Merge another report into this one, keeping discovery order
    pub fn merge(&mut self, other: StyleReport) {
        for violation in other.violations {
            self.add_violation(violation);
        }
        self.summary.files_checked += other.summary.files_checked;
    }
}

impl Default for StyleReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Error types that can abort or interrupt a run
#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    /// The path argument is unusable or unsafe
    #[error("{message}")]
    Argument { message: String },

    /// Configuration file could not be loaded or parsed
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// File could not be read or accessed
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Glob or regex compilation failed
    #[error("Pattern error: {message}")]
    Pattern { message: String },

    /// Analysis failed for a specific file
    #[error("Analysis error in {file}: {message}")]
    Analysis { file: String, message: String },
}

impl GuardError {
    /// Create an argument error
    pub fn argument(message: impl Into<String>) -> Self {
        Self::Argument {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a pattern error
    pub fn pattern(message: impl Into<String>) -> Self {
        Self::Pattern {
            message: message.into(),
        }
    }

    /// Create an analysis error
    pub fn analysis(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Analysis {
            file: file.into(),
            message: message.into(),
        }
    }
}

/// Result type for naming-guard operations
pub type GuardResult<T> = Result<T, GuardError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_violation_creation() {
        let violation = Violation::new(
            "method_naming",
            Severity::Error,
            PathBuf::from("src/engine.cpp"),
            12,
            "Method 'DoThing' should use camelCase",
        );

        assert_eq!(violation.rule_id, "method_naming");
        assert_eq!(violation.file_path, Path::new("src/engine.cpp"));
        assert!(violation.is_blocking());
        assert_eq!(
            violation.format_display(),
            "src/engine.cpp:12: Method 'DoThing' should use camelCase"
        );
    }

    #[test]
    fn test_report_counts_and_exit_code() {
        let mut report = StyleReport::new();
        assert_eq!(report.exit_code(), 0);

        report.add_violation(Violation::new(
            "member_prefix",
            Severity::Warning,
            PathBuf::from("a.h"),
            3,
            "warn",
        ));
        assert!(report.has_violations());
        assert_eq!(report.exit_code(), 0);

        report.add_violation(Violation::new(
            "using_namespace",
            Severity::Error,
            PathBuf::from("a.cpp"),
            1,
            "err",
        ));
        assert_eq!(report.exit_code(), 1);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 1);
        assert_eq!(report.summary.violations_by_severity.total(), 2);
    }

    #[test]
    fn test_merge_preserves_order_and_file_count() {
        let mut first = StyleReport::new();
        first.record_file_checked();
        first.add_violation(Violation::new("a", Severity::Warning, PathBuf::from("a.cpp"), 1, "a"));

        let mut second = StyleReport::new();
        second.record_file_checked();
        second.add_violation(Violation::new("b", Severity::Error, PathBuf::from("b.cpp"), 9, "b"));

        first.merge(second);

        assert_eq!(first.summary.files_checked, 2);
        let ids: Vec<_> = first.violations.iter().map(|v| v.rule_id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert!(first.has_errors());
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Error.is_blocking());
        assert!(!Severity::Warning.is_blocking());
    }
}

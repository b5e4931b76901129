//! naming-guard - Naming convention enforcement for C and C++ source trees
//!
//! Architecture: Clean Architecture - Library interface serves as the application layer
//! - Pure domain logic separated from infrastructure concerns
//! - Line normalisation, scope tracking and rules live behind the Analyzer
//! - Commit gate API provides the block/allow decision for staged files

pub mod analyzer;
pub mod config;
pub mod domain;
pub mod patterns;
pub mod report;
pub mod target;

// Re-export main types for convenient access
pub use domain::violations::{
    GuardError, GuardResult, ReportSummary, Severity, StyleReport, Violation, ViolationCounts,
};

pub use config::{ConfigBuilder, GuardConfig, NamingConventions, RuleSettings};

pub use analyzer::{AnalysisOptions, Analyzer, FileAnalyzer};

pub use report::{OutputFormat, ReportFormatter, ReportOptions};

use std::path::Path;

/// Main validator providing high-level naming checks
#[derive(Debug)]
pub struct NamingGuard {
    analyzer: Analyzer,
    report_formatter: ReportFormatter,
}

impl NamingGuard {
    /// Create a new validator with the given configuration
    pub fn new_with_config(config: GuardConfig) -> GuardResult<Self> {
        let report_formatter = ReportFormatter::new(ReportOptions {
            warning_display_limit: config.report.warning_display_limit,
            ..Default::default()
        });
        let analyzer = Analyzer::new(config)?;

        Ok(Self {
            analyzer,
            report_formatter,
        })
    }

    /// Create a validator with default configuration
    pub fn new() -> GuardResult<Self> {
        Self::new_with_config(GuardConfig::default())
    }

    /// Create a validator loading configuration from file
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> GuardResult<Self> {
        let config = GuardConfig::load_from_file(path)?;
        Self::new_with_config(config)
    }

    /// Set custom report formatter
    pub fn with_report_formatter(mut self, formatter: ReportFormatter) -> Self {
        self.report_formatter = formatter;
        self
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    pub fn config(&self) -> &GuardConfig {
        self.analyzer.config()
    }

    /// Validate a single file; unchecked extensions give an empty report
    pub fn validate_file<P: AsRef<Path>>(&self, file_path: P) -> GuardResult<StyleReport> {
        Ok(self.analyzer.analyze_file(file_path)?.unwrap_or_default())
    }

    /// Validate a file or a directory tree
    pub fn validate_path<P: AsRef<Path>>(
        &self,
        path: P,
        options: &AnalysisOptions,
    ) -> GuardResult<StyleReport> {
        self.analyzer.analyze_paths(&[path.as_ref()], options)
    }

    /// Validate entire directory tree
    pub fn validate_directory<P: AsRef<Path>>(
        &self,
        root: P,
        options: &AnalysisOptions,
    ) -> GuardResult<StyleReport> {
        self.analyzer.analyze_directory(root, options)
    }

    /// Format a style report for output
    pub fn format_report(&self, report: &StyleReport, format: OutputFormat) -> GuardResult<String> {
        self.report_formatter.format_report(report, format)
    }
}

/// Convenience function to validate a directory with default settings
pub fn check_directory<P: AsRef<Path>>(directory: P) -> GuardResult<StyleReport> {
    let guard = NamingGuard::new()?;
    guard.validate_directory(directory, &AnalysisOptions::default())
}

/// Commit gate integration
pub mod gate {
    use super::*;

    /// Block/allow decision for a set of staged files
    #[derive(Debug)]
    pub struct GateOutcome {
        pub report: StyleReport,
        /// False when any Error was found
        pub allowed: bool,
    }

    impl GateOutcome {
        /// Final line(s) shown by a commit hook
        pub fn verdict(&self) -> &'static str {
            if self.allowed {
                "✅ Coding style check passed!"
            } else {
                "❌ Commit rejected due to coding style violations.\n\
                 💡 Fix the errors above or use 'git commit --no-verify' to skip this check."
            }
        }

        pub fn exit_code(&self) -> i32 {
            if self.allowed {
                0
            } else {
                1
            }
        }
    }

    /// Check staged files given relative to `root`.
    ///
    /// Files that no longer exist or have an unchecked extension are skipped,
    /// as are files matched by the configured exclude patterns. Collecting the
    /// staged list (`git diff --cached --name-only --diff-filter=ACM`) is up to
    /// the caller.
    pub fn check_staged_files<P: AsRef<Path>>(
        guard: &NamingGuard,
        root: &Path,
        files: &[P],
    ) -> GuardResult<GateOutcome> {
        let extensions = &guard.config().paths.extensions;
        let staged: Vec<_> = files
            .iter()
            .map(|file| root.join(file))
            .filter(|path| {
                extensions
                    .iter()
                    .any(|ext| patterns::path_filter::has_extension(path, ext))
            })
            .filter(|path| path.is_file())
            .collect();

        tracing::debug!("Checking {} staged file(s)", staged.len());

        let report = guard
            .analyzer()
            .analyze_paths(&staged, &AnalysisOptions::default())?;
        let allowed = !report.has_errors();

        Ok(GateOutcome { report, allowed })
    }
}

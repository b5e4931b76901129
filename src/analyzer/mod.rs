//! Main analysis orchestrator for naming-guard
//!
//! CDD Principle: Domain Services - Analyzer orchestrates complex validation workflows
//! - Coordinates path filtering, per-file analysis, and result aggregation
//! - Provides clean interface for validating single files or directory trees
//! - Per-file reports are merged in discovery order, parallel or not

pub mod cpp;
pub mod scope;

use crate::analyzer::cpp::{decode_lenient, CppAnalyzer};
use crate::config::GuardConfig;
use crate::domain::violations::{GuardError, GuardResult, StyleReport};
use crate::patterns::PathFilter;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Main analyzer that orchestrates the entire validation process
#[derive(Debug)]
pub struct Analyzer {
    /// Configuration for this analysis
    config: GuardConfig,
    /// Path filter for determining which files to analyze
    path_filter: PathFilter,
    /// C/C++ naming analyzer
    cpp_analyzer: CppAnalyzer,
}

/// Options for customizing analysis behavior
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Whether to use parallel processing
    pub parallel: bool,
    /// Whether to continue on errors or fail fast
    pub fail_fast: bool,
    /// Additional paths to exclude (temporary)
    pub exclude_patterns: Vec<String>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            fail_fast: false,
            exclude_patterns: Vec::new(),
        }
    }
}

impl Analyzer {
    /// Create a new analyzer with the given configuration
    pub fn new(config: GuardConfig) -> GuardResult<Self> {
        let path_filter = PathFilter::new(&config.paths.patterns)
            .map_err(|e| GuardError::config(format!("Failed to create path filter: {e}")))?;
        let cpp_analyzer = CppAnalyzer::new(&config);

        tracing::debug!("Analyzer ready with rules {:?}", cpp_analyzer.engine());

        Ok(Self {
            config,
            path_filter,
            cpp_analyzer,
        })
    }

    /// Create an analyzer with default configuration
    pub fn with_defaults() -> GuardResult<Self> {
        Self::new(GuardConfig::default())
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Analyze a single file.
    ///
    /// Returns `Ok(None)` when the file's extension is not one we check.
    pub fn analyze_file<P: AsRef<Path>>(&self, file_path: P) -> GuardResult<Option<StyleReport>> {
        let file_path = file_path.as_ref();

        if !self.cpp_analyzer.handles_file(file_path) {
            return Ok(None);
        }

        let bytes = fs::read(file_path).map_err(|e| {
            GuardError::analysis(
                file_path.display().to_string(),
                format!("Failed to read file: {e}"),
            )
        })?;

        let (content, lossy) = decode_lenient(&bytes);
        if lossy {
            tracing::debug!("Dropped invalid UTF-8 sequences in {}", file_path.display());
        }

        self.cpp_analyzer.analyze(file_path, &content).map(Some)
    }

    /// Files that a run over `root` would check, in check order
    pub fn discover_files<P: AsRef<Path>>(
        &self,
        root: P,
        options: &AnalysisOptions,
    ) -> GuardResult<Vec<PathBuf>> {
        let filter = self.filter_with(options)?;
        Ok(filter.find_files(root, &self.config.paths.extensions))
    }

    fn filter_with(&self, options: &AnalysisOptions) -> GuardResult<PathFilter> {
        let mut filter = self.path_filter.clone();
        for pattern in &options.exclude_patterns {
            filter.add_pattern(pattern)?;
        }
        Ok(filter)
    }

    /// Analyze multiple files and directories and return a complete report
    pub fn analyze_paths<P: AsRef<Path>>(
        &self,
        paths: &[P],
        options: &AnalysisOptions,
    ) -> GuardResult<StyleReport> {
        let start_time = Instant::now();
        let filter = self.filter_with(options)?;

        let mut files_to_analyze = Vec::new();
        for path in paths {
            let path = path.as_ref();

            if path.is_file() {
                if filter.should_analyze(path) {
                    files_to_analyze.push(path.to_path_buf());
                } else {
                    tracing::debug!(
                        "Skipping excluded file {}: {:?}",
                        path.display(),
                        filter.debug_patterns(path)
                    );
                }
            } else if path.is_dir() {
                files_to_analyze.extend(filter.find_files(path, &self.config.paths.extensions));
            }
        }

        let results: Vec<(&PathBuf, GuardResult<Option<StyleReport>>)> =
            if options.parallel && files_to_analyze.len() > 1 {
                files_to_analyze
                    .par_iter()
                    .map(|file_path| (file_path, self.analyze_file(file_path)))
                    .collect()
            } else {
                files_to_analyze
                    .iter()
                    .map(|file_path| (file_path, self.analyze_file(file_path)))
                    .collect()
            };

        let mut report = StyleReport::new();
        for (file_path, result) in results {
            match result {
                Ok(Some(file_report)) => report.merge(file_report),
                Ok(None) => {}
                Err(e) if options.fail_fast => return Err(e),
                Err(e) => {
                    tracing::warn!("Failed to analyze {}: {}", file_path.display(), e);
                }
            }
        }

        report.set_execution_time(u64::try_from(start_time.elapsed().as_millis()).unwrap_or(u64::MAX));
        report.set_config_fingerprint(self.config.fingerprint());

        Ok(report)
    }

    /// Analyze a directory tree and return a validation report
    pub fn analyze_directory<P: AsRef<Path>>(
        &self,
        root: P,
        options: &AnalysisOptions,
    ) -> GuardResult<StyleReport> {
        self.analyze_paths(&[root.as_ref()], options)
    }
}

/// Trait for custom file analyzers
pub trait FileAnalyzer {
    /// Analyze file content and return a single-file report
    fn analyze(&self, file_path: &Path, content: &str) -> GuardResult<StyleReport>;

    /// Check if this analyzer handles the given file type
    fn handles_file(&self, file_path: &Path) -> bool;
}

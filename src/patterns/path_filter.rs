//! Path filtering using .gitignore-style patterns
//!
//! Architectural Principle: Service Layer - PathFilter orchestrates path matching logic
//! - Encapsulates the rules for include/exclude pattern evaluation
//! - Patterns are matched against paths relative to the walk root
//! - Discovery order is stable: extension by extension, sorted by path

use crate::domain::violations::{GuardError, GuardResult};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Manages path filtering using .gitignore-style patterns
#[derive(Debug, Clone)]
pub struct PathFilter {
    /// Include/exclude patterns, applied in order
    patterns: Vec<FilterPattern>,
}

/// A single path filter pattern
#[derive(Debug, Clone)]
struct FilterPattern {
    /// The glob pattern, without `!` or a leading `/`
    pattern: glob::Pattern,
    /// `**/x` also matches `x` at the top level
    top_level: Option<glob::Pattern>,
    /// Whether this is an include pattern (starts with !)
    is_include: bool,
    /// Original pattern string, without the `!`
    original: String,
}

impl FilterPattern {
    fn parse(raw: &str) -> GuardResult<Self> {
        let (is_include, pattern_str) = match raw.strip_prefix('!') {
            Some(stripped) => (true, stripped),
            None => (false, raw),
        };
        let body = pattern_str.strip_prefix('/').unwrap_or(pattern_str);

        let compile = |glob_str: &str| {
            glob::Pattern::new(glob_str)
                .map_err(|e| GuardError::pattern(format!("Invalid pattern '{pattern_str}': {e}")))
        };

        Ok(Self {
            pattern: compile(body)?,
            top_level: body.strip_prefix("**/").map(compile).transpose()?,
            is_include,
            original: pattern_str.to_string(),
        })
    }

    /// Patterns with no slash match the file name, others match the full relative path
    fn matches(&self, path: &Path) -> bool {
        if self.original.contains('/') {
            self.pattern.matches_path(path)
                || self
                    .top_level
                    .as_ref()
                    .is_some_and(|pattern| pattern.matches_path(path))
        } else {
            path.file_name()
                .is_some_and(|name| self.pattern.matches(&name.to_string_lossy()))
        }
    }
}

impl PathFilter {
    /// Create a new path filter with the given patterns
    pub fn new(patterns: &[String]) -> GuardResult<Self> {
        let patterns = patterns
            .iter()
            .map(|raw| FilterPattern::parse(raw))
            .collect::<GuardResult<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// Check if a file should be analyzed; later patterns override earlier ones
    pub fn should_analyze<P: AsRef<Path>>(&self, path: P) -> bool {
        let path = path.as_ref();
        let mut should_include = true;

        for pattern in &self.patterns {
            if pattern.matches(path) {
                should_include = pattern.is_include;
            }
        }

        should_include
    }

    /// Add a pattern to the filter
    pub fn add_pattern(&mut self, pattern: &str) -> GuardResult<()> {
        self.patterns.push(FilterPattern::parse(pattern)?);
        Ok(())
    }

    /// Files under `root` with one of `extensions`, grouped by extension in the
    /// given order and sorted by path within each group.
    pub fn find_files<P: AsRef<Path>>(&self, root: P, extensions: &[String]) -> Vec<PathBuf> {
        let root = root.as_ref();
        let mut candidates: Vec<PathBuf> = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| {
                let relative = path.strip_prefix(root).unwrap_or(path);
                self.should_analyze(relative)
            })
            .collect();
        candidates.sort();

        let mut files = Vec::with_capacity(candidates.len());
        for extension in extensions {
            files.extend(
                candidates
                    .iter()
                    .filter(|path| has_extension(path, extension))
                    .cloned(),
            );
        }

        tracing::debug!("Discovered {} files under {}", files.len(), root.display());
        files
    }

    /// Get debug information about patterns and their matches
    pub fn debug_patterns<P: AsRef<Path>>(&self, path: P) -> Vec<String> {
        let path = path.as_ref();

        self.patterns
            .iter()
            .enumerate()
            .map(|(i, pattern)| {
                let prefix = if pattern.is_include { "!" } else { "" };
                let verdict = if pattern.matches(path) { "MATCH" } else { "no match" };
                format!("Pattern {}: {}{} -> {}", i, prefix, pattern.original, verdict)
            })
            .collect()
    }
}

/// Whether `path` ends in `.{extension}`
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|ext| ext == extension)
}

//! Target path validation for the command line
//!
//! The raw argument is checked before it touches the file system: no `..`
//! segments, a narrow character allowlist, and after canonicalisation it must
//! exist and stay inside the project root.

use crate::domain::violations::{GuardError, GuardResult};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static ALLOWED_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9\\/:._ -]+$").expect("path allowlist regex is valid"));

/// Directory checked when no path argument is given
pub const DEFAULT_TARGET_DIR: &str = "src";

/// Resolve the path argument against `root`.
///
/// `None` means `<root>/src`. Relative paths are taken relative to `root`.
pub fn resolve_target(raw: Option<&str>, root: &Path) -> GuardResult<PathBuf> {
    let root = root.canonicalize().map_err(|e| {
        GuardError::argument(format!(
            "Error: Project root '{}' is not accessible: {e}",
            root.display()
        ))
    })?;

    let Some(raw) = raw else {
        let target = root.join(DEFAULT_TARGET_DIR);
        if !target.exists() {
            return Err(GuardError::argument(format!(
                "Error: Path '{}' does not exist",
                target.display()
            )));
        }
        return Ok(target);
    };

    if raw.contains("..") {
        return Err(GuardError::argument(format!(
            "Error: Path '{raw}' contains directory traversal"
        )));
    }

    if !ALLOWED_PATH.is_match(raw) {
        return Err(GuardError::argument(format!(
            "Error: Path '{raw}' contains disallowed characters"
        )));
    }

    let candidate = root.join(raw);
    let resolved = candidate
        .canonicalize()
        .map_err(|_| GuardError::argument(format!("Error: Path '{raw}' does not exist")))?;

    if !resolved.starts_with(&root) {
        return Err(GuardError::argument(format!(
            "Error: Path '{raw}' is outside the project directory"
        )));
    }

    tracing::debug!("Resolved target '{}' to {}", raw, resolved.display());
    Ok(resolved)
}

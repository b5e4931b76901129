//! Configuration loading and management for naming-guard
//!
//! Architecture: Anti-Corruption Layer - Configuration translates external YAML formats
//! - Raw YAML structures are converted to clean domain objects
//! - Built-in conventions and exemption registries live in the Default impls
//! - Every section is optional in YAML and falls back to those defaults

use crate::domain::violations::{GuardError, GuardResult, Severity};
use crate::patterns::rules::BUILTIN_RULE_IDS;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File names probed in the project root when no `--config` is given
pub const DEFAULT_CONFIG_FILES: [&str; 3] =
    ["naming_guard.yaml", "naming_guard.yml", ".naming_guard.yaml"];

const SUPPORTED_VERSIONS: [&str; 1] = ["1.0"];

/// Main configuration structure for naming-guard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Configuration format version
    pub version: String,
    /// Which files are checked
    #[serde(default)]
    pub paths: PathConfig,
    /// Required prefixes and indentation thresholds
    #[serde(default)]
    pub naming: NamingConventions,
    /// Names that bypass the naming rules
    #[serde(default)]
    pub exemptions: ExemptionConfig,
    /// Per-rule switches, keyed by rule id
    #[serde(default)]
    pub rules: BTreeMap<String, RuleSettings>,
    /// Report presentation
    #[serde(default)]
    pub report: ReportConfig,
    /// Analysis behaviour toggles
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// File selection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Extensions to check, in the order their files are visited
    pub extensions: Vec<String>,
    /// Exclude patterns (gitignore-style, `!` re-includes)
    pub patterns: Vec<String>,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["cpp".to_string(), "h".to_string()],
            patterns: vec![
                "**/v8/**".to_string(),
                "**/libs/**".to_string(),
                "temporal_shims.cpp".to_string(),
            ],
        }
    }
}

/// Naming conventions for variables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConventions {
    /// Prefix for plain member variables
    pub member_prefix: String,
    /// Prefix for raw pointers and reference members
    pub pointer_prefix: String,
    /// Prefix for `unique_ptr` holders
    pub unique_prefix: String,
    /// Prefix for `shared_ptr` holders
    pub shared_prefix: String,
    /// Prefix for `weak_ptr` holders
    pub weak_prefix: String,
    /// Minimum indentation (tab = 4 columns) for a line to count as a statement body
    pub local_min_indent: usize,
}

impl NamingConventions {
    /// All configured prefixes, longest first so `up_` wins over `p_`
    pub fn all_prefixes(&self) -> Vec<&str> {
        let mut prefixes = vec![
            self.member_prefix.as_str(),
            self.pointer_prefix.as_str(),
            self.unique_prefix.as_str(),
            self.shared_prefix.as_str(),
            self.weak_prefix.as_str(),
        ];
        prefixes.sort_by_key(|p| std::cmp::Reverse(p.len()));
        prefixes
    }
}

impl Default for NamingConventions {
    fn default() -> Self {
        Self {
            member_prefix: "m_".to_string(),
            pointer_prefix: "p_".to_string(),
            unique_prefix: "up_".to_string(),
            shared_prefix: "sp_".to_string(),
            weak_prefix: "wp_".to_string(),
            local_min_indent: 4,
        }
    }
}

/// User-adjustable exemption registries
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExemptionConfig {
    /// C/POSIX structs whose names are fixed by the platform
    pub system_structs: Vec<String>,
    /// Macros that shadow platform functions or types
    pub system_macros: Vec<String>,
    /// Platform ABI integral and handle aliases
    pub platform_types: Vec<String>,
    /// Namespaces whose methods follow someone else's style guide
    pub external_namespaces: Vec<String>,
    /// Class name prefixes that skip the PascalCase check
    pub class_prefixes: Vec<String>,
    /// Identifiers never treated as declarations
    pub ignored_identifiers: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for ExemptionConfig {
    fn default() -> Self {
        Self {
            system_structs: strings(&[
                "stat", "_stat", "_stat64", "timeval", "timespec", "tm", "sockaddr",
                "sockaddr_in", "sockaddr_in6", "sockaddr_storage", "addrinfo", "dirent",
                "pollfd", "iovec", "utsname", "passwd", "rusage", "rlimit", "termios",
                "winsize", "sigaction", "in_addr", "in6_addr", "hostent", "linger", "flock",
            ]),
            system_macros: strings(&[
                "isatty", "fileno", "getcwd", "chdir", "unlink", "access", "strdup",
                "strcasecmp", "strncasecmp", "snprintf", "ssize_t", "stat", "fstat", "lseek",
                "popen", "pclose", "mkdir", "rmdir", "getpid",
            ]),
            platform_types: strings(&[
                "DWORD", "WORD", "BYTE", "BOOL", "BOOLEAN", "UINT", "ULONG", "LONG", "LONGLONG",
                "ULONGLONG", "ULONG_PTR", "DWORD_PTR", "SIZE_T", "SSIZE_T", "HANDLE", "HMODULE",
                "HINSTANCE", "HWND", "HKEY", "LPVOID", "LPCVOID", "LPSTR", "LPCSTR", "LPWSTR",
                "LPCWSTR", "LPDWORD", "WCHAR", "TCHAR", "SOCKET", "OVERLAPPED", "LARGE_INTEGER",
                "FILETIME", "SYSTEMTIME", "WSADATA", "SECURITY_ATTRIBUTES", "ssize_t", "pid_t",
                "uid_t", "gid_t", "mode_t", "off_t", "socklen_t",
            ]),
            external_namespaces: strings(&["std", "v8", "uv", "simdutf", "ada", "boost"]),
            class_prefixes: strings(&["_", "GLFW", "SDL_"]),
            ignored_identifiers: strings(&[
                "i", "j", "k", "n", "it", "argc", "argv", "const", "override", "final",
                "default", "delete", "noexcept", "return", "true", "false", "nullptr", "this",
                "operator", "void",
            ]),
        }
    }
}

/// Switches for a single rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSettings {
    /// Whether this rule runs
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Severity override (uses the rule's default if not specified)
    #[serde(default)]
    pub severity: Option<Severity>,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            severity: None,
        }
    }
}

/// Report presentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Warnings printed before collapsing into "... and N more"
    pub warning_display_limit: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            warning_display_limit: 20,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Skip content inside `/* ... */` comments, including multi-line ones
    pub track_block_comments: bool,
}

impl GuardConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> GuardResult<Self> {
        let contents = fs::read_to_string(&path).map_err(|e| {
            GuardError::config(format!(
                "Failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: Self = serde_yaml::from_str(&contents).map_err(|e| {
            GuardError::config(format!(
                "Failed to parse config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from string content
    pub fn load_from_str(content: &str) -> GuardResult<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| GuardError::config(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Look for one of the default config files under `root`, falling back to defaults
    pub fn discover(root: &Path) -> GuardResult<Self> {
        match Self::find_config_file(root) {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                Self::load_from_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// First default config file present under `root`
    pub fn find_config_file(root: &Path) -> Option<PathBuf> {
        DEFAULT_CONFIG_FILES
            .iter()
            .map(|name| root.join(name))
            .find(|candidate| candidate.is_file())
    }

    /// Validate the configuration for consistency and correctness
    pub fn validate(&self) -> GuardResult<()> {
        if !SUPPORTED_VERSIONS.contains(&self.version.as_str()) {
            return Err(GuardError::config(format!(
                "Unsupported configuration version: {}. Supported versions: {}",
                self.version,
                SUPPORTED_VERSIONS.join(", ")
            )));
        }

        if self.paths.extensions.is_empty() {
            return Err(GuardError::config("At least one file extension must be configured"));
        }

        for pattern in &self.paths.patterns {
            let pattern_str = pattern.strip_prefix('!').unwrap_or(pattern);
            glob::Pattern::new(pattern_str).map_err(|e| {
                GuardError::config(format!("Invalid path pattern '{pattern}': {e}"))
            })?;
        }

        for rule_id in self.rules.keys() {
            if !BUILTIN_RULE_IDS.contains(&rule_id.as_str()) {
                return Err(GuardError::config(format!(
                    "Unknown rule '{}'. Available rules: {}",
                    rule_id,
                    BUILTIN_RULE_IDS.join(", ")
                )));
            }
        }

        let naming = &self.naming;
        let prefixes = [
            ("member_prefix", &naming.member_prefix),
            ("pointer_prefix", &naming.pointer_prefix),
            ("unique_prefix", &naming.unique_prefix),
            ("shared_prefix", &naming.shared_prefix),
            ("weak_prefix", &naming.weak_prefix),
        ];
        for (key, prefix) in prefixes {
            if prefix.is_empty() {
                return Err(GuardError::config(format!("naming.{key} must not be empty")));
            }
        }

        Ok(())
    }

    /// Settings for a rule, falling back to enabled with the default severity
    pub fn rule_settings(&self, rule_id: &str) -> RuleSettings {
        self.rules.get(rule_id).copied().unwrap_or_default()
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> GuardResult<String> {
        serde_yaml::to_string(self)
            .map_err(|e| GuardError::config(format!("Failed to serialize config: {e}")))
    }

    /// Create a fingerprint of the configuration for the report
    pub fn fingerprint(&self) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();

        // BTreeMap and Vec fields serialize in a stable order
        match serde_json::to_string(self) {
            Ok(json) => json.hash(&mut hasher),
            Err(e) => {
                tracing::debug!("Falling back to version-only fingerprint: {e}");
                self.version.hash(&mut hasher);
            }
        }

        format!("{:x}", hasher.finish())
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            paths: PathConfig::default(),
            naming: NamingConventions::default(),
            exemptions: ExemptionConfig::default(),
            rules: BTreeMap::new(),
            report: ReportConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Configuration builder for programmatic construction
pub struct ConfigBuilder {
    config: GuardConfig,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: GuardConfig::default(),
        }
    }

    /// Add a path pattern
    pub fn add_path_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.paths.patterns.push(pattern.into());
        self
    }

    /// Replace the checked extensions
    pub fn extensions(mut self, extensions: &[&str]) -> Self {
        self.config.paths.extensions = strings(extensions);
        self
    }

    /// Configure a single rule
    pub fn rule(mut self, rule_id: impl Into<String>, settings: RuleSettings) -> Self {
        self.config.rules.insert(rule_id.into(), settings);
        self
    }

    /// Replace the naming conventions
    pub fn naming(mut self, naming: NamingConventions) -> Self {
        self.config.naming = naming;
        self
    }

    /// Enable or disable block comment tracking
    pub fn track_block_comments(mut self, enabled: bool) -> Self {
        self.config.analysis.track_block_comments = enabled;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> GuardResult<GuardConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

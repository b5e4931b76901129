//! Exemption registry: names that bypass the naming rules
//!
//! Architectural Principle: Value Objects - the registry is built once per run and shared
//! read-only across worker threads; per-file namespace aliases live in a short-lived view

use crate::config::ExemptionConfig;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static NAMESPACE_ALIAS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*namespace\s+(\w+)\s*=\s*[\w:]+\s*;").expect("namespace alias regex is valid")
});

/// Immutable registries compiled from `exemptions:` configuration
#[derive(Debug, Clone, Default)]
pub struct ExemptionSet {
    system_structs: HashSet<String>,
    system_macros: HashSet<String>,
    platform_types: HashSet<String>,
    external_namespaces: HashSet<String>,
    class_prefixes: Vec<String>,
    ignored_identifiers: HashSet<String>,
}

fn to_set(items: &[String]) -> HashSet<String> {
    items.iter().cloned().collect()
}

impl ExemptionSet {
    pub fn new(config: &ExemptionConfig) -> Self {
        Self {
            system_structs: to_set(&config.system_structs),
            system_macros: to_set(&config.system_macros),
            platform_types: to_set(&config.platform_types),
            external_namespaces: to_set(&config.external_namespaces),
            class_prefixes: config.class_prefixes.clone(),
            ignored_identifiers: to_set(&config.ignored_identifiers),
        }
    }

    /// Scan a whole file for `namespace alias = path;` and return a view that
    /// treats those aliases as external namespaces.
    pub fn for_file(&self, content: &str) -> FileExemptions<'_> {
        let aliases = content
            .lines()
            .filter_map(|line| NAMESPACE_ALIAS.captures(line))
            .map(|caps| caps[1].to_string())
            .collect::<HashSet<_>>();

        if !aliases.is_empty() {
            tracing::debug!("Discovered namespace aliases: {:?}", aliases);
        }

        FileExemptions {
            registry: self,
            aliases,
        }
    }
}

/// Registry view for a single file
#[derive(Debug)]
pub struct FileExemptions<'a> {
    registry: &'a ExemptionSet,
    aliases: HashSet<String>,
}

impl FileExemptions<'_> {
    pub fn is_system_struct(&self, name: &str) -> bool {
        self.registry.system_structs.contains(name)
    }

    pub fn is_system_macro(&self, name: &str) -> bool {
        self.registry.system_macros.contains(name)
    }

    pub fn is_platform_type(&self, name: &str) -> bool {
        self.registry.platform_types.contains(name)
    }

    /// Registry namespace or an alias declared in this file
    pub fn is_external_namespace(&self, name: &str) -> bool {
        self.registry.external_namespaces.contains(name) || self.aliases.contains(name)
    }

    pub fn has_allowed_class_prefix(&self, name: &str) -> bool {
        self.registry
            .class_prefixes
            .iter()
            .any(|prefix| name.starts_with(prefix.as_str()))
    }

    pub fn is_ignored_identifier(&self, name: &str) -> bool {
        self.registry.ignored_identifiers.contains(name)
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.aliases.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_set() -> ExemptionSet {
        ExemptionSet::new(&ExemptionConfig::default())
    }

    #[test]
    fn test_default_registries() {
        let set = default_set();
        let file = set.for_file("");

        assert!(file.is_system_struct("timespec"));
        assert!(file.is_system_macro("isatty"));
        assert!(file.is_platform_type("DWORD"));
        assert!(file.is_external_namespace("v8"));
        assert!(file.has_allowed_class_prefix("GLFWwindow"));
        assert!(file.has_allowed_class_prefix("_internal"));
        assert!(file.is_ignored_identifier("argc"));

        assert!(!file.is_external_namespace("engine"));
        assert!(!file.has_allowed_class_prefix("window"));
    }

    #[test]
    fn test_namespace_aliases_are_per_file() {
        let set = default_set();
        let content = "#include <filesystem>\nnamespace fs = std::filesystem;\n  namespace io = boost::asio ;\n";

        let file = set.for_file(content);
        assert!(file.is_external_namespace("fs"));
        assert!(file.is_external_namespace("io"));
        assert_eq!(file.aliases().count(), 2);

        let other = set.for_file("namespace engine {\n}\n");
        assert!(!other.is_external_namespace("fs"));
        assert!(!other.is_external_namespace("engine"));
    }

    #[test]
    fn test_custom_registries_replace_defaults() {
        let config = ExemptionConfig {
            external_namespaces: vec!["qt".to_string()],
            ..ExemptionConfig::default()
        };
        let set = ExemptionSet::new(&config);
        let file = set.for_file("");

        assert!(file.is_external_namespace("qt"));
        assert!(!file.is_external_namespace("std"));
    }
}

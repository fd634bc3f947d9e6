//! Zone resolver
//!
//! Composes the override locator, the registry lookup and the inheritance
//! resolver into a single total operation. Resolution runs in one pass:
//!
//! 1. Override check: a marker in the resolved directory forces the zone
//! 2. Pattern match: first registry hit, zone order before pattern order
//! 3. Fallback: the reserved `default` zone
//! 4. Inheritance expansion: always runs and always terminates

use crate::config::AppConfig;
use crate::zones::inheritance::resolve_chain;
use crate::zones::overrides::OverrideLocator;
use crate::zones::patterns::PathMatcher;
use crate::zones::registry::{RegistryDiagnostic, ZoneRegistry, load_registry};
use crate::zones::types::{DEFAULT_ZONE, DEFAULT_ZONE_CONFIG, ResolutionSource, ResolvedZone};
use crate::util::normalize_path;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Zone resolver
///
/// Built fresh for each use from configuration the caller owns; it holds no
/// state beyond its inputs.
#[derive(Debug, Clone)]
pub struct ZoneResolver {
    registry: ZoneRegistry,
    matcher: PathMatcher,
    overrides: OverrideLocator,
    diagnostic: Option<RegistryDiagnostic>,
}

impl ZoneResolver {
    /// Create a resolver from explicit parts
    pub fn new(registry: ZoneRegistry, matcher: PathMatcher, overrides: OverrideLocator) -> Self {
        Self {
            registry,
            matcher,
            overrides,
            diagnostic: None,
        }
    }

    /// Create a resolver from application settings, reading the registry file
    ///
    /// Registry problems never fail construction; see [`Self::diagnostic`].
    pub fn from_config(config: &AppConfig) -> Self {
        let registry_path = config.zones.registry_path();
        let loaded = load_registry(registry_path.as_deref(), config.zones.builtin_defaults);

        let overrides = OverrideLocator::new(config.overrides.file_name.clone())
            .with_search_depth(config.overrides.search_depth);

        Self {
            registry: loaded.registry,
            matcher: PathMatcher::from_env(),
            overrides,
            diagnostic: loaded.diagnostic,
        }
    }

    /// The registry this resolver walks
    pub fn registry(&self) -> &ZoneRegistry {
        &self.registry
    }

    /// Problem found while loading the registry, if any
    pub fn diagnostic(&self) -> Option<&RegistryDiagnostic> {
        self.diagnostic.as_ref()
    }

    /// Resolve `path` to a zone
    ///
    /// Relative paths should be made absolute by the caller.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn resolve(&self, path: &Path) -> ResolvedZone {
        let current = normalize_path(path);

        // 1. Override marker
        if let Some(zone) = self.overrides.find_override(&current) {
            debug!(zone = %zone, "Zone forced by override marker");
            return self.finish(zone, None, current, ResolutionSource::Override);
        }

        // 2. Registry patterns
        if let Some(hit) = self.registry.find_match(&current, &self.matcher) {
            let zone = hit.zone.to_string();
            let pattern = hit.pattern.to_string();
            return self.finish(zone, Some(pattern), current, ResolutionSource::Pattern);
        }

        // 3. Fallback
        debug!("No zone matched, using fallback");
        self.finish(
            DEFAULT_ZONE.to_string(),
            None,
            current,
            ResolutionSource::Fallback,
        )
    }

    /// Resolve a zone chosen by name rather than by path
    pub fn resolve_named(&self, zone: &str, path: &Path) -> ResolvedZone {
        self.finish(
            zone.to_string(),
            None,
            normalize_path(path),
            ResolutionSource::Override,
        )
    }

    fn finish(
        &self,
        zone: String,
        matched_pattern: Option<String>,
        path: PathBuf,
        source: ResolutionSource,
    ) -> ResolvedZone {
        // 4. Inheritance expansion
        let inheritance_chain = resolve_chain(&zone, &self.registry);

        let config = if source == ResolutionSource::Fallback {
            DEFAULT_ZONE_CONFIG.to_string()
        } else {
            self.registry.config_ref(&zone)
        };

        ResolvedZone {
            zone,
            config,
            matched_pattern,
            inheritance_chain,
            path: path.to_string_lossy().into_owned(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zones::registry::ZoneDefinition;
    use crate::zones::types::OVERRIDE_FILE_NAME;
    use std::fs;

    fn resolver(registry: ZoneRegistry) -> ZoneResolver {
        ZoneResolver::new(
            registry,
            PathMatcher::new(Some(PathBuf::from("/home/ada"))),
            OverrideLocator::default(),
        )
    }

    #[test]
    fn test_pattern_resolution() {
        let resolved = resolver(ZoneRegistry::builtin())
            .resolve(Path::new("/home/ada/Projects/.worktrees/feature-x"));

        // "~/Projects" in development precedes parallel's worktree pattern
        assert_eq!(resolved.zone, "development");
        assert_eq!(resolved.matched_pattern.as_deref(), Some("~/Projects"));
        assert_eq!(resolved.config, "zones/development.md");
        assert_eq!(resolved.source, ResolutionSource::Pattern);
    }

    #[test]
    fn test_parallel_zone_inherits_development() {
        let resolved =
            resolver(ZoneRegistry::builtin()).resolve(Path::new("/home/ada/Code-other/.x"));
        assert!(resolved.is_fallback());

        let mut registry = ZoneRegistry::new();
        registry.insert(
            "parallel",
            ZoneDefinition::new(["*/*/.worktrees/*"], "zones/parallel.md")
                .inheriting(["development"]),
        );
        registry.insert("development", ZoneDefinition::new(["/srv"], "zones/development.md"));

        let resolved = resolver(registry).resolve(Path::new("/srv/repo/.worktrees/topic"));
        assert_eq!(resolved.zone, "parallel");
        assert_eq!(resolved.inheritance_chain, vec!["parallel", "development"]);
    }

    #[test]
    fn test_fallback() {
        let resolved = resolver(ZoneRegistry::builtin()).resolve(Path::new("/opt/elsewhere"));
        assert_eq!(resolved.zone, DEFAULT_ZONE);
        assert_eq!(resolved.config, DEFAULT_ZONE_CONFIG);
        assert_eq!(resolved.matched_pattern, None);
        assert_eq!(resolved.inheritance_chain, vec![DEFAULT_ZONE]);
    }

    #[test]
    fn test_fallback_config_ignores_registry_default_entry() {
        let mut registry = ZoneRegistry::new();
        registry.insert("default", ZoneDefinition::new(Vec::<String>::new(), "custom.md"));

        let resolved = resolver(registry).resolve(Path::new("/opt/elsewhere"));
        assert_eq!(resolved.config, DEFAULT_ZONE_CONFIG);
    }

    #[test]
    fn test_override_short_circuits_patterns() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(OVERRIDE_FILE_NAME), "# note\nfinance\n").unwrap();

        let mut registry = ZoneRegistry::new();
        registry.insert("everything", ZoneDefinition::new(["/"], "e.md"));
        registry.insert("finance", ZoneDefinition::new(["/nowhere"], "zones/finance.md"));

        let resolved = resolver(registry).resolve(dir.path());
        assert_eq!(resolved.zone, "finance");
        assert_eq!(resolved.matched_pattern, None);
        assert_eq!(resolved.config, "zones/finance.md");
        assert!(resolved.is_override());
    }

    #[test]
    fn test_override_to_unknown_zone() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(OVERRIDE_FILE_NAME), "mystery\n").unwrap();

        let resolved = resolver(ZoneRegistry::new()).resolve(dir.path());
        assert_eq!(resolved.zone, "mystery");
        assert_eq!(resolved.config, "zones/mystery.md");
        assert_eq!(resolved.inheritance_chain, vec!["mystery"]);
    }

    #[test]
    fn test_resolve_named() {
        let resolved =
            resolver(ZoneRegistry::builtin()).resolve_named("parallel", Path::new("/anywhere"));
        assert_eq!(resolved.inheritance_chain, vec!["parallel", "development"]);
        assert_eq!(resolved.source, ResolutionSource::Override);
    }
}

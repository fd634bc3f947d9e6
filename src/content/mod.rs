//! Zone behavior text
//!
//! Resolves a zone's config reference to text. Each content directory is
//! tried in order (`<dir>/<reference>`), then the bodies compiled into the
//! binary for the built-in zones. Missing content is never an error for
//! callers of [`ContentLoader::load`]; they get a sentinel instead.

use crate::config::AppConfig;
use crate::error::ContentError;
use crate::zones::inheritance::resolve_chain;
use crate::zones::registry::ZoneRegistry;
use std::path::PathBuf;
use tracing::{debug, trace};

/// Built-in zone bodies, keyed by config reference
const BUILTIN_CONTENT: &[(&str, &str)] = &[
    ("zones/career.md", include_str!("../../zones/career.md")),
    ("zones/finance.md", include_str!("../../zones/finance.md")),
    ("zones/development.md", include_str!("../../zones/development.md")),
    ("zones/research.md", include_str!("../../zones/research.md")),
    ("zones/parallel.md", include_str!("../../zones/parallel.md")),
    ("zones/default.md", include_str!("../../zones/default.md")),
];

/// Sentinel returned when a reference cannot be read
pub fn not_found_sentinel(reference: &str) -> String {
    format!("# Zone config not found: {}", reference)
}

/// Header placed before each zone section of an inherited config
pub fn section_header(zone: &str) -> String {
    format!("# === Zone: {} ===\n", zone)
}

/// Loads zone behavior text
#[derive(Debug, Clone)]
pub struct ContentLoader {
    dirs: Vec<PathBuf>,
    builtin: bool,
}

impl ContentLoader {
    /// Search `dirs` in order, then the built-in bodies
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self {
            dirs,
            builtin: true,
        }
    }

    /// Only search `dirs`
    pub fn without_builtin(mut self) -> Self {
        self.builtin = false;
        self
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.zones.content_paths())
    }

    /// Read the text behind a config reference
    pub fn try_load(&self, reference: &str) -> Result<String, ContentError> {
        for dir in &self.dirs {
            let candidate = dir.join(reference);
            match std::fs::read_to_string(&candidate) {
                Ok(text) => {
                    debug!(path = %candidate.display(), "Loaded zone content");
                    return Ok(text);
                }
                Err(e) => trace!(path = %candidate.display(), error = %e, "Zone content not here"),
            }
        }

        if self.builtin
            && let Some((_, text)) = BUILTIN_CONTENT.iter().find(|(r, _)| *r == reference)
        {
            debug!(reference, "Using built-in zone content");
            return Ok((*text).to_string());
        }

        Err(ContentError::NotFound {
            reference: reference.to_string(),
        })
    }

    /// Read the text behind a config reference, or the not-found sentinel
    pub fn load(&self, reference: &str) -> String {
        self.try_load(reference)
            .unwrap_or_else(|_| not_found_sentinel(reference))
    }

    /// Concatenate the content of `zone` and every zone it inherits from,
    /// most specific first. Zones without content are skipped.
    pub fn load_inherited(&self, zone: &str, registry: &ZoneRegistry) -> String {
        let mut parts: Vec<String> = Vec::new();

        for name in resolve_chain(zone, registry) {
            let reference = registry.config_ref(&name);
            if let Ok(text) = self.try_load(&reference) {
                parts.push(section_header(&name));
                parts.push(text);
                parts.push("\n".to_string());
            }
        }

        if parts.is_empty() {
            return format!("# No config found for zone: {}", zone);
        }

        parts.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zones::registry::ZoneDefinition;
    use std::fs;

    #[test]
    fn test_directory_order() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        fs::create_dir(second.path().join("zones")).unwrap();
        fs::write(second.path().join("zones/ops.md"), "second").unwrap();

        let loader = ContentLoader::new(vec![first.path().into(), second.path().into()]);
        assert_eq!(loader.load("zones/ops.md"), "second");

        fs::create_dir(first.path().join("zones")).unwrap();
        fs::write(first.path().join("zones/ops.md"), "first").unwrap();
        assert_eq!(loader.load("zones/ops.md"), "first");
    }

    #[test]
    fn test_builtin_fallback() {
        let loader = ContentLoader::new(Vec::new());
        assert!(loader.load("zones/finance.md").starts_with("# Finance Zone"));
        assert!(ContentLoader::new(Vec::new())
            .without_builtin()
            .try_load("zones/finance.md")
            .is_err());
    }

    #[test]
    fn test_missing_reference_sentinel() {
        let loader = ContentLoader::new(Vec::new());
        assert_eq!(
            loader.load("zones/nope.md"),
            "# Zone config not found: zones/nope.md"
        );
    }

    #[test]
    fn test_inherited_sections() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("child.md"), "child body").unwrap();
        fs::write(dir.path().join("parent.md"), "parent body").unwrap();

        let mut registry = ZoneRegistry::new();
        registry.insert(
            "child",
            ZoneDefinition::new(Vec::<String>::new(), "child.md").inheriting(["ghost", "parent"]),
        );
        registry.insert("parent", ZoneDefinition::new(Vec::<String>::new(), "parent.md"));

        let loader = ContentLoader::new(vec![dir.path().into()]).without_builtin();
        assert_eq!(
            loader.load_inherited("child", &registry),
            "# === Zone: child ===\n\nchild body\n\n\n# === Zone: parent ===\n\nparent body\n\n"
        );
    }

    #[test]
    fn test_inherited_nothing_found() {
        let loader = ContentLoader::new(Vec::new()).without_builtin();
        assert_eq!(
            loader.load_inherited("mystery", &ZoneRegistry::new()),
            "# No config found for zone: mystery"
        );
    }
}

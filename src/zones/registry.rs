//! Zone registry
//!
//! An ordered mapping of zone name to [`ZoneDefinition`]. Order is part of
//! the contract: lookup walks zones in registry order and, within a zone,
//! patterns in listed order, returning the first hit. A zone listed earlier
//! wins over a more specific pattern in a later zone.

use crate::error::ConfigError;
use crate::zones::patterns::PathMatcher;
use crate::zones::types::conventional_config;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Definition of a single zone
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneDefinition {
    /// Path patterns, first match wins
    #[serde(default)]
    pub paths: Vec<String>,

    /// Zones this zone inherits from, in order. A single name is accepted.
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub inherits: Vec<String>,

    /// Reference to the zone's behavior text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<String>,
}

impl ZoneDefinition {
    pub fn new<I, S>(paths: I, config: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            inherits: Vec::new(),
            config: Some(config.into()),
        }
    }

    pub fn inheriting<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inherits = parents.into_iter().map(Into::into).collect();
        self
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(name) => vec![name],
        OneOrMany::Many(names) => names,
    })
}

/// A registry pattern hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneMatch<'a> {
    pub zone: &'a str,
    pub pattern: &'a str,
}

/// Ordered zone registry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneRegistry {
    zones: Vec<(String, ZoneDefinition)>,
}

impl ZoneRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in registry used when no user configuration is available
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.insert(
            "career",
            ZoneDefinition::new(
                [
                    "~/Desktop/1_PRIORITY_JOB_SEARCH",
                    "~/Documents/Career",
                    "~/Projects/*job*",
                    "~/Projects/*resume*",
                ],
                "zones/career.md",
            ),
        );
        registry.insert(
            "finance",
            ZoneDefinition::new(
                ["~/Documents/Finance", "~/Projects/*budget*", "~/Projects/*tax*"],
                "zones/finance.md",
            ),
        );
        registry.insert(
            "development",
            ZoneDefinition::new(["~/Projects", "~/Code", "~/Developer"], "zones/development.md"),
        );
        registry.insert(
            "research",
            ZoneDefinition::new(
                [
                    "~/Documents/Research",
                    "~/Projects/*research*",
                    "~/Projects/*analysis*",
                ],
                "zones/research.md",
            ),
        );
        registry.insert(
            "parallel",
            ZoneDefinition::new(
                ["~/Projects/.worktrees/*", "*/.worktrees/*"],
                "zones/parallel.md",
            )
            .inheriting(["development"]),
        );
        registry
    }

    /// Insert a zone. An existing zone of the same name is replaced in place,
    /// keeping its position; a new zone is appended.
    pub fn insert(&mut self, name: impl Into<String>, definition: ZoneDefinition) {
        let name = name.into();
        match self.zones.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = definition,
            None => self.zones.push((name, definition)),
        }
    }

    /// Overlay another registry on top of this one
    pub fn merge(&mut self, other: ZoneRegistry) {
        for (name, definition) in other.zones {
            self.insert(name, definition);
        }
    }

    pub fn get(&self, name: &str) -> Option<&ZoneDefinition> {
        self.zones.iter().find(|(n, _)| n == name).map(|(_, d)| d)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Zones in registry order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ZoneDefinition)> {
        self.zones.iter().map(|(n, d)| (n.as_str(), d))
    }

    /// Zone names in registry order
    pub fn names(&self) -> Vec<String> {
        self.zones.iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Effective config reference for a zone, registered or not
    pub fn config_ref(&self, name: &str) -> String {
        self.get(name)
            .and_then(|d| d.config.clone())
            .unwrap_or_else(|| conventional_config(name))
    }

    /// Find the first zone with a pattern matching `path`
    ///
    /// Zones are tried in registry order and, within a zone, patterns in
    /// listed order.
    pub fn find_match(&self, path: &Path, matcher: &PathMatcher) -> Option<ZoneMatch<'_>> {
        for (zone, definition) in &self.zones {
            for pattern in &definition.paths {
                if matcher.matches(path, pattern) {
                    debug!(zone = %zone, pattern = %pattern, "Matched zone pattern");
                    return Some(ZoneMatch { zone, pattern });
                }
            }
        }
        None
    }

    /// Parse a registry from JSON
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(source).map_err(|e| ConfigError::Load(e.to_string()))
    }

    /// Parse a registry from TOML
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|e| ConfigError::Load(e.to_string()))
    }

    /// Read a registry file, choosing the format by extension (JSON unless `.toml`)
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&source),
            _ => Self::from_json_str(&source),
        }
    }
}

impl Serialize for ZoneRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.zones.len()))?;
        for (name, definition) in &self.zones {
            map.serialize_entry(name, definition)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ZoneRegistry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RegistryVisitor;

        impl<'de> Visitor<'de> for RegistryVisitor {
            type Value = ZoneRegistry;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of zone name to zone definition")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut registry = ZoneRegistry::new();
                // Entries arrive in document order
                while let Some((name, definition)) =
                    access.next_entry::<String, ZoneDefinition>()?
                {
                    registry.insert(name, definition);
                }
                Ok(registry)
            }
        }

        deserializer.deserialize_map(RegistryVisitor)
    }
}

/// A non-fatal problem found while loading the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryDiagnostic {
    /// File that could not be used
    pub path: PathBuf,
    /// What went wrong
    pub message: String,
}

impl fmt::Display for RegistryDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ignoring zone registry {}: {}",
            self.path.display(),
            self.message
        )
    }
}

/// Registry produced by [`load_registry`] together with any diagnostic
#[derive(Debug, Clone)]
pub struct LoadedRegistry {
    pub registry: ZoneRegistry,
    pub diagnostic: Option<RegistryDiagnostic>,
}

/// Load the effective registry
///
/// User zones from `path` are merged over the built-in zones (or used alone
/// when `with_builtin` is false). A missing file yields the built-ins; an
/// unreadable or malformed file yields the built-ins plus a diagnostic. This
/// never fails.
pub fn load_registry(path: Option<&Path>, with_builtin: bool) -> LoadedRegistry {
    let builtin = ZoneRegistry::builtin();

    let Some(path) = path else {
        return LoadedRegistry {
            registry: builtin,
            diagnostic: None,
        };
    };

    if !path.exists() {
        debug!(path = %path.display(), "No user zone registry, using built-in zones");
        return LoadedRegistry {
            registry: builtin,
            diagnostic: None,
        };
    }

    match ZoneRegistry::from_file(path) {
        Ok(user) => {
            debug!(path = %path.display(), zones = user.len(), "Loaded user zone registry");
            let registry = if with_builtin {
                let mut merged = builtin;
                merged.merge(user);
                merged
            } else {
                user
            };
            LoadedRegistry {
                registry,
                diagnostic: None,
            }
        }
        Err(e) => {
            let diagnostic = RegistryDiagnostic {
                path: path.to_path_buf(),
                message: e.to_string(),
            };
            warn!(%diagnostic, "Falling back to built-in zones");
            LoadedRegistry {
                registry: builtin,
                diagnostic: Some(diagnostic),
            }
        }
    }
}

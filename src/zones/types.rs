//! Zone types
//!
//! Reserved names and the values produced by zone resolution.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the fallback zone used when nothing else applies.
///
/// The fallback does not need to exist in any registry.
pub const DEFAULT_ZONE: &str = "default";

/// Config reference of the fallback zone. Independent of the registry.
pub const DEFAULT_ZONE_CONFIG: &str = "zones/default.md";

/// Default name of the per-directory override marker file
pub const OVERRIDE_FILE_NAME: &str = ".claude-zone";

/// Conventional config reference for a zone that does not name one
pub fn conventional_config(zone: &str) -> String {
    format!("zones/{}.md", zone)
}

/// How a zone was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    /// Forced by an override marker (or a session override)
    Override,
    /// A registry pattern matched
    Pattern,
    /// Nothing matched
    Fallback,
}

impl ResolutionSource {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ResolutionSource::Override => "override",
            ResolutionSource::Pattern => "pattern",
            ResolutionSource::Fallback => "fallback",
        }
    }
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The result of resolving a path to a zone
///
/// Immutable once produced; the caller owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedZone {
    /// Zone name
    pub zone: String,
    /// Reference to the zone's behavior text
    pub config: String,
    /// The literal pattern that matched, absent for overrides and the fallback
    pub matched_pattern: Option<String>,
    /// Zone names whose content composes this zone, most specific first
    #[serde(rename = "inheritance")]
    pub inheritance_chain: Vec<String>,
    /// The normalized absolute path that was resolved
    pub path: String,
    /// How the zone was chosen
    pub source: ResolutionSource,
}

impl ResolvedZone {
    pub fn is_override(&self) -> bool {
        self.source == ResolutionSource::Override
    }

    pub fn is_fallback(&self) -> bool {
        self.source == ResolutionSource::Fallback
    }
}

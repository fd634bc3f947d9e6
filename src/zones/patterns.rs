//! Path pattern matching
//!
//! Decides whether a path belongs to a zone pattern. Patterns come in two
//! flavours, selected by the presence of `*` anywhere in the pattern:
//!
//! - **Containment** (no `*`): the candidate must be the pattern directory or
//!   one of its descendants. Both sides are canonicalized and compared
//!   component by component, case-sensitively, so `~/Projects2` never matches
//!   `~/Projects`.
//! - **Segment** (`*` present): pattern and candidate are split into segments
//!   and compared position by position, case-insensitively. `*` matches any
//!   run of characters inside one segment and never crosses a separator.
//!   Extra trailing candidate segments are ignored, so a wildcard pattern
//!   matches a directory and everything below it.

use crate::error::ConfigError;
use crate::util::{expand_home, lexical_clean, normalize_path, path_segments};
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{trace, warn};

/// Wildcard token
const WILDCARD: char = '*';

/// A single zone pattern, expanded and compiled
#[derive(Debug)]
pub struct ZonePattern {
    source: String,
    kind: PatternKind,
}

#[derive(Debug)]
enum PatternKind {
    Containment(PathBuf),
    Segments(Vec<Segment>),
}

#[derive(Debug)]
enum Segment {
    /// Lowercased literal
    Literal(String),
    Wildcard(Regex),
}

impl Segment {
    fn compile(segment: &str) -> Result<Self, ConfigError> {
        if !segment.contains(WILDCARD) {
            return Ok(Segment::Literal(segment.to_lowercase()));
        }

        let body = segment
            .split(WILDCARD)
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");

        Regex::new(&format!("(?is)^{}$", body))
            .map(Segment::Wildcard)
            .map_err(|e| ConfigError::InvalidPattern {
                pattern: segment.to_string(),
                reason: e.to_string(),
            })
    }

    fn matches(&self, candidate: &str) -> bool {
        match self {
            Segment::Literal(literal) => *literal == candidate.to_lowercase(),
            Segment::Wildcard(regex) => regex.is_match(candidate),
        }
    }
}

impl ZonePattern {
    /// Expand and compile a pattern string
    pub fn compile(pattern: &str, home: Option<&Path>) -> Result<Self, ConfigError> {
        if pattern.trim().is_empty() {
            return Err(ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "pattern is empty".to_string(),
            });
        }

        let expanded = expand_home(pattern, home);

        let kind = if expanded.contains(WILDCARD) {
            let segments = path_segments(&lexical_clean(Path::new(&expanded)))
                .iter()
                .map(|s| Segment::compile(s))
                .collect::<Result<Vec<_>, _>>()?;
            PatternKind::Segments(segments)
        } else {
            PatternKind::Containment(normalize_path(Path::new(&expanded)))
        };

        Ok(Self {
            source: pattern.to_string(),
            kind,
        })
    }

    /// The pattern as written in the registry
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether this pattern uses segment (wildcard) matching
    pub fn is_wildcard(&self) -> bool {
        matches!(self.kind, PatternKind::Segments(_))
    }

    /// Test an absolute candidate path against this pattern
    pub fn matches(&self, candidate: &Path) -> bool {
        match &self.kind {
            PatternKind::Containment(base) => normalize_path(candidate).starts_with(base),
            PatternKind::Segments(segments) => {
                let parts = path_segments(&lexical_clean(candidate));
                if parts.len() < segments.len() {
                    return false;
                }
                segments
                    .iter()
                    .zip(parts.iter())
                    .all(|(segment, part)| segment.matches(part))
            }
        }
    }
}

/// Path matcher
///
/// Holds the home directory used to expand `~` in patterns.
#[derive(Debug, Clone, Default)]
pub struct PathMatcher {
    home: Option<PathBuf>,
}

impl PathMatcher {
    /// Create a matcher that expands `~` to the given directory
    pub fn new(home: Option<PathBuf>) -> Self {
        Self { home }
    }

    /// Create a matcher using the current user's home directory
    pub fn from_env() -> Self {
        Self::new(dirs::home_dir())
    }

    /// The home directory `~` expands to, if any
    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    /// Compile a pattern with this matcher's home directory
    pub fn compile(&self, pattern: &str) -> Result<ZonePattern, ConfigError> {
        ZonePattern::compile(pattern, self.home())
    }

    /// Check whether `candidate` matches `pattern`
    ///
    /// A pattern that cannot be compiled matches nothing.
    pub fn matches(&self, candidate: &Path, pattern: &str) -> bool {
        match self.compile(pattern) {
            Ok(compiled) => {
                let hit = compiled.matches(candidate);
                trace!(pattern, candidate = %candidate.display(), hit, "Tested zone pattern");
                hit
            }
            Err(e) => {
                warn!(pattern, error = %e, "Skipping unusable zone pattern");
                false
            }
        }
    }
}

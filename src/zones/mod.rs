//! Zone resolution engine
//!
//! Maps a filesystem path to a named zone and expands the zone's
//! inheritance chain.
//!
//! ## Resolution Model
//!
//! ```text
//! override marker → registry patterns → default zone → inheritance chain
//! ```
//!
//! - An override marker in the resolved directory forces a zone by name
//! - Otherwise zones are tried in registry order, patterns in listed order;
//!   the first hit wins, so zone order beats pattern specificity
//! - With no hit the reserved `default` zone is used
//! - The chosen zone is expanded depth-first through `inherits`, skipping
//!   names already present (cycles terminate)
//!
//! ## Example Registry
//!
//! ```json
//! {
//!   "career":      { "paths": ["~/Projects/*resume*"], "config": "zones/career.md" },
//!   "development": { "paths": ["~/Projects", "~/Code"], "config": "zones/development.md" },
//!   "parallel":    { "paths": ["*/.worktrees/*"], "inherits": ["development"] }
//! }
//! ```

pub mod inheritance;
pub mod overrides;
pub mod patterns;
pub mod registry;
pub mod resolver;
pub mod types;

pub use inheritance::resolve_chain;
pub use overrides::{OverrideLocator, parse_marker};
pub use patterns::{PathMatcher, ZonePattern};
pub use registry::{
    LoadedRegistry, RegistryDiagnostic, ZoneDefinition, ZoneMatch, ZoneRegistry, load_registry,
};
pub use resolver::ZoneResolver;
pub use types::{DEFAULT_ZONE, DEFAULT_ZONE_CONFIG, OVERRIDE_FILE_NAME, ResolutionSource, ResolvedZone};

//! Context Zones
//!
//! Detects which behavioral "zone" a working directory belongs to and loads
//! the instructions configured for it.
//!
//! ## Features
//!
//! - **Path patterns** with `~` expansion, component-aligned containment and
//!   per-segment `*` wildcards
//! - **Override markers**: a `.claude-zone` file names the zone for its directory
//! - **Inheritance**: zones pull in the instructions of the zones they inherit
//! - **MCP server** over stdio for session-scoped zone switching
//! - **Usage history** in a plain append-only log
//!
//! ## Resolution Model
//!
//! ```text
//! override marker → registry patterns (first hit) → default → inheritance chain
//! ```
//!
//! ## Example Settings
//!
//! ```toml
//! [zones]
//! registry = "~/.claude/zones.json"
//! content_dirs = ["~/.claude"]
//!
//! [overrides]
//! file_name = ".claude-zone"
//!
//! [metrics]
//! log_path = "~/.claude/zone-history.log"
//! ```

pub mod config;
pub mod content;
pub mod error;
pub mod init;
pub mod metrics;
pub mod render;
pub mod server;
pub mod transport;
pub mod util;
pub mod zones;

// Re-export main types
pub use config::{AppConfig, load_config};
pub use content::ContentLoader;
pub use error::{AppError, Result};
pub use metrics::UsageLog;
pub use server::ZoneMcpHandler;
pub use zones::{PathMatcher, ResolvedZone, ZoneRegistry, ZoneResolver};

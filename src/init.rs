//! User configuration bootstrap
//!
//! Writes an example zone registry and a session-start hook script under
//! the user's `~/.claude` directory. Existing files are left alone.

use crate::error::ConfigError;
use crate::zones::{ZoneDefinition, ZoneRegistry};
use std::path::{Path, PathBuf};
use tracing::info;

/// Session-start hook that injects the current zone's instructions
pub const HOOK_SCRIPT: &str = r##"#!/bin/bash
# Session-start hook: automatic zone loading
# Install: cp this to ~/.claude/hooks/session-start.sh && chmod +x ~/.claude/hooks/session-start.sh

# Detect current zone and output config
if command -v context-zones &> /dev/null; then
    echo "# Zone Context"
    echo "# Current zone: $(context-zones --zone-only)"
    echo ""
    context-zones --config --with-inheritance
fi
"##;

/// Example registry written by [`init_user_config`]
pub fn example_registry() -> ZoneRegistry {
    let mut registry = ZoneRegistry::new();
    registry.insert(
        "career",
        ZoneDefinition::new(["~/Desktop/Job-Search", "~/Projects/*resume*"], "zones/career.md"),
    );
    registry.insert(
        "finance",
        ZoneDefinition::new(["~/Documents/Finance"], "zones/finance.md"),
    );
    registry.insert(
        "development",
        ZoneDefinition::new(["~/Projects", "~/Code"], "zones/development.md"),
    );
    registry.insert(
        "research",
        ZoneDefinition::new(["~/Documents/Research"], "zones/research.md"),
    );
    registry
}

/// Files created by [`init_user_config`]
#[derive(Debug, Default)]
pub struct InitReport {
    pub created: Vec<PathBuf>,
}

impl InitReport {
    pub fn message(&self) -> String {
        if self.created.is_empty() {
            "Already initialized".to_string()
        } else {
            let paths: Vec<String> = self
                .created
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            format!("Initialized: {}", paths.join(", "))
        }
    }
}

/// Create `<claude_dir>/zones/`, an example `zones.json` and an example hook
pub fn init_user_config(claude_dir: &Path) -> Result<InitReport, ConfigError> {
    let mut report = InitReport::default();

    std::fs::create_dir_all(claude_dir.join("zones"))?;

    let zones_json = claude_dir.join("zones.json");
    if !zones_json.exists() {
        let body = serde_json::to_string_pretty(&example_registry())
            .map_err(|e| ConfigError::Invalid {
                message: e.to_string(),
            })?;
        std::fs::write(&zones_json, body)?;
        report.created.push(zones_json);
    }

    let hooks_dir = claude_dir.join("hooks");
    std::fs::create_dir_all(&hooks_dir)?;

    let hook_file = hooks_dir.join("session-start.sh.example");
    if !hook_file.exists() {
        std::fs::write(&hook_file, HOOK_SCRIPT)?;
        report.created.push(hook_file);
    }

    info!(created = report.created.len(), "Initialized user configuration");
    Ok(report)
}

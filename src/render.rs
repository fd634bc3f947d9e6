//! Plain-text renderings for the command line

use crate::metrics::UsageSummary;
use crate::zones::{ResolvedZone, ZoneRegistry};
use std::fmt::Write;

/// Number of recent entries shown in the text metrics report
const RECENT_SHOWN: usize = 5;

/// What the CLI prints for a resolved zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Zone name only
    ZoneOnly,
    /// The zone's behavior text
    Config { with_inheritance: bool },
    /// The resolution as pretty JSON
    Json,
    /// The short text summary
    Summary,
}

impl OutputMode {
    /// `--zone-only` wins over `--config`, which wins over `--json`
    pub fn from_flags(zone_only: bool, config: bool, with_inheritance: bool, json: bool) -> Self {
        if zone_only {
            OutputMode::ZoneOnly
        } else if config {
            OutputMode::Config { with_inheritance }
        } else if json {
            OutputMode::Json
        } else {
            OutputMode::Summary
        }
    }
}

/// Short human-readable summary of a resolution
pub fn render_summary(resolved: &ResolvedZone, marker_name: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Zone: {}", resolved.zone);
    let _ = writeln!(out, "Config: {}", resolved.config);
    if let Some(pattern) = &resolved.matched_pattern {
        let _ = writeln!(out, "Matched: {}", pattern);
    }
    if resolved.inheritance_chain.len() > 1 {
        let _ = writeln!(out, "Inherits: {}", resolved.inheritance_chain.join(" → "));
    }
    if resolved.is_override() {
        let _ = writeln!(out, "(via {} override)", marker_name);
    }
    out
}

/// Text report of usage history
pub fn render_metrics(summary: &UsageSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total detections: {}", summary.total);
    let _ = writeln!(out, "\nZone usage counts:");
    for (zone, count) in summary.ranked() {
        let _ = writeln!(out, "  {}: {}", zone, count);
    }
    if !summary.recent.is_empty() {
        let _ = writeln!(out, "\nRecent:");
        for entry in summary.recent.iter().take(RECENT_SHOWN) {
            let _ = writeln!(out, "  {} - {}", entry.zone, entry.path);
        }
    }
    out
}

/// Text listing of registry zones
pub fn render_zone_list(registry: &ZoneRegistry) -> String {
    let mut out = String::from("Available zones:\n");
    for (name, definition) in registry.iter() {
        if definition.inherits.is_empty() {
            let _ = writeln!(out, "  {}", name);
        } else {
            let _ = writeln!(
                out,
                "  {} (inherits: {})",
                name,
                definition.inherits.join(", ")
            );
        }
    }
    out
}

/// Zone names in registry order, as a pretty JSON array
pub fn render_zone_names_json(registry: &ZoneRegistry) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&registry.names())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::UsageEntry;
    use crate::zones::ResolutionSource;

    #[test]
    fn test_summary_fallback_is_two_lines() {
        let resolved = ResolvedZone {
            zone: "default".into(),
            config: "zones/default.md".into(),
            matched_pattern: None,
            inheritance_chain: vec!["default".into()],
            path: "/opt".into(),
            source: ResolutionSource::Fallback,
        };
        assert_eq!(
            render_summary(&resolved, ".claude-zone"),
            "Zone: default\nConfig: zones/default.md\n"
        );
    }

    #[test]
    fn test_metrics_report() {
        let mut summary = UsageSummary {
            total: 3,
            ..Default::default()
        };
        summary.zones.insert("career".into(), 1);
        summary.zones.insert("finance".into(), 2);
        summary.recent.push(UsageEntry {
            timestamp: "3".into(),
            zone: "finance".into(),
            path: "/b".into(),
        });

        assert_eq!(
            render_metrics(&summary),
            "Total detections: 3\n\nZone usage counts:\n  finance: 2\n  career: 1\n\nRecent:\n  finance - /b\n"
        );
    }

    #[test]
    fn test_output_mode_precedence() {
        assert_eq!(OutputMode::from_flags(true, true, false, true), OutputMode::ZoneOnly);
        assert_eq!(
            OutputMode::from_flags(false, true, true, true),
            OutputMode::Config {
                with_inheritance: true
            }
        );
        assert_eq!(OutputMode::from_flags(false, false, true, true), OutputMode::Json);
        assert_eq!(OutputMode::from_flags(false, false, false, false), OutputMode::Summary);
    }

    #[test]
    fn test_zone_names_json() {
        let mut registry = ZoneRegistry::new();
        registry.insert("zeta", crate::zones::ZoneDefinition::default());
        registry.insert("alpha", crate::zones::ZoneDefinition::default());
        assert_eq!(
            render_zone_names_json(&registry).unwrap(),
            "[\n  \"zeta\",\n  \"alpha\"\n]"
        );
    }

    #[test]
    fn test_zone_list() {
        let listing = render_zone_list(&ZoneRegistry::builtin());
        assert!(listing.starts_with("Available zones:\n  career\n"));
        assert!(listing.contains("  parallel (inherits: development)\n"));
    }
}

//! Output format tests

use context_zones::render::render_summary;
use context_zones::zones::{ResolutionSource, ResolvedZone};

fn worktree_zone() -> ResolvedZone {
    ResolvedZone {
        zone: "parallel".to_string(),
        config: "zones/parallel.md".to_string(),
        matched_pattern: Some("*/.worktrees/*".to_string()),
        inheritance_chain: vec!["parallel".to_string(), "development".to_string()],
        path: "/srv/.worktrees/feature-x".to_string(),
        source: ResolutionSource::Pattern,
    }
}

#[test]
fn test_summary_output() {
    insta::assert_snapshot!(render_summary(&worktree_zone(), ".claude-zone"), @r"
    Zone: parallel
    Config: zones/parallel.md
    Matched: */.worktrees/*
    Inherits: parallel → development
    ");
}

#[test]
fn test_override_summary_names_marker() {
    let resolved = ResolvedZone {
        zone: "finance".to_string(),
        config: "zones/finance.md".to_string(),
        matched_pattern: None,
        inheritance_chain: vec!["finance".to_string()],
        path: "/home/ada/household".to_string(),
        source: ResolutionSource::Override,
    };
    assert_eq!(
        render_summary(&resolved, ".zone"),
        "Zone: finance\nConfig: zones/finance.md\n(via .zone override)\n"
    );
}

#[test]
fn test_json_output() {
    insta::assert_json_snapshot!(worktree_zone(), @r#"
    {
      "zone": "parallel",
      "config": "zones/parallel.md",
      "matched_pattern": "*/.worktrees/*",
      "inheritance": [
        "parallel",
        "development"
      ],
      "path": "/srv/.worktrees/feature-x",
      "source": "pattern"
    }
    "#);
}

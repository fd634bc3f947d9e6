//! Zone usage history
//!
//! An append-only, tab-separated log of detections:
//! `<RFC 3339 timestamp>\t<zone>\t<path>`. Each entry is written with a single
//! `write_all` on an append-mode handle so concurrent writers do not
//! interleave within a line on platforms with atomic appends. There is no
//! locking beyond that.

use crate::config::MetricsConfig;
use crate::error::MetricsError;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One recorded detection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageEntry {
    pub timestamp: String,
    pub zone: String,
    pub path: String,
}

/// Aggregated usage statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UsageSummary {
    /// Number of lines in the log
    pub total: usize,
    /// Detections per zone over the trailing window
    pub zones: BTreeMap<String, u64>,
    /// Most recent entries, newest first
    pub recent: Vec<UsageEntry>,
}

impl UsageSummary {
    /// Zone counts, most used first (ties by name)
    pub fn ranked(&self) -> Vec<(&str, u64)> {
        let mut ranked: Vec<(&str, u64)> =
            self.zones.iter().map(|(z, c)| (z.as_str(), *c)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}

/// Usage log
#[derive(Debug, Clone)]
pub struct UsageLog {
    path: PathBuf,
    window: usize,
    recent: usize,
}

impl UsageLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let defaults = MetricsConfig::default();
        Self {
            path: path.into(),
            window: defaults.window,
            recent: defaults.recent,
        }
    }

    pub fn from_config(config: &MetricsConfig) -> Self {
        Self {
            path: config.log_file(),
            window: config.window,
            recent: config.recent,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one detection
    pub fn append(&self, zone: &str, path: &str) -> Result<(), MetricsError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let line = format!("{}\t{}\t{}\n", timestamp, zone, path);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Append one detection, ignoring failures
    pub fn record(&self, zone: &str, path: &str) {
        if let Err(e) = self.append(zone, path) {
            debug!(log = %self.path.display(), error = %e, "Could not record zone usage");
        }
    }

    /// Summarize the log. A missing or unreadable log is empty.
    pub fn summary(&self) -> UsageSummary {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                debug!(log = %self.path.display(), error = %e, "No usage history");
                return UsageSummary::default();
            }
        };

        let lines: Vec<&str> = content.lines().filter(|l| !l.is_empty()).collect();

        let mut zones: BTreeMap<String, u64> = BTreeMap::new();
        for line in tail(&lines, self.window) {
            let mut fields = line.split('\t');
            if let (Some(_), Some(zone)) = (fields.next(), fields.next()) {
                *zones.entry(zone.to_string()).or_default() += 1;
            }
        }

        let recent = tail(&lines, self.recent)
            .iter()
            .rev()
            .filter_map(|line| {
                let mut fields = line.splitn(3, '\t');
                match (fields.next(), fields.next(), fields.next()) {
                    (Some(timestamp), Some(zone), Some(path)) => Some(UsageEntry {
                        timestamp: timestamp.to_string(),
                        zone: zone.to_string(),
                        path: path.to_string(),
                    }),
                    _ => None,
                }
            })
            .collect();

        UsageSummary {
            total: lines.len(),
            zones,
            recent,
        }
    }
}

fn tail<'a, T>(items: &'a [T], n: usize) -> &'a [T] {
    &items[items.len().saturating_sub(n)..]
}

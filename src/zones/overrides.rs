//! Per-directory override markers
//!
//! A marker file (`.claude-zone` by default) forces a zone for the directory
//! it sits in, bypassing pattern matching. The effective content is the first
//! line that is neither blank nor a `#` comment, trimmed.

use crate::zones::types::OVERRIDE_FILE_NAME;
use std::path::Path;
use tracing::debug;

/// Name of the directory that ends an ancestor search
const REPOSITORY_MARKER: &str = ".git";

/// Extract the forced zone name from marker content
pub fn parse_marker(content: &str) -> Option<String> {
    content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
}

/// Locates override markers
#[derive(Debug, Clone)]
pub struct OverrideLocator {
    file_name: String,
    search_depth: usize,
}

impl Default for OverrideLocator {
    fn default() -> Self {
        Self::new(OVERRIDE_FILE_NAME)
    }
}

impl OverrideLocator {
    /// Look for `file_name` in the resolved directory only
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            search_depth: 0,
        }
    }

    /// Also check up to `depth` ancestor directories, stopping after a
    /// directory that contains `.git`
    pub fn with_search_depth(mut self, depth: usize) -> Self {
        self.search_depth = depth;
        self
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Find a forced zone name for `dir`
    pub fn find_override(&self, dir: &Path) -> Option<String> {
        let mut current = dir;

        for _ in 0..=self.search_depth {
            if let Some(zone) = self.read_marker(current) {
                return Some(zone);
            }

            if current.join(REPOSITORY_MARKER).exists() {
                break;
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }

        None
    }

    fn read_marker(&self, dir: &Path) -> Option<String> {
        let marker = dir.join(&self.file_name);
        if !marker.is_file() {
            return None;
        }

        match std::fs::read_to_string(&marker) {
            Ok(content) => {
                let zone = parse_marker(&content);
                debug!(marker = %marker.display(), zone = ?zone, "Read zone override marker");
                zone
            }
            Err(e) => {
                debug!(marker = %marker.display(), error = %e, "Unreadable zone override marker");
                None
            }
        }
    }
}

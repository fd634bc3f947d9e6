//! Usage metrics
//!
//! Records which zones are detected and summarizes the history.

pub mod history;

pub use history::{UsageEntry, UsageLog, UsageSummary};

//! Transport module
//!
//! Runs the MCP server over standard input/output.

pub mod stdio;

pub use stdio::run_stdio;

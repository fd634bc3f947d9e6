//! MCP server implementation
//!
//! Serves zone detection to MCP clients over stdio.

pub mod handler;

pub use handler::{
    DetectZoneArgs, GetZoneConfigArgs, NoArgs, SwitchZoneArgs, ZoneMcpHandler, error_payload,
};

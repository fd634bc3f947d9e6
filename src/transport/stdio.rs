//! Stdio transport

use crate::server::ZoneMcpHandler;
use rmcp::ServiceExt;
use rmcp::transport::io::stdio;
use tracing::info;

/// Run the MCP server using stdio transport
pub async fn run_stdio(handler: ZoneMcpHandler) -> anyhow::Result<()> {
    info!(
        tools = handler.tool_count(),
        "Starting context zones MCP server with stdio transport"
    );

    let server = handler.serve(stdio()).await?;
    server.waiting().await?;

    info!("Context zones MCP server stopped");
    Ok(())
}

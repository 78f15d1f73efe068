pub mod srctree;

pub use srctree::scan::scan_directory;
pub use srctree::SrcTreeServer;

use anyhow::Result;
use rmcp::{transport::stdio, ServiceExt};

/// Serve an MCP server over stdio until the client disconnects.
pub async fn serve<S>(server: S) -> Result<()>
where
    S: rmcp::ServerHandler,
{
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("serving error: {:?}", e);
    })?;

    service.waiting().await?;

    Ok(())
}

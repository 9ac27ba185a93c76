//! Newline-delimited JSON-RPC over stdio.

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use faq_client::Transport;
use faq_core::Result;

use crate::protocol::{RpcError, RpcMessage, RpcReply};
use crate::server::FaqMcpServer;

/// Serve requests from `reader` until EOF, writing replies to `writer`.
///
/// Requests are handled one at a time, in arrival order.
pub async fn serve<T, R, W>(server: &FaqMcpServer<T>, reader: R, mut writer: W) -> Result<()>
where
    T: Transport,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    info!("MCP server listening on stdio");
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<RpcMessage>(line) {
            Ok(message) => server.handle_request(message).await,
            Err(e) => {
                warn!("Unparseable MCP message: {}", e);
                Some(RpcReply::new(Value::Null, Err(RpcError::parse_error(e))))
            }
        };

        if let Some(response) = response {
            write_message(&mut writer, &response).await?;
        }
    }

    debug!("stdin closed, shutting down");
    Ok(())
}

async fn write_message<W>(writer: &mut W, response: &RpcReply) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut json = serde_json::to_string(response)?;
    json.push('\n');
    writer.write_all(json.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

//! TCP accept loop

use super::Session;
use crate::config::ShellConfig;
use ntsh_core::Dispatcher;
use std::sync::Arc;
use tokio::io::AsyncWrite;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Accept connections forever, one session task per client
pub async fn serve<W>(
    listener: TcpListener,
    dispatcher: Arc<Dispatcher<W>>,
    config: Arc<ShellConfig>,
) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    loop {
        let (socket, addr) = listener.accept().await?;
        info!("Connection from: {}", addr);

        let session = Session::new(socket, addr.to_string(), dispatcher.clone(), config.clone());
        tokio::spawn(async move {
            match session.run().await {
                Ok(lines) => info!("Client disconnected: {} ({} lines)", addr, lines),
                Err(e) => warn!("Session error from {}: {}", addr, e),
            }
        });
    }
}

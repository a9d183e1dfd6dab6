use crate::routes::router;
use crate::{Result, WebError};
use murmur_core::ChatContext;
use std::net::SocketAddr;

/// Serve the chat UI and API until Ctrl-C.
pub async fn start_server(ctx: ChatContext, host: &str, port: u16) -> Result<()> {
    let app = router(ctx);

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| WebError::Config(format!("Invalid address: {e}")))?;

    tracing::info!("Starting web server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(WebError::Io)?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(WebError::Io)?;

    tracing::info!("Web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}

//! HTTP transport over the pipeline

pub mod handlers;
pub mod routes;

pub use handlers::{AppState, CategoryErrorResponse, SaveTextRequest, SaveTextResponse};
pub use routes::routes;

use std::future::Future;

use tokio::net::TcpListener;

use crate::Result;

/// Serve the routes on `listener` until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, routes(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("HTTP server on {} shut down", addr);
    Ok(())
}

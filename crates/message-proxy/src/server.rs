//! HTTP surface: one route, any method, answered by [`MessageProxy::handle`].

use crate::handler::{MessageProxy, ProxyResponse};
use axum::extract::State;
use axum::http::header::ALLOW;
use axum::http::{HeaderValue, Method};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

pub const ROUTE: &str = "/api/generate-message";

impl IntoResponse for ProxyResponse {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.body)).into_response();
        if let Some(allow) = self.allow {
            response
                .headers_mut()
                .insert(ALLOW, HeaderValue::from_static(allow));
        }
        response
    }
}

async fn generate_message(State(proxy): State<Arc<MessageProxy>>, method: Method) -> ProxyResponse {
    proxy.handle(&method).await
}

pub fn router(proxy: Arc<MessageProxy>) -> Router {
    Router::new()
        .route(ROUTE, any(generate_message))
        .with_state(proxy)
}

/// Serves until `shutdown` resolves, then drains open connections.
pub async fn serve<F>(listener: TcpListener, proxy: Arc<MessageProxy>, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(%addr, route = ROUTE, "Message proxy listening");
    axum::serve(listener, router(proxy))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!(%addr, "Message proxy stopped");
    Ok(())
}

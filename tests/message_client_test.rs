use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use sweetheart::clients::{MessageClient, APOLOGY, RETRY_FALLBACK};
use tokio::net::TcpListener;

/// Serves `body` with `status` on `/api/generate-message`.
async fn start_stub(status: StatusCode, body: &'static str) -> SocketAddr {
    let app = Router::new().route(
        "/api/generate-message",
        get(move || async move {
            (
                status,
                [(axum::http::header::CONTENT_TYPE, "application/json")],
                body,
            )
        }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client_for(addr: SocketAddr) -> MessageClient {
    let http = reqwest::Client::builder().no_proxy().build().unwrap();
    MessageClient::new(http, format!("http://{addr}/api/generate-message"))
}

#[tokio::test]
async fn test_message_is_returned() {
    let addr = start_stub(StatusCode::OK, r#"{"message":"Hola, preciosa."}"#).await;

    let text = client_for(addr).request_message().await.unwrap();

    assert_eq!(text, "Hola, preciosa.");
}

#[tokio::test]
async fn test_success_without_message_uses_retry_fallback() {
    let addr = start_stub(StatusCode::OK, "{}").await;

    let text = client_for(addr).request_message().await.unwrap();

    assert_eq!(text, RETRY_FALLBACK);
}

#[tokio::test]
async fn test_error_status_uses_apology() {
    let addr = start_stub(StatusCode::TOO_MANY_REQUESTS, r#"{"error":"Google API error: X"}"#).await;

    let text = client_for(addr).request_message().await.unwrap();

    assert_eq!(text, APOLOGY);
}

#[tokio::test]
async fn test_unreadable_body_uses_apology() {
    let addr = start_stub(StatusCode::OK, "<html>oops</html>").await;

    let text = client_for(addr).request_message().await.unwrap();

    assert_eq!(text, APOLOGY);
}

#[tokio::test]
async fn test_unreachable_proxy_uses_apology() {
    let closed = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let client = client_for(closed);

    let text = client.request_message().await.unwrap();

    assert_eq!(text, APOLOGY);
    assert!(!client.is_generating());
}

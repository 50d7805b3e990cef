use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use message_proxy::mock::MockGenerator;
use message_proxy::{serve, ApiKey, GeminiClient, MessageProxy, UpstreamConfig, ROUTE};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

struct RunningProxy {
    addr: SocketAddr,
    stop: oneshot::Sender<()>,
    handle: tokio::task::JoinHandle<std::io::Result<()>>,
}

impl RunningProxy {
    fn url(&self) -> String {
        format!("http://{}{}", self.addr, ROUTE)
    }

    async fn stop(self) {
        let _ = self.stop.send(());
        self.handle.await.unwrap().unwrap();
    }
}

async fn start_proxy(proxy: MessageProxy) -> RunningProxy {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();
    let handle = tokio::spawn(serve(listener, Arc::new(proxy), async {
        let _ = stopped.await;
    }));
    RunningProxy { addr, stop, handle }
}

/// A stand-in for the generative API: answers `reply` and checks the key.
async fn start_fake_upstream(status: StatusCode, reply: Value) -> SocketAddr {
    let app = Router::new().route(
        "/v1beta/models/:target",
        post(
            move |Path(target): Path<String>,
                  Query(query): Query<HashMap<String, String>>,
                  Json(body): Json<Value>| async move {
                assert_eq!(target, "gemini-1.5-flash-latest:generateContent");
                assert_eq!(query.get("key").map(String::as_str), Some("test-key"));
                assert!(body["contents"][0]["parts"][0]["text"].is_string());
                (status, Json(reply))
            },
        ),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn http() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

fn gemini_proxy(base_url: String) -> MessageProxy {
    let config = UpstreamConfig {
        base_url,
        ..UpstreamConfig::default()
    };
    let client = GeminiClient::new(http(), &config);
    MessageProxy::new(Arc::new(client), ApiKey::new("test-key"), &config.prompt)
}

#[tokio::test]
async fn test_get_returns_generated_message() {
    let mock = MockGenerator::new();
    mock.expect_send().return_text("Every star spells your name.");
    let running = start_proxy(MessageProxy::new(
        Arc::new(mock.clone()),
        ApiKey::new("k"),
        "prompt",
    ))
    .await;

    let response = http().get(running.url()).send().await.unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"message": "Every star spells your name."}));
    mock.verify();
    running.stop().await;
}

#[tokio::test]
async fn test_post_gets_405_with_allow_header() {
    let mock = MockGenerator::new();
    let running = start_proxy(MessageProxy::new(
        Arc::new(mock.clone()),
        ApiKey::new("k"),
        "prompt",
    ))
    .await;

    let response = http()
        .post(running.url())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        response.headers().get("allow").unwrap().to_str().unwrap(),
        "GET"
    );
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "Method Not Allowed"}));
    assert_eq!(mock.calls(), 0);
    running.stop().await;
}

#[tokio::test]
async fn test_gemini_client_success_through_fake_upstream() {
    let upstream = start_fake_upstream(
        StatusCode::OK,
        json!({"candidates": [{"content": {"parts": [{"text": "Mi vida, mi cielo."}]}}]}),
    )
    .await;
    let running = start_proxy(gemini_proxy(format!("http://{upstream}"))).await;

    let response = http().get(running.url()).send().await.unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Mi vida, mi cielo.");
    running.stop().await;
}

#[tokio::test]
async fn test_gemini_client_relays_upstream_error() {
    let upstream = start_fake_upstream(
        StatusCode::TOO_MANY_REQUESTS,
        json!({"error": {"code": 429, "message": "Resource has been exhausted"}}),
    )
    .await;
    let running = start_proxy(gemini_proxy(format!("http://{upstream}"))).await;

    let response = http().get(running.url()).send().await.unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::TOO_MANY_REQUESTS);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({"error": "Google API error: Resource has been exhausted"})
    );
    running.stop().await;
}

#[tokio::test]
async fn test_unknown_upstream_status_is_named_by_code() {
    let status = StatusCode::from_u16(599).unwrap();
    let upstream = start_fake_upstream(status, json!({})).await;
    let running = start_proxy(gemini_proxy(format!("http://{upstream}"))).await;

    let response = http().get(running.url()).send().await.unwrap();

    assert_eq!(response.status().as_u16(), 599);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "Google API error: 599"}));
    running.stop().await;
}

#[tokio::test]
async fn test_unreachable_upstream_is_generic_500() {
    let closed = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let running = start_proxy(gemini_proxy(format!("http://{closed}"))).await;

    let response = http().get(running.url()).send().await.unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "Internal server error."}));
    running.stop().await;
}

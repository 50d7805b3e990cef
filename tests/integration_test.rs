use message_proxy::mock::MockGenerator;
use message_proxy::ApiKey;
use orbit_scene::mock::RecordingSink;
use orbit_scene::{AssetManifest, AssetSource, SceneClient, StarConfig, StaticAssets};
use std::sync::Arc;
use std::time::Duration;
use sweetheart::clients::{MessageClientError, Typewriter, APOLOGY};
use sweetheart::config::AppConfig;
use sweetheart::lifecycle::{GreetingSystem, SystemError};

fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.server.bind = "127.0.0.1:0".to_string();
    config.scene.fps = 120;
    config.scene.pool.hearts.count = 30;
    config.scene.pool.spheres.count = 4;
    config.scene.stars = StarConfig {
        count: 100,
        ..StarConfig::default()
    };
    config
}

fn placeholder_assets(config: &AppConfig) -> Arc<dyn AssetSource> {
    Arc::new(StaticAssets::placeholder(&config.assets))
}

async fn wait_until_running(client: &SceneClient) {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if client.snapshot().await.unwrap().is_running() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("scene never started running");
}

/// Full end-to-end test: assets load, the pool animates, the proxy answers.
#[tokio::test]
async fn test_full_greeting_system() {
    let config = test_config();
    let mock = MockGenerator::new();
    mock.expect_send().return_text("Eres mi universo entero.");
    let sink = RecordingSink::new();

    let system = GreetingSystem::start_with(
        &config,
        ApiKey::new("k"),
        placeholder_assets(&config),
        Arc::new(mock.clone()),
        sink.clone(),
    )
    .await
    .expect("Failed to start system");

    let addr = system.addr();
    assert_ne!(addr.port(), 0);
    assert_eq!(
        system.message_client.url(),
        format!("http://{addr}/api/generate-message")
    );

    wait_until_running(&system.scene_client).await;

    // Let the driver tick a few frames on the installed pool
    tokio::time::sleep(Duration::from_millis(100)).await;
    let snapshot = system.scene_client.snapshot().await.unwrap();
    let pool = snapshot.pool.expect("pool installed");
    assert_eq!(pool.len(), 34);
    assert_eq!(snapshot.labels.len(), 2);
    let log = sink.log();
    assert!(log.heart_uploads > 0);
    assert_eq!(log.last_heart_len, 30);
    assert_eq!(log.last_sphere_len, 4);

    let text = system.message_client.request_message().await.unwrap();
    assert_eq!(text, "Eres mi universo entero.");
    mock.verify();

    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_missing_key_surfaces_as_apology() {
    let config = test_config();
    let mock = MockGenerator::new();

    let system = GreetingSystem::start_with(
        &config,
        None,
        placeholder_assets(&config),
        Arc::new(mock.clone()),
        RecordingSink::new(),
    )
    .await
    .unwrap();

    let text = system.message_client.request_message().await.unwrap();
    assert_eq!(text, APOLOGY);
    assert_eq!(mock.calls(), 0);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_second_request_while_in_flight_is_busy() {
    let config = test_config();
    let mock = MockGenerator::new().with_delay(Duration::from_millis(200));
    mock.expect_send().return_text("one");

    let system = GreetingSystem::start_with(
        &config,
        ApiKey::new("k"),
        placeholder_assets(&config),
        Arc::new(mock.clone()),
        RecordingSink::new(),
    )
    .await
    .unwrap();

    let client = &system.message_client;
    let (first, second) = tokio::join!(client.request_message(), client.request_message());

    assert_eq!(first.unwrap(), "one");
    assert_eq!(second, Err(MessageClientError::Busy));
    assert!(!client.is_generating());
    assert_eq!(mock.calls(), 1);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_show_message_types_the_reply() {
    let config = test_config();
    let mock = MockGenerator::new();
    mock.expect_send().return_text("amor");

    let system = GreetingSystem::start_with(
        &config,
        ApiKey::new("k"),
        placeholder_assets(&config),
        Arc::new(mock.clone()),
        RecordingSink::new(),
    )
    .await
    .unwrap();

    let mut frames = Vec::new();
    let text = system
        .message_client
        .show_message(&Typewriter::new(Duration::ZERO), |prefix| {
            frames.push(prefix.to_string())
        })
        .await
        .unwrap();

    assert_eq!(text, "amor");
    assert_eq!(frames, ["", "a", "am", "amo", "amor"]);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_failed_assets_leave_scene_uninitialized_but_proxy_serving() {
    let config = test_config();
    let mock = MockGenerator::new();
    mock.expect_send().return_text("still here");
    let sink = RecordingSink::new();

    let system = GreetingSystem::start_with(
        &config,
        ApiKey::new("k"),
        Arc::new(StaticAssets::new()),
        Arc::new(mock.clone()),
        sink.clone(),
    )
    .await
    .unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;
    let snapshot = system.scene_client.snapshot().await.unwrap();
    assert!(!snapshot.is_running());
    assert!(snapshot.frames > 0);
    assert_eq!(sink.log().heart_uploads, 0);

    let text = system.message_client.request_message().await.unwrap();
    assert_eq!(text, "still here");

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_shutdown_during_slow_asset_load() {
    let config = test_config();
    let slow = StaticAssets::placeholder(&AssetManifest::default()).with_latency(Duration::from_secs(30));

    let system = GreetingSystem::start_with(
        &config,
        ApiKey::new("k"),
        Arc::new(slow),
        Arc::new(MockGenerator::new()),
        RecordingSink::new(),
    )
    .await
    .unwrap();

    tokio::time::timeout(Duration::from_secs(5), system.shutdown())
        .await
        .expect("shutdown hung")
        .unwrap();
}

#[tokio::test]
async fn test_address_in_use_fails_to_start() {
    let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let mut config = test_config();
    config.server.bind = taken.local_addr().unwrap().to_string();

    let result = GreetingSystem::start_with(
        &config,
        None,
        placeholder_assets(&config),
        Arc::new(MockGenerator::new()),
        RecordingSink::new(),
    )
    .await;

    assert!(matches!(result, Err(SystemError::Bind { .. })));
}

#[tokio::test]
async fn test_invalid_pool_config_fails_to_start() {
    let mut config = test_config();
    config.scene.pool.hearts.scale = orbit_scene::object::Span::new(0.0, 0.3);

    let result = GreetingSystem::start_with(
        &config,
        None,
        placeholder_assets(&config),
        Arc::new(MockGenerator::new()),
        RecordingSink::new(),
    )
    .await;

    assert!(matches!(result, Err(SystemError::Scene(_))));
}

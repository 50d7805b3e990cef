use orbit_scene::mock::RecordingSink;
use orbit_scene::{
    load_scene_assets, prepare_content, AssetManifest, AssetSource, ObjectKind, Pointer,
    SceneActor, SceneClient, SceneConfig, SceneError, StarConfig, StaticAssets, Viewport,
};
use std::sync::Arc;

fn small_config() -> SceneConfig {
    let mut config = SceneConfig {
        stars: StarConfig {
            count: 32,
            ..StarConfig::default()
        },
        ..SceneConfig::default()
    };
    config.pool.hearts.count = 12;
    config.pool.spheres.count = 3;
    config
}

fn start(config: &SceneConfig) -> (SceneClient, RecordingSink, tokio::task::JoinHandle<()>) {
    let sink = RecordingSink::new();
    let (actor, client) = SceneActor::new(8, config, sink.clone());
    let handle = tokio::spawn(actor.run());
    (client, sink, handle)
}

async fn install_with_placeholder_assets(client: &SceneClient, config: &SceneConfig) {
    let manifest = AssetManifest::default();
    let source: Arc<dyn AssetSource> = Arc::new(StaticAssets::placeholder(&manifest));
    let assets = load_scene_assets(source, &manifest).await.unwrap();
    let content = prepare_content(config, &assets).unwrap();
    client.install(content).await.unwrap();
}

#[tokio::test]
async fn test_frames_before_install_only_move_camera_and_stars() {
    let config = small_config();
    let (client, sink, handle) = start(&config);

    client.pointer_moved(Pointer::new(1.0, 0.0)).await.unwrap();
    for n in 0..3 {
        let report = client.frame(n as f32 / 60.0).await.unwrap();
        assert!(!report.running);
        assert_eq!(report.advanced, 0);
    }

    let snapshot = client.snapshot().await.unwrap();
    assert!(!snapshot.is_running());
    assert_eq!(snapshot.frames, 3);
    assert!(snapshot.camera_position.x > 0.0);
    assert!(snapshot.star_rotation > 0.0);

    let log = sink.log();
    assert_eq!(log.presented, 3);
    assert_eq!(log.heart_uploads, 0);
    assert_eq!(log.sphere_uploads, 0);

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_running_scene_uploads_each_buffer_once_per_frame() {
    let config = small_config();
    let (client, sink, handle) = start(&config);
    install_with_placeholder_assets(&client, &config).await;

    for n in 1..=4 {
        let report = client.frame(n as f32 / 60.0).await.unwrap();
        assert!(report.running);
        assert_eq!(report.advanced, 15);
    }

    let log = sink.log();
    assert_eq!(log.heart_uploads, 4);
    assert_eq!(log.sphere_uploads, 4);
    assert_eq!(log.presented, 4);
    assert_eq!(log.last_heart_len, 12);
    assert_eq!(log.last_sphere_len, 3);
    assert_eq!(log.last_label_count, 2);

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_snapshot_reflects_pool_after_frames() {
    let config = small_config();
    let (client, _sink, handle) = start(&config);
    install_with_placeholder_assets(&client, &config).await;

    let before = client.snapshot().await.unwrap();
    client.frame(0.5).await.unwrap();
    let after = client.snapshot().await.unwrap();

    let before = before.pool.unwrap();
    let after = after.pool.unwrap();
    assert_eq!(after.len(), 15);
    assert_eq!(after.buffer(ObjectKind::Heart).len(), 12);
    assert_eq!(after.buffer(ObjectKind::Sphere).len(), 3);
    for (old, new) in before.objects().iter().zip(after.objects()) {
        let expected = old.orbit_angle() + old.orbit_speed();
        assert!((new.orbit_angle() - expected).abs() < 1e-6);
        assert_eq!(new.orbit_radius(), old.orbit_radius());
        assert_eq!(new.scale(), old.scale());
    }

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_second_install_is_rejected() {
    let config = small_config();
    let (client, _sink, handle) = start(&config);
    install_with_placeholder_assets(&client, &config).await;

    let manifest = AssetManifest::default();
    let source: Arc<dyn AssetSource> = Arc::new(StaticAssets::placeholder(&manifest));
    let assets = load_scene_assets(source, &manifest).await.unwrap();
    let again = prepare_content(&config, &assets).unwrap();

    let result = client.install(again).await;
    assert!(matches!(result, Err(SceneError::AlreadyRunning)));

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_resize_changes_projection_aspect() {
    let config = small_config();
    let (client, _sink, handle) = start(&config);

    let before = client.snapshot().await.unwrap();
    assert!((before.aspect - 1280.0 / 720.0).abs() < 1e-6);

    client.resize(Viewport::new(800.0, 400.0)).await.unwrap();
    let report = client.frame(0.0).await.unwrap();
    assert_eq!(report.frame, 1);

    let after = client.snapshot().await.unwrap();
    assert_eq!(after.aspect, 2.0);

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_client_reports_closed_actor() {
    let config = small_config();
    let (client, _sink, handle) = start(&config);
    handle.abort();
    let _ = handle.await;

    let result = client.frame(0.0).await;
    assert!(matches!(result, Err(SceneError::ActorClosed)));
}

use crate::clients::MessageClient;
use crate::config::AppConfig;
use message_proxy::{serve, ApiKey, GeminiClient, Generator, MessageProxy, ROUTE};
use orbit_scene::{
    load_scene_assets, prepare_content, AssetManifest, AssetSource, FrameDriver, HeadlessSink,
    HttpAssetSource, RenderSink, SceneActor, SceneClient, SceneConfig, SceneError,
};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn, Instrument};

const SCENE_BUFFER: usize = 64;

#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// The runtime orchestrator for the greeting scene and its message proxy.
///
/// `GreetingSystem` is responsible for:
/// - **Lifecycle Management**: starting and stopping the scene actor, the frame
///   driver, the asset loader and the HTTP server
/// - **Dependency Wiring**: handing scene-client clones to the driver and the
///   loader, and the generator to the proxy
/// - **Shutdown Signalling**: one `watch` channel tells every task to stop
///
/// # Example
///
/// ```ignore
/// let system = GreetingSystem::start(&config, api_key).await?;
///
/// let text = system.message_client.request_message().await?;
/// let snapshot = system.scene_client.snapshot().await?;
///
/// system.shutdown().await?;
/// ```
pub struct GreetingSystem {
    /// Client for the scene actor (pointer, resize, snapshot)
    pub scene_client: SceneClient,

    /// Client for this system's own message route
    pub message_client: MessageClient,

    addr: SocketAddr,
    shutdown: watch::Sender<bool>,

    /// Task handles for everything spawned (used for graceful shutdown)
    handles: Vec<JoinHandle<()>>,
}

impl GreetingSystem {
    /// Starts the system with the production collaborators: assets and the
    /// generative API over HTTP, and a headless render sink.
    pub async fn start(config: &AppConfig, api_key: Option<ApiKey>) -> Result<Self, SystemError> {
        let http = reqwest::Client::new();
        let assets: Arc<dyn AssetSource> = Arc::new(HttpAssetSource::new(http.clone()));
        let generator: Arc<dyn Generator> = Arc::new(GeminiClient::new(http, &config.upstream));
        Self::start_with(config, api_key, assets, generator, HeadlessSink::default()).await
    }

    /// Starts the system with explicit collaborators.
    ///
    /// Binds the server first so a bad address fails before anything is spawned.
    /// The scene pool configuration is validated before that.
    pub async fn start_with<S: RenderSink>(
        config: &AppConfig,
        api_key: Option<ApiKey>,
        assets: Arc<dyn AssetSource>,
        generator: Arc<dyn Generator>,
        sink: S,
    ) -> Result<Self, SystemError> {
        config.scene.pool.validate()?;

        // 1. Bind
        let listener = TcpListener::bind(&config.server.bind)
            .await
            .map_err(|source| SystemError::Bind {
                addr: config.server.bind.clone(),
                source,
            })?;
        let addr = listener.local_addr().map_err(|source| SystemError::Bind {
            addr: config.server.bind.clone(),
            source,
        })?;

        // The route is on this host; never send it through a system proxy.
        let local_http = reqwest::Client::builder().no_proxy().build()?;

        let (shutdown, stop) = watch::channel(false);

        // 2. Scene actor, uninitialized until assets arrive
        let (scene_actor, scene_client) = SceneActor::new(SCENE_BUFFER, &config.scene, sink);
        let scene_handle = tokio::spawn(scene_actor.run());

        // 3. Frame driver
        let driver = FrameDriver::new(scene_client.clone(), config.scene.fps);
        let driver_handle = tokio::spawn(
            async move {
                driver.run(stop).await;
            }
            .instrument(tracing::info_span!("frame_driver")),
        );

        // 4. Asset loader: loads, builds the pool, installs it
        let loader_handle = tokio::spawn(
            load_and_install(
                scene_client.clone(),
                assets,
                config.assets.clone(),
                config.scene.clone(),
                shutdown.subscribe(),
            )
            .instrument(tracing::info_span!("asset_loader")),
        );

        // 5. Message proxy
        let proxy = Arc::new(MessageProxy::new(generator, api_key, &config.upstream.prompt));
        let server_stop = shutdown.subscribe();
        let server_handle = tokio::spawn(async move {
            if let Err(e) = serve(listener, proxy, wait_for_stop(server_stop)).await {
                error!(error = %e, "Message proxy failed");
            }
        });

        let message_client = MessageClient::new(local_http, format!("http://{addr}{ROUTE}"));
        info!(%addr, "Greeting system started");

        Ok(Self {
            scene_client,
            message_client,
            addr,
            shutdown,
            handles: vec![scene_handle, driver_handle, loader_handle, server_handle],
        })
    }

    /// Address the message proxy is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Gracefully shuts down the entire system.
    ///
    /// # Shutdown Process
    ///
    /// 1. The stop signal ends the frame driver, an unfinished asset load and
    ///    the HTTP server (open connections are drained).
    /// 2. Dropping the last scene client closes the actor's channel and the
    ///    actor exits its loop.
    /// 3. Every task is awaited; a panicked task is reported as an error.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        let _ = self.shutdown.send(true);
        drop(self.scene_client);
        drop(self.message_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Task failed: {:?}", e);
                return Err(format!("Task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

async fn wait_for_stop(mut stop: watch::Receiver<bool>) {
    while !*stop.borrow_and_update() {
        // A dropped sender also means stop.
        if stop.changed().await.is_err() {
            break;
        }
    }
}

async fn load_and_install(
    client: SceneClient,
    source: Arc<dyn AssetSource>,
    manifest: AssetManifest,
    config: SceneConfig,
    stop: watch::Receiver<bool>,
) {
    let assets = tokio::select! {
        loaded = load_scene_assets(source, &manifest) => loaded,
        _ = wait_for_stop(stop) => {
            info!("Asset loading abandoned");
            return;
        }
    };

    let assets = match assets {
        Ok(assets) => assets,
        Err(e) => {
            warn!(error = %e, "Asset loading failed; scene stays uninitialized");
            return;
        }
    };

    let content = match prepare_content(&config, &assets) {
        Ok(content) => content,
        Err(e) => {
            warn!(error = %e, "Pool generation failed; scene stays uninitialized");
            return;
        }
    };

    if let Err(e) = client.install(content).await {
        warn!(error = %e, "Install failed");
    }
}

//! # Scene Actor
//!
//! The [`SceneActor`] owns the [`SceneState`] and the [`RenderSink`] and is the
//! only place either is touched. Requests are processed one at a time, which
//! gives the animator the same guarantees as a browser's single-threaded frame
//! loop: a frame is computed start to finish before any pointer event, resize
//! or install is looked at, and no locks are needed.
//!
//! # Usage Pattern
//!
//! 1. **Create**: `SceneActor::new()` returns the actor and its [`SceneClient`].
//! 2. **Run**: spawn `actor.run()` on the runtime.
//! 3. **Drive**: hand client clones to the frame driver and the asset loader.
//!
//! ```rust
//! use orbit_scene::{HeadlessSink, SceneActor, SceneConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = SceneActor::new(16, &SceneConfig::default(), HeadlessSink::default());
//!     tokio::spawn(actor.run());
//!
//!     let report = client.frame(0.0).await.unwrap();
//!     assert!(!report.running);
//! }
//! ```
//!
//! The loop ends when every client has been dropped.

use crate::client::SceneClient;
use crate::message::SceneRequest;
use crate::scene::{FrameReport, SceneConfig, SceneState};
use crate::sink::RenderSink;
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

pub struct SceneActor<S: RenderSink> {
    receiver: mpsc::Receiver<SceneRequest>,
    state: SceneState,
    sink: S,
}

impl<S: RenderSink> SceneActor<S> {
    /// Creates an uninitialized scene and the client that drives it.
    ///
    /// `buffer_size` is the request channel capacity; callers wait when it
    /// is full.
    pub fn new(buffer_size: usize, config: &SceneConfig, sink: S) -> (Self, SceneClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            state: SceneState::new(config),
            sink,
        };
        (actor, SceneClient::new(sender))
    }

    /// Processes requests until the channel closes.
    pub async fn run(mut self) {
        info!(stars = self.state.stars().points().len(), "Scene actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                SceneRequest::Install {
                    content,
                    respond_to,
                } => {
                    debug!(
                        objects = content.pool.len(),
                        labels = content.labels.len(),
                        "Install"
                    );
                    let result = self.state.install(*content);
                    match &result {
                        Ok(()) => info!(frames = self.state.frames(), "Pool installed; scene running"),
                        Err(e) => warn!(error = %e, "Install rejected"),
                    }
                    let _ = respond_to.send(result);
                }
                SceneRequest::Frame { time, respond_to } => {
                    let report = self.render_frame(time);
                    let _ = respond_to.send(Ok(report));
                }
                SceneRequest::PointerMoved {
                    pointer,
                    respond_to,
                } => {
                    trace!(x = pointer.x, y = pointer.y, "Pointer");
                    self.state.set_pointer(pointer);
                    let _ = respond_to.send(Ok(()));
                }
                SceneRequest::Resize {
                    viewport,
                    respond_to,
                } => {
                    debug!(width = viewport.width, height = viewport.height, "Resize");
                    self.state.resize(viewport);
                    let _ = respond_to.send(Ok(()));
                }
                SceneRequest::Snapshot { respond_to } => {
                    let _ = respond_to.send(Ok(self.state.snapshot()));
                }
            }
        }

        info!(
            frames = self.state.frames(),
            running = self.state.is_running(),
            "Shutdown"
        );
    }

    fn render_frame(&mut self, time: f32) -> FrameReport {
        let report = self.state.advance(time);

        if let Some(pool) = self.state.pool_mut() {
            for buffer in [&mut pool.hearts, &mut pool.spheres] {
                if buffer.take_dirty() {
                    self.sink.upload(buffer);
                }
            }
        }
        self.sink.present(&self.state.frame_view());

        trace!(frame = report.frame, advanced = report.advanced, "Frame");
        report
    }
}

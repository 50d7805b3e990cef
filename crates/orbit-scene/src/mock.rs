//! # Test Doubles
//!
//! Two helpers for testing code around the scene without a renderer:
//!
//! - [`RecordingSink`]: a [`RenderSink`] that counts uploads and presented
//!   frames into shared state you can inspect while the actor runs.
//! - [`create_mock_scene_client`]: a [`SceneClient`] wired to a receiver you
//!   control, for asserting what a caller (e.g. the frame driver) sends.
//!
//! ```rust
//! use orbit_scene::mock::{create_mock_scene_client, expect_frame};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (client, mut receiver) = create_mock_scene_client(4);
//!     let task = tokio::spawn(async move { client.frame(1.5).await });
//!
//!     let (time, respond_to) = expect_frame(&mut receiver).await.unwrap();
//!     assert_eq!(time, 1.5);
//!     drop(respond_to);
//!
//!     assert!(task.await.unwrap().is_err());
//! }
//! ```

use crate::buffer::InstanceBuffer;
use crate::client::SceneClient;
use crate::error::SceneError;
use crate::message::SceneRequest;
use crate::object::ObjectKind;
use crate::scene::{FrameReport, FrameView};
use crate::sink::RenderSink;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{mpsc, oneshot};

/// What a [`RecordingSink`] has seen so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SinkLog {
    pub heart_uploads: u64,
    pub sphere_uploads: u64,
    pub presented: u64,
    pub last_frame: u64,
    pub last_heart_len: usize,
    pub last_sphere_len: usize,
    pub last_label_count: usize,
}

/// A sink that records instead of drawing. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    log: Arc<Mutex<SinkLog>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> SinkLog {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, SinkLog> {
        self.log.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RenderSink for RecordingSink {
    fn upload(&mut self, buffer: &InstanceBuffer) {
        let mut log = self.lock();
        match buffer.kind() {
            ObjectKind::Heart => {
                log.heart_uploads += 1;
                log.last_heart_len = buffer.len();
            }
            ObjectKind::Sphere => {
                log.sphere_uploads += 1;
                log.last_sphere_len = buffer.len();
            }
        }
    }

    fn present(&mut self, frame: &FrameView<'_>) {
        let mut log = self.lock();
        log.presented += 1;
        log.last_frame = frame.frame;
        log.last_label_count = frame.labels.len();
    }
}

/// Creates a scene client and the receiver its requests arrive on.
pub fn create_mock_scene_client(buffer_size: usize) -> (SceneClient, mpsc::Receiver<SceneRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (SceneClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Frame request.
pub async fn expect_frame(
    receiver: &mut mpsc::Receiver<SceneRequest>,
) -> Option<(f32, oneshot::Sender<Result<FrameReport, SceneError>>)> {
    match receiver.recv().await {
        Some(SceneRequest::Frame { time, respond_to }) => Some((time, respond_to)),
        _ => None,
    }
}

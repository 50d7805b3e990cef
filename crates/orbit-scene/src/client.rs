//! # Scene Client
//!
//! The cloneable handle used to talk to a running [`SceneActor`](crate::actor::SceneActor).

use crate::camera::{Pointer, Viewport};
use crate::error::SceneError;
use crate::message::SceneRequest;
use crate::scene::{FrameReport, SceneContent, SceneSnapshot};
use tokio::sync::{mpsc, oneshot};

/// Async API over the scene actor's channel. Holds only a sender, so clones
/// are cheap and can be handed to the frame driver, the asset loader and input
/// handlers alike.
#[derive(Clone, Debug)]
pub struct SceneClient {
    sender: mpsc::Sender<SceneRequest>,
}

impl SceneClient {
    pub fn new(sender: mpsc::Sender<SceneRequest>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T, SceneError>>) -> SceneRequest,
    ) -> Result<T, SceneError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| SceneError::ActorClosed)?;
        response.await.map_err(|_| SceneError::ActorDropped)?
    }

    pub async fn install(&self, content: SceneContent) -> Result<(), SceneError> {
        let content = Box::new(content);
        self.request(|respond_to| SceneRequest::Install {
            content,
            respond_to,
        })
        .await
    }

    pub async fn frame(&self, time: f32) -> Result<FrameReport, SceneError> {
        self.request(|respond_to| SceneRequest::Frame { time, respond_to })
            .await
    }

    pub async fn pointer_moved(&self, pointer: Pointer) -> Result<(), SceneError> {
        self.request(|respond_to| SceneRequest::PointerMoved {
            pointer,
            respond_to,
        })
        .await
    }

    pub async fn resize(&self, viewport: Viewport) -> Result<(), SceneError> {
        self.request(|respond_to| SceneRequest::Resize {
            viewport,
            respond_to,
        })
        .await
    }

    pub async fn snapshot(&self) -> Result<SceneSnapshot, SceneError> {
        self.request(|respond_to| SceneRequest::Snapshot { respond_to })
            .await
    }
}

//! # Scene Messages
//!
//! Requests sent from a [`SceneClient`](crate::client::SceneClient) to the
//! [`SceneActor`](crate::actor::SceneActor). Every request carries a one-shot
//! channel for its reply, so callers can await completion.

use crate::camera::{Pointer, Viewport};
use crate::error::SceneError;
use crate::scene::{FrameReport, SceneContent, SceneSnapshot};
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the scene actor.
pub type Response<T> = oneshot::Sender<Result<T, SceneError>>;

/// Everything the scene actor can be asked to do.
///
/// - **Install**: hand over the loaded pool and labels (`Uninitialized` → `Running`).
/// - **Frame**: advance one frame at the given elapsed time, then render.
/// - **PointerMoved** / **Resize**: feed the parallax camera.
/// - **Snapshot**: clone the current state for inspection.
#[derive(Debug)]
pub enum SceneRequest {
    Install {
        content: Box<SceneContent>,
        respond_to: Response<()>,
    },
    Frame {
        time: f32,
        respond_to: Response<FrameReport>,
    },
    PointerMoved {
        pointer: Pointer,
        respond_to: Response<()>,
    },
    Resize {
        viewport: Viewport,
        respond_to: Response<()>,
    },
    Snapshot {
        respond_to: Response<SceneSnapshot>,
    },
}

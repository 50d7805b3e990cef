//! Render sinks: where finished transforms go.

use crate::buffer::InstanceBuffer;
use crate::scene::FrameView;
use tracing::{debug, trace};

/// Consumer of the animator's output.
///
/// The animator owns no render pass. After each frame it calls
/// [`upload`](RenderSink::upload) for every buffer flagged dirty, then
/// [`present`](RenderSink::present) exactly once.
pub trait RenderSink: Send + 'static {
    fn upload(&mut self, buffer: &InstanceBuffer);

    fn present(&mut self, frame: &FrameView<'_>);
}

/// Draws nothing; logs a heartbeat every `log_every` frames.
#[derive(Debug)]
pub struct HeadlessSink {
    log_every: u64,
    uploads: u64,
}

impl HeadlessSink {
    pub fn new(log_every: u64) -> Self {
        Self {
            log_every: log_every.max(1),
            uploads: 0,
        }
    }
}

impl Default for HeadlessSink {
    fn default() -> Self {
        Self::new(600)
    }
}

impl RenderSink for HeadlessSink {
    fn upload(&mut self, buffer: &InstanceBuffer) {
        self.uploads += 1;
        trace!(kind = ?buffer.kind(), instances = buffer.len(), "Upload");
    }

    fn present(&mut self, frame: &FrameView<'_>) {
        if frame.frame % self.log_every == 0 {
            debug!(
                frame = frame.frame,
                time = frame.time,
                uploads = self.uploads,
                labels = frame.labels.len(),
                "Presented"
            );
        }
    }
}

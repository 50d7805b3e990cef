//! # Frame Driver
//!
//! Stands in for the display refresh callback: ticks at a fixed rate and asks
//! the scene actor for one frame per tick, passing the seconds elapsed since
//! the driver started. Each frame is awaited before the next tick is taken,
//! and late ticks are skipped rather than replayed in a burst.

use crate::client::SceneClient;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{info, trace, warn};

pub struct FrameDriver {
    client: SceneClient,
    fps: u32,
}

impl FrameDriver {
    pub fn new(client: SceneClient, fps: u32) -> Self {
        Self {
            client,
            fps: fps.max(1),
        }
    }

    pub fn period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps))
    }

    /// Runs until `shutdown` turns `true` (or its sender is dropped) or the
    /// scene actor goes away. Returns the number of frames delivered.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> u64 {
        let start = Instant::now();
        let mut ticker = tokio::time::interval(self.period());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut frames = 0u64;
        info!(fps = self.fps, "Frame driver started");

        while !*shutdown.borrow() {
            tokio::select! {
                _ = ticker.tick() => {
                    let time = start.elapsed().as_secs_f32();
                    match self.client.frame(time).await {
                        Ok(report) => {
                            frames += 1;
                            trace!(frame = report.frame, advanced = report.advanced, "Tick");
                        }
                        Err(e) => {
                            warn!(error = %e, "Scene unavailable, stopping");
                            break;
                        }
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        info!(frames, "Frame driver stopped");
        frames
    }
}

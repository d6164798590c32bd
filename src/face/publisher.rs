use super::Face;
use crate::pose::FrameSource;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Publishes the resting pose of the current emotion for the whole process
/// lifetime. Skips its ticks while a jaw animation owns the stream.
pub struct PosePublisher {
    face: Arc<Face>,
}

impl PosePublisher {
    pub fn new(face: Arc<Face>) -> Self {
        Self { face }
    }

    /// Start publishing until `shutdown` is cancelled. The task returns the
    /// number of frames it emitted.
    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<u64> {
        tokio::spawn(async move { self.run(shutdown).await })
    }

    async fn run(self, shutdown: CancellationToken) -> u64 {
        let period = self.face.config().publish_interval;
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut published = 0u64;

        log::info!("📡 Pose publisher started ({:?} cadence)", period);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            if self.face.state().is_animating() {
                continue;
            }

            // Emotion is read at the tick, never cached across ticks.
            let pose = self.face.resting_pose();
            self.face.emit(pose, FrameSource::Resting).await;
            published += 1;
        }

        log::info!("📡 Pose publisher stopped after {} frames", published);
        published
    }
}

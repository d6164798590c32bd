//! The animated face: shared emotion state, the resting-pose publisher and
//! the jaw animator, all writing to one [`PoseSink`].

pub mod jaw;
pub mod publisher;

use crate::config::AnimationConfig;
use crate::emotion::{EmotionTag, FaceState};
use crate::pose::{FrameSource, PoseFrame, PoseSink, PoseStore, PoseVector};
use std::sync::Arc;

pub use jaw::{jaw_offset, JawAnimation, JawAnimator};
pub use publisher::PosePublisher;

pub struct Face {
    store: PoseStore,
    state: FaceState,
    sink: Arc<dyn PoseSink>,
    config: AnimationConfig,
}

impl Face {
    pub fn new(store: PoseStore, sink: Arc<dyn PoseSink>, config: AnimationConfig) -> Self {
        Self {
            store,
            state: FaceState::new(),
            sink,
            config,
        }
    }

    pub fn store(&self) -> &PoseStore {
        &self.store
    }

    pub fn state(&self) -> &FaceState {
        &self.state
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    pub fn emotion(&self) -> EmotionTag {
        self.state.emotion()
    }

    /// Only the conversation loop should call this.
    pub fn set_emotion(&self, emotion: EmotionTag) {
        self.state.set_emotion(emotion);
    }

    /// Resting pose for the emotion as it is right now.
    pub fn resting_pose(&self) -> PoseVector {
        self.store.pose(self.state.emotion())
    }

    /// Hand one frame to the sink. Delivery failures are logged, never
    /// propagated: the next tick simply tries again.
    pub(crate) async fn emit(&self, pose: PoseVector, source: FrameSource) {
        let frame = PoseFrame::new(pose, source);
        if let Err(e) = self.sink.emit(&frame).await {
            log::debug!("📡 Dropped {:?} frame: {}", source, e);
        }
    }
}

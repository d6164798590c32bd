use super::Face;
use crate::config::AnimationConfig;
use crate::error::FaceError;
use crate::pose::FrameSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, timeout, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Jaw joint position at animation time `t`.
pub fn jaw_offset(t: f64, config: &AnimationConfig) -> f64 {
    config.jaw_amplitude * (t * config.jaw_angular_frequency).sin()
}

/// Starts jaw animations on a [`Face`].
#[derive(Clone)]
pub struct JawAnimator {
    face: Arc<Face>,
}

impl JawAnimator {
    pub fn new(face: Arc<Face>) -> Self {
        Self { face }
    }

    /// Take over the pose stream and start moving the jaw. The animation runs
    /// until [`JawAnimation::stop`] is called or the handle is dropped.
    pub fn start(&self) -> JawAnimation {
        let stop = CancellationToken::new();
        self.face.state().set_animating(true);

        let face = Arc::clone(&self.face);
        let token = stop.clone();
        let handle = tokio::spawn(async move { animate(face, token).await });

        log::debug!("🦴 Jaw animation started");
        JawAnimation {
            stop,
            handle,
            face: Arc::clone(&self.face),
        }
    }
}

async fn animate(face: Arc<Face>, stop: CancellationToken) -> usize {
    let config = face.config().clone();
    // gen_bool panics outside [0, 1]; a NaN chance means no flutter.
    let flutter_probability = if config.flutter_probability.is_nan() {
        0.0
    } else {
        config.flutter_probability.clamp(0.0, 1.0)
    };
    let mut rng = StdRng::from_entropy();
    let mut ticker = interval(config.jaw_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut t = 0.0;
    let mut frames = 0usize;

    loop {
        tokio::select! {
            biased;
            _ = stop.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let mut pose = face.resting_pose().with_jaw(jaw_offset(t, &config));
        if rng.gen_bool(flutter_probability) {
            pose = pose.with_eyes(config.flutter_eye_position);
        }

        log::trace!("🦴 Jaw frame {} at {:+.3}", frames, pose.jaw());
        face.emit(pose, FrameSource::Animation).await;

        frames += 1;
        t += config.jaw_phase_step;
    }

    frames
}

/// A running jaw animation.
pub struct JawAnimation {
    stop: CancellationToken,
    handle: JoinHandle<usize>,
    face: Arc<Face>,
}

impl JawAnimation {
    /// Signal the animation to stop and wait for it, at most one cadence
    /// tick. Returns the number of frames emitted.
    pub async fn stop(mut self) -> Result<usize, FaceError> {
        let deadline = self.face.config().jaw_interval;
        self.stop.cancel();

        let result = timeout(deadline, &mut self.handle).await;
        self.face.state().set_animating(false);

        match result {
            Ok(Ok(frames)) => Ok(frames),
            Ok(Err(e)) => Err(FaceError::General(format!("jaw animation task failed: {}", e))),
            Err(_) => {
                self.handle.abort();
                Err(FaceError::AnimationTimeout(deadline))
            }
        }
    }
}

impl Drop for JawAnimation {
    fn drop(&mut self) {
        self.stop.cancel();
        self.face.state().set_animating(false);
    }
}

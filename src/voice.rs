use crate::face::{Face, JawAnimator};
use crate::services::Speaker;
use std::sync::Arc;

/// Speech with a moving jaw: the [`Speaker`] talks while a [`JawAnimator`]
/// drives the face.
pub struct Voice {
    speaker: Box<dyn Speaker>,
    animator: JawAnimator,
    face: Arc<Face>,
}

impl Voice {
    pub fn new(speaker: Box<dyn Speaker>, face: Arc<Face>) -> Self {
        Self {
            speaker,
            animator: JawAnimator::new(Arc::clone(&face)),
            face,
        }
    }

    /// Speak `text`, animating the jaw for exactly as long as the speaker
    /// blocks. Speaker failures count as "done speaking".
    ///
    /// Returns after the animation has stopped and the close-mouth grace
    /// period has passed, so the resting pose is back on the stream.
    pub async fn speak(&self, text: &str) {
        log::info!("🔊 [{}] {}", self.face.emotion(), text);

        let animation = self.animator.start();

        if let Err(e) = self.speaker.vocalize(text).await {
            log::warn!("🔊 Speaker failed, treating as finished: {}", e);
        }

        match animation.stop().await {
            Ok(frames) => log::debug!("🦴 Jaw animation stopped after {} frames", frames),
            Err(e) => log::error!("🦴 {}", e),
        }

        tokio::time::sleep(self.face.config().close_mouth_grace).await;
    }
}

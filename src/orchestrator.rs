//! The conversation loop: listen, ask the reply engine, pick an emotion,
//! speak with a moving jaw, repeat.

use crate::config::ConversationConfig;
use crate::conversation::ConversationHistory;
use crate::emotion::EmotionTag;
use crate::error::{FaceError, Result};
use crate::face::Face;
use crate::prompts::Phrases;
use crate::services::{ReplyEngine, Speaker, TranscriptSource};
use crate::text;
use crate::voice::Voice;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// External services the loop drives.
pub struct Collaborators {
    pub transcripts: Box<dyn TranscriptSource>,
    pub engine: Box<dyn ReplyEngine>,
    pub speaker: Box<dyn Speaker>,
}

/// How one pass through the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The reply was spoken with this emotion.
    Replied(EmotionTag),
    /// The utterance could not be transcribed.
    NotUnderstood,
    /// The reply engine failed; the user turn stays in the history.
    EngineFailed,
    /// Any other failure.
    Failed,
}

pub struct Orchestrator {
    face: Arc<Face>,
    voice: Voice,
    transcripts: Box<dyn TranscriptSource>,
    engine: Box<dyn ReplyEngine>,
    history: ConversationHistory,
    phrases: Phrases,
    loop_pause: Duration,
}

impl Orchestrator {
    pub fn new(face: Arc<Face>, collaborators: Collaborators, config: &ConversationConfig) -> Self {
        let history = match config.max_turns {
            Some(max) => ConversationHistory::with_cap(config.persona.clone(), max),
            None => ConversationHistory::new(config.persona.clone()),
        };

        Self {
            voice: Voice::new(collaborators.speaker, Arc::clone(&face)),
            face,
            transcripts: collaborators.transcripts,
            engine: collaborators.engine,
            history,
            phrases: config.phrases.clone(),
            loop_pause: config.loop_pause,
        }
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Converse until `shutdown` is cancelled. Never fails: every turn error
    /// ends in an apology and the loop carries on.
    pub async fn run(&mut self, shutdown: CancellationToken) {
        log::info!("🤖 Conversation loop started");

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                outcome = self.run_iteration() => {
                    log::debug!("Turn ended: {:?} ({})", outcome, self.history.summary());
                }
            }

            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(self.loop_pause) => {}
            }
        }

        log::info!("🤖 Conversation loop stopped");
    }

    /// One full turn. Errors are caught here and answered with a sad face
    /// and an apology.
    pub async fn run_iteration(&mut self) -> TurnOutcome {
        match self.take_turn().await {
            Ok(emotion) => TurnOutcome::Replied(emotion),
            Err(e) => {
                let (outcome, apology) = match &e {
                    FaceError::Transcription(_) => {
                        (TurnOutcome::NotUnderstood, &self.phrases.not_understood)
                    }
                    FaceError::Engine(_) => (TurnOutcome::EngineFailed, &self.phrases.engine_failure),
                    _ => (TurnOutcome::Failed, &self.phrases.generic_failure),
                };
                log::warn!("❌ Turn failed: {}", e);

                let apology = apology.clone();
                self.face.set_emotion(EmotionTag::Sad);
                self.voice.speak(&apology).await;
                outcome
            }
        }
    }

    async fn take_turn(&mut self) -> Result<EmotionTag> {
        self.face.set_emotion(EmotionTag::Neutral);
        self.voice.speak(&self.phrases.listening).await;

        let transcript = self.transcripts.capture().await?;
        log::info!("🎤 Heard: '{}'", transcript);
        self.history.push_user(transcript);

        let raw = self.engine.infer(&self.history).await?;
        let reply = text::clean_reply(&raw);

        let tag = text::extract_emotion(&reply);
        let emotion = if self.face.store().contains(tag) {
            tag
        } else {
            log::warn!("🎭 No pose for '{}', falling back to sad", tag);
            EmotionTag::Sad
        };
        self.face.set_emotion(emotion);
        log::info!("🧠 Reply ({}): '{}'", emotion, reply);

        let spoken = text::remove_emotion_marker(&reply);
        self.history.push_assistant(reply);

        self.voice.speak(&spoken).await;
        Ok(emotion)
    }
}

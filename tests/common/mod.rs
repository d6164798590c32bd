#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use talking_face::{
    config::{AnimationConfig, ConversationConfig},
    conversation::{ConversationHistory, ConversationTurn},
    error::{EngineError, SpeakerError, TranscriptionError},
    pose::{MemoryPoseSink, PoseStore, PoseVector, POSE_LEN},
    services::{ReplyEngine, Speaker, TranscriptSource},
    Collaborators, EmotionTag, Face, Orchestrator,
};

/// Store whose every joint holds the tag discriminant, so a frame tells
/// which emotion it was built from.
pub fn tagged_store() -> PoseStore {
    PoseStore::from_fn(|tag| PoseVector::new([tag as u8 as f64; POSE_LEN]))
}

/// Emotion a frame from [`tagged_store`] was built from, read off the neck.
pub fn emotion_of(position: &PoseVector) -> Option<EmotionTag> {
    EmotionTag::from_repr(position.positions()[0] as u8)
}

pub fn quiet_animation() -> AnimationConfig {
    AnimationConfig {
        flutter_probability: 0.0,
        ..AnimationConfig::default()
    }
}

pub fn test_face(sink: Arc<MemoryPoseSink>) -> Arc<Face> {
    Arc::new(Face::new(tagged_store(), sink, quiet_animation()))
}

/// Transcripts played back in order. Once the script runs out every capture
/// fails as if the service were down.
pub struct ScriptedTranscripts {
    script: VecDeque<Result<String, TranscriptionError>>,
}

impl ScriptedTranscripts {
    pub fn new(script: Vec<Result<String, TranscriptionError>>) -> Self {
        Self {
            script: script.into(),
        }
    }

    pub fn saying(lines: &[&str]) -> Self {
        Self::new(lines.iter().map(|l| Ok(l.to_string())).collect())
    }
}

#[async_trait]
impl TranscriptSource for ScriptedTranscripts {
    async fn capture(&mut self) -> Result<String, TranscriptionError> {
        self.script.pop_front().unwrap_or_else(|| {
            Err(TranscriptionError::ServiceUnavailable(
                "script exhausted".to_string(),
            ))
        })
    }
}

/// Reply engine returning canned replies and recording the history it was
/// asked about.
pub struct ScriptedEngine {
    replies: Mutex<VecDeque<Result<String, EngineError>>>,
    pub requests: Arc<Mutex<Vec<Vec<ConversationTurn>>>>,
}

impl ScriptedEngine {
    pub fn new(replies: Vec<Result<String, EngineError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn replying(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }
}

#[async_trait]
impl ReplyEngine for ScriptedEngine {
    async fn infer(&self, history: &ConversationHistory) -> Result<String, EngineError> {
        self.requests
            .lock()
            .unwrap()
            .push(history.turns().cloned().collect());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(EngineError::Unavailable("no reply scripted".to_string())))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    /// Emotion on the face when speech started.
    pub emotion: EmotionTag,
}

/// Speaker that takes `duration` per utterance and remembers what it said.
pub struct RecordingSpeaker {
    face: Arc<Face>,
    duration: Duration,
    fail: bool,
    pub spoken: Arc<Mutex<Vec<Utterance>>>,
}

impl RecordingSpeaker {
    pub fn new(face: Arc<Face>) -> Self {
        Self {
            face,
            duration: Duration::ZERO,
            fail: false,
            spoken: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn taking(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

#[async_trait]
impl Speaker for RecordingSpeaker {
    async fn vocalize(&self, text: &str) -> Result<(), SpeakerError> {
        self.spoken.lock().unwrap().push(Utterance {
            text: text.to_string(),
            emotion: self.face.emotion(),
        });
        if !self.duration.is_zero() {
            tokio::time::sleep(self.duration).await;
        }
        if self.fail {
            return Err(SpeakerError::ExitStatus(1));
        }
        Ok(())
    }
}

/// Orchestrator wired to fakes, with handles on everything the fakes record.
pub struct Harness {
    pub face: Arc<Face>,
    pub sink: Arc<MemoryPoseSink>,
    pub spoken: Arc<Mutex<Vec<Utterance>>>,
    pub requests: Arc<Mutex<Vec<Vec<ConversationTurn>>>>,
    pub orchestrator: Orchestrator,
}

impl Harness {
    pub fn new(transcripts: ScriptedTranscripts, engine: ScriptedEngine) -> Self {
        Self::with_config(transcripts, engine, ConversationConfig::default())
    }

    pub fn with_config(
        transcripts: ScriptedTranscripts,
        engine: ScriptedEngine,
        config: ConversationConfig,
    ) -> Self {
        let sink = Arc::new(MemoryPoseSink::new());
        let face = test_face(sink.clone());
        let speaker = RecordingSpeaker::new(face.clone());
        Self::assemble(face, sink, transcripts, engine, speaker, config)
    }

    pub fn assemble(
        face: Arc<Face>,
        sink: Arc<MemoryPoseSink>,
        transcripts: ScriptedTranscripts,
        engine: ScriptedEngine,
        speaker: RecordingSpeaker,
        config: ConversationConfig,
    ) -> Self {
        let spoken = speaker.spoken.clone();
        let requests = engine.requests.clone();
        let orchestrator = Orchestrator::new(
            face.clone(),
            Collaborators {
                transcripts: Box::new(transcripts),
                engine: Box::new(engine),
                speaker: Box::new(speaker),
            },
            &config,
        );

        Self {
            face,
            sink,
            spoken,
            requests,
            orchestrator,
        }
    }

    pub fn spoken(&self) -> Vec<Utterance> {
        self.spoken.lock().unwrap().clone()
    }

    pub fn spoken_texts(&self) -> Vec<String> {
        self.spoken().into_iter().map(|u| u.text).collect()
    }
}

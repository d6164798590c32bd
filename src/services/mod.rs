pub mod engine;
pub mod speaker;
pub mod transcript;

use crate::conversation::ConversationHistory;
use crate::error::{EngineError, SpeakerError, TranscriptionError};
use async_trait::async_trait;

pub use engine::OllamaReplyEngine;
pub use speaker::EspeakSpeaker;
pub use transcript::{CommandTranscriptSource, ConsoleTranscriptSource};

/// Service trait for speech-to-text: captures one utterance and returns its
/// text. Blocks the conversation loop until done.
#[async_trait]
pub trait TranscriptSource: Send {
    async fn capture(&mut self) -> Result<String, TranscriptionError>;
}

/// Service trait for the language model: raw reply text for the full history,
/// possibly wrapped in reasoning blocks.
#[async_trait]
pub trait ReplyEngine: Send + Sync {
    async fn infer(&self, history: &ConversationHistory) -> Result<String, EngineError>;
}

/// Service trait for text-to-speech. Returns once the text has been spoken.
#[async_trait]
pub trait Speaker: Send + Sync {
    async fn vocalize(&self, text: &str) -> Result<(), SpeakerError>;
}

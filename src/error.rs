use thiserror::Error;

pub type Result<T> = std::result::Result<T, FaceError>;

/// Failure to turn one captured utterance into text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranscriptionError {
    #[error("No speech understood")]
    NoSpeechUnderstood,

    #[error("Transcription service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// The reply engine errored or returned something that is not text.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Response parsing error: {0}")]
    ParseError(String),

    #[error("Engine unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum SpeakerError {
    #[error("Failed to start speech synthesizer: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Speech synthesizer exited with status {0}")]
    ExitStatus(i32),

    #[error("Speech synthesizer was terminated by a signal")]
    Terminated,
}

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Frame encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum PoseStoreError {
    #[error("Failed to read pose file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse pose data: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("No pose defined for emotion '{0}'")]
    MissingEmotion(String),

    #[error("Pose for '{emotion}' has {len} positions, expected {expected}")]
    WrongLength {
        emotion: String,
        len: usize,
        expected: usize,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: String, reason: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum FaceError {
    #[error("STT error: {0}")]
    Transcription(#[from] TranscriptionError),

    #[error("LLM error: {0}")]
    Engine(#[from] EngineError),

    #[error("TTS error: {0}")]
    Speaker(#[from] SpeakerError),

    #[error("Pose sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("Pose store error: {0}")]
    PoseStore(#[from] PoseStoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Jaw animation did not stop within {0:?}")]
    AnimationTimeout(std::time::Duration),

    #[error("General error: {0}")]
    General(String),
}

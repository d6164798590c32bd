use crate::error::ConfigError;
use crate::prompts::{Phrases, SystemPrompts};
use secrecy::{ExposeSecret, SecretBox};
use std::env;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "deepseek-r1:8b";

/// Timing and shape of the pose tasks.
#[derive(Debug, Clone)]
pub struct AnimationConfig {
    /// Resting-pose publish cadence.
    pub publish_interval: Duration,
    /// Jaw frame cadence while speaking.
    pub jaw_interval: Duration,
    /// Pause after speech so the resting pose closes the mouth.
    pub close_mouth_grace: Duration,
    pub jaw_amplitude: f64,
    /// Radians per unit of animation time.
    pub jaw_angular_frequency: f64,
    /// Animation time advanced per jaw frame.
    pub jaw_phase_step: f64,
    /// Chance per jaw frame of widening both eyes.
    pub flutter_probability: f64,
    pub flutter_eye_position: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            publish_interval: Duration::from_millis(100),
            jaw_interval: Duration::from_millis(200),
            close_mouth_grace: Duration::from_millis(100),
            jaw_amplitude: 0.2,
            jaw_angular_frequency: 20.0,
            jaw_phase_step: 0.1,
            flutter_probability: 20.0 / 300.0,
            flutter_eye_position: 0.680,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConversationConfig {
    /// Content of the system turn that opens the history.
    pub persona: String,
    pub phrases: Phrases,
    /// Pause between turns.
    pub loop_pause: Duration,
    /// Keep at most this many turns after the system turn. `None` keeps all.
    pub max_turns: Option<usize>,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            persona: SystemPrompts::boris(),
            phrases: Phrases::default(),
            loop_pause: Duration::from_secs(1),
            max_turns: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FaceConfig {
    pub animation: AnimationConfig,
    pub conversation: ConversationConfig,
}

impl FaceConfig {
    /// Replace the persona with the contents of a text file.
    pub fn with_persona_file(mut self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let persona = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        if persona.trim().is_empty() {
            return Err(invalid("persona", "persona file is empty"));
        }
        self.conversation.persona = persona.trim().to_string();
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let animation = &self.animation;
        if animation.publish_interval.is_zero() {
            return Err(invalid("publish_interval", "must be greater than zero"));
        }
        if animation.jaw_interval.is_zero() {
            return Err(invalid("jaw_interval", "must be greater than zero"));
        }
        if !(0.0..=1.0).contains(&animation.flutter_probability) {
            return Err(invalid("flutter_probability", "must be within [0, 1]"));
        }
        if self.conversation.persona.trim().is_empty() {
            return Err(invalid("persona", "cannot be empty"));
        }
        if self.conversation.max_turns == Some(0) {
            return Err(invalid("max_turns", "must keep at least one turn"));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// Reply engine endpoint settings.
#[derive(Debug)]
pub struct EngineConfig {
    pub base_url: String,
    pub model: String,
    api_key: Option<SecretBox<String>>,
}

impl EngineConfig {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            api_key: None,
        }
    }

    /// Load from `OLLAMA_URL`, `OLLAMA_MODEL` and the optional `LLM_API_KEY`,
    /// reading a `.env` file first if there is one.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let base_url = env::var("OLLAMA_URL").unwrap_or_else(|_| DEFAULT_OLLAMA_URL.to_string());
        let model = env::var("OLLAMA_MODEL").unwrap_or_else(|_| DEFAULT_OLLAMA_MODEL.to_string());
        let api_key = Self::load_api_key("LLM_API_KEY")?;

        Ok(Self {
            base_url,
            model,
            api_key,
        })
    }

    fn load_api_key(env_var: &str) -> Result<Option<SecretBox<String>>, ConfigError> {
        match env::var(env_var) {
            Ok(key) if key.trim().is_empty() => Err(invalid(env_var, "API key cannot be empty")),
            Ok(key) => Ok(Some(SecretBox::new(Box::new(key)))),
            Err(_) => Ok(None),
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretBox::new(Box::new(key.into())));
        self
    }

    /// Bearer token, if any (use only when making API calls).
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(|key| key.expose_secret().as_str())
    }
}

pub mod config;
pub mod conversation;
pub mod emotion;
pub mod error;
pub mod face;
pub mod orchestrator;
pub mod pose;
pub mod prompts;
pub mod services;
pub mod text;
pub mod voice;

pub use emotion::EmotionTag;
pub use error::{FaceError, Result};
pub use face::Face;
pub use orchestrator::{Collaborators, Orchestrator, TurnOutcome};

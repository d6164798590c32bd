use super::Speaker;
use crate::error::SpeakerError;
use async_trait::async_trait;
use tokio::process::Command;

/// Speaks through the `espeak-ng` command-line synthesizer.
#[derive(Debug, Clone)]
pub struct EspeakSpeaker {
    program: String,
    voice: String,
    rate: u32,
}

impl EspeakSpeaker {
    pub fn with_program(program: impl Into<String>, voice: impl Into<String>, rate: u32) -> Self {
        Self {
            program: program.into(),
            voice: voice.into(),
            rate,
        }
    }
}

#[async_trait]
impl Speaker for EspeakSpeaker {
    async fn vocalize(&self, text: &str) -> Result<(), SpeakerError> {
        if text.trim().is_empty() {
            log::info!("Empty text, skipping TTS");
            return Ok(());
        }

        let status = Command::new(&self.program)
            .arg("-v")
            .arg(&self.voice)
            .arg("-s")
            .arg(self.rate.to_string())
            .arg(text)
            .kill_on_drop(true)
            .status()
            .await?;

        if status.success() {
            Ok(())
        } else {
            Err(status
                .code()
                .map(SpeakerError::ExitStatus)
                .unwrap_or(SpeakerError::Terminated))
        }
    }
}

use super::TranscriptSource;
use crate::error::TranscriptionError;
use async_trait::async_trait;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::process::Command;

/// Runs an external recognizer once per utterance; its stdout is the
/// transcript.
///
/// The command owns microphone capture, end-of-speech detection and
/// recognition. Empty output means nothing was understood.
#[derive(Debug, Clone)]
pub struct CommandTranscriptSource {
    program: String,
    args: Vec<String>,
}

impl CommandTranscriptSource {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Split a command line on whitespace. No quoting support.
    pub fn from_command_line(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }
}

#[async_trait]
impl TranscriptSource for CommandTranscriptSource {
    async fn capture(&mut self) -> Result<String, TranscriptionError> {
        log::debug!("🎤 Running recognizer: {} {:?}", self.program, self.args);

        let output = Command::new(&self.program)
            .args(&self.args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                TranscriptionError::ServiceUnavailable(format!("{}: {}", self.program, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TranscriptionError::ServiceUnavailable(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let transcript = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if transcript.is_empty() {
            return Err(TranscriptionError::NoSpeechUnderstood);
        }
        Ok(transcript)
    }
}

/// Reads typed lines from stdin in place of a microphone.
pub struct ConsoleTranscriptSource {
    lines: Lines<BufReader<Stdin>>,
}

impl ConsoleTranscriptSource {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for ConsoleTranscriptSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranscriptSource for ConsoleTranscriptSource {
    async fn capture(&mut self) -> Result<String, TranscriptionError> {
        print!("🎤 > ");
        std::io::stdout().flush().ok();
        match self.lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => Err(TranscriptionError::NoSpeechUnderstood),
            Ok(Some(line)) => Ok(line.trim().to_string()),
            Ok(None) => Err(TranscriptionError::ServiceUnavailable(
                "stdin closed".to_string(),
            )),
            Err(e) => Err(TranscriptionError::ServiceUnavailable(e.to_string())),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stdout_becomes_transcript() {
        let mut source = CommandTranscriptSource::from_command_line("echo  Oi BORIS ").unwrap();
        assert_eq!(source.capture().await.unwrap(), "Oi BORIS");
    }

    #[tokio::test]
    async fn test_empty_output_is_not_understood() {
        let mut source = CommandTranscriptSource::new("true", vec![]);
        assert_eq!(
            source.capture().await,
            Err(TranscriptionError::NoSpeechUnderstood)
        );
    }

    #[tokio::test]
    async fn test_failures_are_service_unavailable() {
        let mut failing = CommandTranscriptSource::new("false", vec![]);
        assert!(matches!(
            failing.capture().await,
            Err(TranscriptionError::ServiceUnavailable(_))
        ));

        let mut missing = CommandTranscriptSource::new("no-such-recognizer-binary", vec![]);
        assert!(matches!(
            missing.capture().await,
            Err(TranscriptionError::ServiceUnavailable(_))
        ));
    }

    #[test]
    fn test_blank_command_line() {
        assert!(CommandTranscriptSource::from_command_line("   ").is_none());
    }
}

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use talking_face::{
    config::{EngineConfig, FaceConfig},
    face::{Face, PosePublisher},
    pose::{LogPoseSink, PoseSink, PoseStore, TcpPoseSink},
    services::{
        CommandTranscriptSource, ConsoleTranscriptSource, EspeakSpeaker, OllamaReplyEngine,
        TranscriptSource,
    },
    Collaborators, Orchestrator,
};
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(author, version, about = "Talking robotic face", long_about = None)]
struct Args {
    /// YAML file with one resting pose per emotion
    #[arg(long, default_value = "config/emotions.yaml")]
    poses: PathBuf,

    /// Text file replacing the built-in persona
    #[arg(long)]
    persona: Option<PathBuf>,

    /// Reply engine base URL (overrides OLLAMA_URL)
    #[arg(long)]
    ollama_url: Option<String>,

    /// Reply engine model (overrides OLLAMA_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Speech-to-text command printing one transcript to stdout.
    /// Reads typed lines from the console when omitted.
    #[arg(long)]
    stt_command: Option<String>,

    /// Text-to-speech program
    #[arg(long, default_value = "espeak-ng")]
    espeak: String,

    #[arg(long, default_value = "pt-br")]
    voice: String,

    /// Words per minute
    #[arg(long, default_value_t = 160)]
    rate: u32,

    /// Renderer address (host:port). Frames are only logged when omitted.
    #[arg(long)]
    pose_sink: Option<String>,

    /// Keep at most this many turns after the system turn
    #[arg(long)]
    max_turns: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::info!("🚀 Initializing talking-face");

    let mut config = FaceConfig::default();
    if let Some(path) = &args.persona {
        config = config
            .with_persona_file(path)
            .with_context(|| format!("Failed to load persona from {}", path.display()))?;
    }
    config.conversation.max_turns = args.max_turns;
    config.validate().context("Invalid configuration")?;

    let mut engine_config = EngineConfig::from_env().context("Invalid engine configuration")?;
    if let Some(url) = args.ollama_url {
        engine_config.base_url = url;
    }
    if let Some(model) = args.model {
        engine_config.model = model;
    }

    // Without poses there is no face to drive.
    let store = PoseStore::load(&args.poses)
        .with_context(|| format!("Failed to load poses from {}", args.poses.display()))?;

    let sink: Arc<dyn PoseSink> = match args.pose_sink {
        Some(address) => {
            log::info!("📡 Streaming poses to {}", address);
            Arc::new(TcpPoseSink::new(address))
        }
        None => Arc::new(LogPoseSink),
    };

    let transcripts: Box<dyn TranscriptSource> = match args
        .stt_command
        .as_deref()
        .and_then(CommandTranscriptSource::from_command_line)
    {
        Some(source) => Box::new(source),
        None => {
            log::info!("🎤 No STT command given, reading from the console");
            Box::new(ConsoleTranscriptSource::new())
        }
    };

    let engine = OllamaReplyEngine::new(engine_config).context("Failed to create reply engine")?;
    let speaker = EspeakSpeaker::with_program(args.espeak, args.voice, args.rate);

    let face = Arc::new(Face::new(store, sink, config.animation.clone()));
    let shutdown = CancellationToken::new();

    let publisher = PosePublisher::new(Arc::clone(&face)).spawn(shutdown.clone());

    let ctrl_c_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("🛑 Ctrl+C received, shutting down");
        }
        ctrl_c_token.cancel();
    });

    let mut orchestrator = Orchestrator::new(
        face,
        Collaborators {
            transcripts,
            engine: Box::new(engine),
            speaker: Box::new(speaker),
        },
        &config.conversation,
    );
    orchestrator.run(shutdown.clone()).await;

    shutdown.cancel();
    let published = publisher.await.context("Pose publisher panicked")?;
    log::info!("👋 Shut down after {} resting frames", published);
    Ok(())
}

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

use sightline_gateway::api::{ApiServer, ApiState};
use sightline_gateway::voice::{Announcer, AudioPlayback, NarrationEngineFactory, SpeechEngineFactory};
use sightline_gateway::{
    Config, GeminiVision, Orchestrator, SceneDescriber, TesseractOcr, TextExtractor,
    UploadedImage, prompt,
};

/// Sightline - assistive vision gateway for visually impaired users
#[derive(Parser)]
#[command(name = "sightline", version, about)]
struct Cli {
    /// Port to listen on (overrides config)
    #[arg(long, env = "SIGHTLINE_PORT")]
    port: Option<u16>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable spoken narration (for headless servers without audio hardware)
    #[arg(long, env = "SIGHTLINE_DISABLE_VOICE")]
    disable_voice: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Test speaker output with a short tone
    TestSpeaker,
    /// Test speech synthesis and playback
    TestTts {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the text to speech system.")]
        text: String,
    },
    /// Extract printed text from an image file and print it
    Extract {
        /// Path to a JPEG or PNG image
        file: std::path::PathBuf,
    },
    /// Describe the scene in an image file and print it
    Describe {
        /// Path to a JPEG or PNG image
        file: std::path::PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,sightline_gateway=info",
        1 => "info,sightline_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load_with_options(cli.disable_voice)?;

    if let Some(cmd) = cli.command {
        return match cmd {
            Command::TestSpeaker => test_speaker().await,
            Command::TestTts { text } => test_tts(&config, &text).await,
            Command::Extract { file } => extract_file(&config, &file).await,
            Command::Describe { file } => describe_file(&config, &file).await,
        };
    }

    let port = cli.port.unwrap_or(config.server.port);
    tracing::info!(
        port,
        narration = config.voice.enabled,
        vision_model = %config.vision.model,
        "starting sightline gateway"
    );

    let vision_configured = config.api_keys.gemini.is_some();
    let extractor = Arc::new(TesseractOcr::new(&config.ocr));
    let describer = Arc::new(GeminiVision::new(
        config.api_keys.gemini.clone(),
        config.vision.model.clone(),
    ));
    let announcer = build_announcer(&config);

    let orchestrator = Orchestrator::new(
        extractor,
        describer,
        announcer.clone(),
        config.vision.user_context.clone(),
    );

    let state = Arc::new(ApiState {
        orchestrator: Mutex::new(orchestrator),
        narration_enabled: announcer.is_enabled(),
        vision_configured,
        vision_model: config.vision.model,
    });

    ApiServer::new(state, port).run().await?;
    Ok(())
}

/// Build the announcer, degrading to silent when narration is unavailable
fn build_announcer(config: &Config) -> Announcer {
    if !config.voice.enabled {
        return Announcer::disabled();
    }

    match &config.api_keys.openai {
        Some(key) => Announcer::new(Arc::new(NarrationEngineFactory::new(
            key.clone(),
            config.voice.clone(),
        ))),
        None => {
            tracing::warn!("no OpenAI API key; narration disabled (results shown visually only)");
            Announcer::disabled()
        }
    }
}

/// Play a short tone through the default output device
async fn test_speaker() -> anyhow::Result<()> {
    println!("Playing test tone...");
    tokio::task::spawn_blocking(|| {
        let playback = AudioPlayback::new()?;
        let sample_rate = 24_000u32;
        let samples: Vec<f32> = (0..sample_rate)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                0.2 * (2.0 * std::f32::consts::PI * 440.0 * t).sin()
            })
            .collect();
        playback.play_pcm(samples, sample_rate)
    })
    .await??;
    println!("Done.");
    Ok(())
}

/// Synthesize the text and play it once
async fn test_tts(config: &Config, text: &str) -> anyhow::Result<()> {
    let key = config
        .api_keys
        .openai
        .clone()
        .ok_or_else(|| anyhow::anyhow!("OPENAI_API_KEY required for TTS test"))?;

    println!("Synthesizing: {text}");
    let factory = NarrationEngineFactory::new(key, config.voice.clone());
    let mut engine = factory.create()?;
    engine.speak(text).await?;
    println!("Done.");
    Ok(())
}

/// One-shot text extraction from an image file
async fn extract_file(config: &Config, file: &std::path::Path) -> anyhow::Result<()> {
    let image = load_image(file)?;
    let extractor = TesseractOcr::new(&config.ocr);
    let text = extractor.extract(&image).await?;
    if text.is_empty() {
        println!("(no text found)");
    } else {
        println!("{text}");
    }
    Ok(())
}

/// One-shot scene description of an image file
async fn describe_file(config: &Config, file: &std::path::Path) -> anyhow::Result<()> {
    let image = load_image(file)?;
    let describer = GeminiVision::new(config.api_keys.gemini.clone(), config.vision.model.clone());
    let instruction = prompt::scene_instruction(&config.vision.user_context);
    let description = describer.describe(&instruction, &image).await?;
    println!("{description}");
    Ok(())
}

/// Read and validate an image file for the one-shot commands
fn load_image(file: &std::path::Path) -> anyhow::Result<UploadedImage> {
    let data = std::fs::read(file)?;
    Ok(UploadedImage::from_bytes(data)?)
}

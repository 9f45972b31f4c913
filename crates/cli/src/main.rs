use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use gallery::{DailyRefresh, GallerySession, GalleryState};
use genai::{GeminiText, GeminiVideo, GenAiConfig, JobPoller, PromptPipeline};
use std::path::PathBuf;
use std::sync::Arc;
use store::GalleryStore;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "reverie")]
#[command(about = "Reverie - Daily AI video gallery from the terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Gemini API key (falls back to the GEMINI_API_KEY environment variable)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Gallery data directory (defaults to the platform app-data location)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the cached gallery without generating anything
    Show,

    /// Load the gallery and run the daily batch if one is due today
    Refresh {
        /// Run the batch even if one already ran today
        #[arg(long)]
        force: bool,

        /// How many videos the daily batch generates
        #[arg(long, default_value = "3")]
        count: usize,
    },

    /// Generate one video from a prompt and add it to the gallery
    Create {
        /// Prompt describing the video
        prompt: String,
    },

    /// Re-generate an existing entry from an edited prompt
    Remix {
        /// Id of the source entry (see `show`)
        id: String,

        /// Replacement prompt (defaults to the source entry's prompt)
        #[arg(long)]
        prompt: Option<String>,
    },

    /// Write a cached inline video payload to a file
    Export {
        /// Id of the entry to export (see `show`)
        id: String,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt().with_max_level(level).init();

    let store = match cli.data_dir {
        Some(dir) => GalleryStore::new(dir),
        None => GalleryStore::at_default_location(),
    };

    match cli.command {
        Commands::Show => show_command(store).await,
        Commands::Refresh { force, count } => {
            let pipeline = build_pipeline(cli.api_key)?;
            refresh_command(store, pipeline, force, count).await
        }
        Commands::Create { prompt } => {
            let pipeline = build_pipeline(cli.api_key)?;
            create_command(store, pipeline, prompt).await
        }
        Commands::Remix { id, prompt } => {
            let pipeline = build_pipeline(cli.api_key)?;
            remix_command(store, pipeline, id, prompt).await
        }
        Commands::Export { id, output } => export_command(store, id, output).await,
    }
}

fn build_pipeline(api_key: Option<String>) -> Result<PromptPipeline> {
    let key = api_key
        .or_else(|| std::env::var("GEMINI_API_KEY").ok())
        .unwrap_or_default();
    let config = GenAiConfig::new(key);
    let video = Arc::new(GeminiVideo::new(config.clone())?);
    let text = Arc::new(GeminiText::new(config)?);
    Ok(PromptPipeline::new(JobPoller::new(video), text))
}

async fn show_command(store: GalleryStore) -> Result<()> {
    let (videos, marker) = store.load();

    match marker {
        Some(at) => info!("last daily refresh: {}", at.with_timezone(&Local)),
        None => info!("no daily refresh has run yet"),
    }

    println!("{} videos in {}", videos.len(), store.dir().display());
    for video in &videos {
        let kind = if video.payload.starts_with("data:") {
            "inline"
        } else {
            "remote"
        };
        println!();
        println!("  {}  {}  [{}]", video.id, video.title, kind);
        println!("      {}", video.description);
    }

    Ok(())
}

async fn refresh_command(
    store: GalleryStore,
    pipeline: PromptPipeline,
    force: bool,
    count: usize,
) -> Result<()> {
    let mut session =
        GallerySession::new(store, pipeline).with_daily_refresh(DailyRefresh::new(count));

    // Echo batch progress while the session works.
    let mut updates = session.subscribe();
    let progress = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            if let GalleryState::DailyRefreshing { status } = &*updates.borrow() {
                if !status.is_empty() {
                    println!("{status}");
                }
            }
        }
    });

    if force {
        session.refresh_now().await?;
    } else {
        session.initialize().await?;
    }

    let failed = dismiss_if_failed(&mut session)?;
    if !failed {
        println!("gallery now holds {} videos", session.videos().len());
    }

    drop(session);
    let _ = progress.await;
    Ok(())
}

async fn create_command(
    store: GalleryStore,
    pipeline: PromptPipeline,
    prompt: String,
) -> Result<()> {
    let mut session = GallerySession::new(store, pipeline);
    session.initialize().await?;
    dismiss_if_failed(&mut session)?;

    info!("generating video for \"{prompt}\"");
    session.start_create()?;
    session.confirm_edit(&prompt).await?;
    report_outcome(&session)
}

async fn remix_command(
    store: GalleryStore,
    pipeline: PromptPipeline,
    id: String,
    prompt: Option<String>,
) -> Result<()> {
    let mut session = GallerySession::new(store, pipeline);
    session.initialize().await?;
    dismiss_if_failed(&mut session)?;

    let source = session
        .video(&id)
        .ok_or_else(|| anyhow::anyhow!("no artifact with id {id}"))?;
    let prompt = prompt.unwrap_or_else(|| source.description.clone());

    info!("remixing \"{}\"", id);
    session.start_remix(&id)?;
    session.confirm_edit(&prompt).await?;
    report_outcome(&session)
}

async fn export_command(store: GalleryStore, id: String, output: PathBuf) -> Result<()> {
    let (videos, _) = store.load();
    let video = videos
        .iter()
        .find(|v| v.id == id)
        .ok_or_else(|| anyhow::anyhow!("no artifact with id {id}"))?;

    let encoded = video
        .payload
        .strip_prefix("data:video/mp4;base64,")
        .ok_or_else(|| {
            anyhow::anyhow!(
                "\"{}\" is stored as a remote reference, not an inline payload",
                video.title
            )
        })?;

    use base64::Engine;
    let bytes = base64::engine::general_purpose::STANDARD.decode(encoded)?;
    std::fs::write(&output, &bytes)?;

    info!("wrote {} bytes", bytes.len());
    println!("exported \"{}\" to {}", video.title, output.display());
    Ok(())
}

// Prints a surfaced daily-refresh failure and returns the session to
// browsing so user commands can proceed.
fn dismiss_if_failed(session: &mut GallerySession) -> Result<bool> {
    let messages = match session.state() {
        GalleryState::Error { messages } => messages.clone(),
        _ => return Ok(false),
    };
    for line in &messages {
        warn!("{line}");
    }
    session.dismiss_error()?;
    Ok(true)
}

fn report_outcome(session: &GallerySession) -> Result<()> {
    match session.state() {
        GalleryState::Playing { id } => {
            let video = session
                .video(id)
                .ok_or_else(|| anyhow::anyhow!("generated video missing from the collection"))?;
            println!("generated \"{}\"", video.title);
            println!("  id: {}", video.id);
            println!("  prompt: {}", video.description);
            Ok(())
        }
        GalleryState::Error { messages } => {
            for line in messages {
                eprintln!("{line}");
            }
            Err(anyhow::anyhow!("generation failed"))
        }
        other => Err(anyhow::anyhow!("unexpected session state: {}", other.label())),
    }
}

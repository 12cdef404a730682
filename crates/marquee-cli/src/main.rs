//! Marquee CLI - Headless Session Driver
//!
//! Features:
//! - Source classification (progressive/HLS/DASH/smooth-streaming)
//! - Scripted playback sessions against a simulated engine
//! - Session event timeline and exit-result inspection

use clap::{Parser, Subcommand};

mod commands;
mod output;
mod sim;

/// Marquee CLI - video session toolkit
#[derive(Parser)]
#[command(name = "marquee-cli")]
#[command(version)]
#[command(about = "Video player session inspection toolkit", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify source URIs by stream type
    Probe {
        /// One or more source URIs
        uris: Vec<String>,
    },

    /// Run a scripted playback session against the simulated engine
    Play {
        /// Source URI
        uri: String,

        /// Start playback immediately
        #[arg(long)]
        autoplay: bool,

        /// Restart from the beginning on end of stream
        #[arg(long = "loop")]
        loop_playback: bool,

        /// Initial seek position in milliseconds
        #[arg(long, default_value = "0")]
        start_offset: u64,

        /// Playback speed multiplier (0.5, 1.0, 1.5, 2.0)
        #[arg(long)]
        speed: Option<f32>,

        /// Orientation lock (portrait, landscape, user)
        #[arg(long, default_value = "portrait")]
        orientation: String,

        /// Allow the picture-in-picture transition and simulate the
        /// user-leaving hint mid-session
        #[arg(long)]
        pip: bool,

        /// Simulated playback window in milliseconds
        #[arg(long, default_value = "3000")]
        duration: u64,

        /// Emit events and the exit result as JSON lines
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt().with_env_filter(level).init();

    match cli.command {
        Commands::Probe { uris } => {
            commands::probe(&uris)?;
        }
        Commands::Play {
            uri,
            autoplay,
            loop_playback,
            start_offset,
            speed,
            orientation,
            pip,
            duration,
            json,
        } => {
            commands::play(commands::PlayOptions {
                uri,
                autoplay,
                loop_playback,
                start_offset,
                speed,
                orientation,
                pip,
                duration,
                json,
            })
            .await?;
        }
    }

    Ok(())
}

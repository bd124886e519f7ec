mod adapters;
mod commands;
mod config;
mod domain;
mod error;
mod ports;
mod utils;

use adapters::api::HttpBackendClient;
use adapters::stream::SseBriefingStream;
use clap::{Parser, Subcommand};
use config::ClientConfig;
use domain::session::{BriefingSession, TransientErrorPolicy};
use error::Result;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "meet-brief",
    version,
    about = "Terminal client for the meeting briefing backend"
)]
struct Cli {
    /// Backend base URL (falls back to MEET_BRIEF_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List upcoming meetings from the connected calendar
    Meetings {
        /// Emit the meeting collection as JSON instead of a rendered list
        #[arg(long)]
        json: bool,
    },

    /// Stream briefing generation for one meeting
    Briefing {
        /// Meeting identifier, as shown by `meetings`
        meeting_id: String,

        /// Treatment of stream transport errors
        #[arg(long, value_name = "POLICY", default_value_t = TransientErrorPolicy::Ignore)]
        on_transient_error: TransientErrorPolicy,
    },

    /// Upload a meeting recording for transcription and an emailed summary
    Upload {
        /// Path to the recorded audio file
        file: PathBuf,

        /// Comma-separated recipient email addresses
        #[arg(long)]
        recipients: String,
    },

    /// End the backend calendar session
    Logout,
}

async fn run(cli: Cli) -> Result<()> {
    let config = ClientConfig::resolve(cli.base_url)?;
    log::debug!("Using backend {}", config.base_url);

    match cli.command {
        Command::Meetings { json } => {
            let api = HttpBackendClient::new(&config.base_url)?;
            commands::meetings::run(&api, &config.base_url, json).await
        }
        Command::Briefing {
            meeting_id,
            on_transient_error,
        } => {
            let stream = SseBriefingStream::new(&config.base_url, on_transient_error)?;
            let session = BriefingSession::new(on_transient_error);
            commands::briefing::run(&stream, &meeting_id, session).await
        }
        Command::Upload { file, recipients } => {
            let api = HttpBackendClient::new(&config.base_url)?;
            commands::upload::run(&api, &file, &recipients).await
        }
        Command::Logout => {
            let api = HttpBackendClient::new(&config.base_url)?;
            commands::logout::run(&api).await
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(error) = run(cli).await {
        utils::term::error_line(&error.to_string());
        std::process::exit(1);
    }
}

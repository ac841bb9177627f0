//! Mira Control - CLI client for the Mira interview daemon.

mod client;

use anyhow::Result;
use clap::{Parser, Subcommand};
use client::DaemonClient;

#[derive(Parser)]
#[command(name = "miractl")]
#[command(about = "Mira - emotion-aware interview assistant", long_about = None)]
#[command(version)]
struct Cli {
    /// Daemon base URL
    #[arg(long, default_value = "http://127.0.0.1:5001")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the daemon is up
    Status,

    /// Analyze a face image and print the suggested question
    Analyze {
        /// Path to the image file
        image: std::path::PathBuf,
    },

    /// Reset the interview session
    Reset,

    /// List the questions already asked in this session
    Questions,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = DaemonClient::new(cli.server);

    match cli.command {
        Commands::Status => client.status().await,
        Commands::Analyze { image } => client.analyze(&image).await,
        Commands::Reset => client.reset().await,
        Commands::Questions => client.questions().await,
    }
}

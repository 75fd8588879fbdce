//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了CLI命令行接口。

use crate::app::App;
use crate::config::Config;
use crate::sync::SeedOutcome;
use crate::telemetry;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "scorecache")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true, help = "Path to the TOML configuration file")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(name = "serve", about = "Seed the store if empty, then serve the HTTP API (default)")]
    Serve,

    #[command(name = "seed", about = "Seed the store from the dataset if it is empty")]
    Seed,

    #[command(name = "status", about = "Show record count and cache snapshot state")]
    Status(StatusArgs),

    #[command(name = "invalidate", about = "Delete the cached record snapshot")]
    Invalidate,
}

#[derive(Parser, Debug)]
pub struct StatusArgs {
    #[arg(short, long, help = "Show detailed information")]
    pub verbose: bool,
}

mod status;

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    telemetry::init_tracing(env!("CARGO_PKG_NAME"), &config.log_level);

    let app = App::init(config)
        .await
        .context("Failed to initialize store and cache")?;

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => app
            .serve(crate::server::shutdown_signal())
            .await
            .context("HTTP server failed"),
        Commands::Seed => seed(&app).await,
        Commands::Status(args) => status::execute(&app, &args).await,
        Commands::Invalidate => app
            .synchronizer()
            .invalidate()
            .await
            .map(|()| println!("✅ Cache snapshot deleted."))
            .context("Failed to delete cache snapshot"),
    };

    app.shutdown().await.context("Failed to close database")?;
    telemetry::shutdown_tracing();
    result
}

async fn seed(app: &App) -> Result<()> {
    match app.seed().await.context("Seeding failed")? {
        SeedOutcome::AlreadySeeded { existing } => {
            println!("Store already holds {} records, nothing to do.", existing);
        }
        SeedOutcome::Seeded { inserted } => {
            println!("✅ Seeded {} records.", inserted);
        }
    }
    Ok(())
}

//! CLI module for the semantic tool cache
//!
//! Provides subcommands for running and operating the cache:
//! - `serve`: HTTP API for the tool-execution layer
//! - `bootstrap`: prepare the vector collection and exit
//! - `cleanup`: delete expired rows once and exit

pub mod bootstrap;
pub mod cleanup;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Semantic Tool Cache - cross-user cache for cloud tool results
#[derive(Parser)]
#[command(name = "semantic-tool-cache")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Discover the embedding dimension and create the collection
    Bootstrap,

    /// Run one expiry sweep
    Cleanup,
}

/// Load `.env`, configuration and logging shared by every subcommand
fn prepare() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    Ok(config)
}

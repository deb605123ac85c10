use clap::Parser;
use semantic_tool_cache::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Bootstrap => cli::bootstrap::run().await,
        Command::Cleanup => cli::cleanup::run().await,
    }
}

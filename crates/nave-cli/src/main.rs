mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = cli::Cli::parse();
    let settings = commands::load_settings(cli.settings.as_deref())?;

    match cli.command {
        cli::Commands::Mask {
            input,
            output,
            seed,
        } => commands::mask::handle(&settings, input, output, seed),
        cli::Commands::Sync {
            work_dir,
            cumulative,
            seed,
            env_file,
        } => commands::sync::handle(settings, work_dir, cumulative, seed, env_file).await,
        cli::Commands::Clean { work_dir } => commands::clean::handle(&settings, work_dir),
    }
}

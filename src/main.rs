use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use yt_grab::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.config();

    // Logs go to stderr so prompts and results stay readable on stdout.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting yt-grab v{}", env!("CARGO_PKG_VERSION"));

    cli.run(&config).await?;

    Ok(())
}

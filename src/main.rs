use clap::Parser;
use std::io::IsTerminal;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use youtube_manager::cli::Cli;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr) // stdout is reserved for command output
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    let cli = Cli::parse();
    youtube_manager::cli::run(cli).await
}

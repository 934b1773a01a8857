use anyhow::Context;
use clap::Parser;
use tracing::debug;

use expat_cli::{app, cli::Cli, config::Settings, logging};

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let mut settings = Settings::load(cli.config.as_deref(), &cwd)?;
    settings.apply_overrides(
        cli.log_level.as_deref(),
        cli.brackets.as_deref(),
        cli.countries.as_deref(),
    );

    logging::init_logging(&settings.log_level, settings.log_file.as_deref())?;
    debug!(?settings, "settings loaded");

    let repo = app::build_repository(&settings).await?;
    let output = app::run(&repo, &settings, &cli.command).await?;
    println!("{output}");

    Ok(())
}

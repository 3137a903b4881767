use clap::Parser;
use console::style;
use prompt_pilot::cli::Cli;
use prompt_pilot::commands;
use prompt_pilot::core::config::load_config;
use prompt_pilot::core::storage::AppCtx;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {}", style("•").red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let ctx = AppCtx::init(cli.home.as_deref())?;
    let config = load_config(&ctx.config_path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(config.log_level.as_deref().unwrap_or("warn"))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    commands::dispatch(cli.command, &ctx, &config).await
}

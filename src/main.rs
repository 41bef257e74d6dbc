use btc_tracker::cli::{Cli, Commands, RunArgs};
use btc_tracker::config::Config;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Environment overrides may come from a .env file
    dotenvy::dotenv().ok();

    // Missing or invalid configuration is fatal
    let config = Config::load(&cli.config)?;

    match cli.command.unwrap_or(Commands::Run(RunArgs::default())) {
        Commands::Run(args) => {
            btc_tracker::telemetry::init_telemetry(&config.telemetry)?;
            tracing::info!("Bitcoin price monitor started");
            args.execute(&config).await?;
        }
        Commands::Config => {
            let position = config.position();
            println!("Current configuration:");
            println!("  Feed: {}", config.feed.url);
            println!("  Reconnect delay: {}s", config.feed.reconnect_delay_secs);
            println!(
                "  Position: {} BTC, cost basis {}",
                position.amount_held, position.cost_basis
            );
            println!("  Web: {} (refresh {}s)", config.web.bind, config.web.refresh_secs);
            println!(
                "  USD rate: {}",
                config.web.usd_rate_url.as_deref().unwrap_or("disabled")
            );
            println!("  Metrics: {}", config.telemetry.metrics_bind);
        }
    }

    Ok(())
}

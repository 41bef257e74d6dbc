//! CLI interface for btc-tracker
//!
//! Provides subcommands for:
//! - `run`: Stream prices and serve the page and metrics (default)
//! - `config`: Show the effective configuration

mod run;

pub use run::RunArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "btc-tracker")]
#[command(about = "Bitcoin investment tracker: live Binance ticker to Prometheus and a web page")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stream prices, export metrics and serve the web page
    Run(RunArgs),
    /// Show the effective configuration
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::try_parse_from(["btc-tracker"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, "config.toml");
    }

    #[test]
    fn test_run_with_config() {
        let cli = Cli::try_parse_from(["btc-tracker", "run", "--config", "/etc/tracker.toml"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Run(_))));
        assert_eq!(cli.config, "/etc/tracker.toml");
    }

    #[test]
    fn test_config_subcommand() {
        let cli = Cli::try_parse_from(["btc-tracker", "-c", "x.toml", "config"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Config)));
        assert_eq!(cli.config, "x.toml");
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}

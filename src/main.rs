use clap::Parser;
use tracing::error;
use unidesk::app::init_logging;
use unidesk::cli::{execute_command, Cli};
use unidesk::config::DeskConfig;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match DeskConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };

    init_logging(cli.verbose, &config.log_level);

    if let Err(e) = execute_command(cli.command, &config, cli.verbose).await {
        error!("Fatal error: {:#}", e);
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

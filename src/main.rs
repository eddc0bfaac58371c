use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

use ema_outcomes::cli::Cli;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("EMO_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = ema_outcomes::run(cli) {
        eprintln!("{} {err:#}", style("Error:").red().bold());
        std::process::exit(1);
    }
}

//! flowtrace CLI - serve or inspect the dependency trace of a project.

use clap::Parser;
use flowtrace::cli::{inspect, serve, Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("flowtrace=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.load_config();

    match cli.command {
        None => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(serve::handle(&cli.root, config, None, None))
        }
        Some(Commands::Serve { host, port }) => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(serve::handle(&cli.root, config, host, port))
        }
        Some(Commands::Scan { pretty }) => inspect::scan(&cli.root, &config, pretty),
        Some(Commands::Layout) => inspect::layout(&cli.root, &config),
        Some(Commands::Stats) => inspect::stats(&cli.root, &config),
    }
}

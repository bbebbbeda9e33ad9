//! Azure resource inventory exporter - Main entry point

use clap::Parser;
use log::{debug, info};
use std::process::ExitCode;

use azinv::{run_inventory_command, Cli};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    info!("Starting azinv v{}", env!("CARGO_PKG_VERSION"));
    debug!(
        "CLI args: subs={:?}, out={}, max_pages={}, endpoint={}, timeout={}s",
        cli.subs,
        cli.out.display(),
        cli.max_pages,
        cli.endpoint,
        cli.timeout
    );

    match run_inventory_command(&cli).await {
        Ok(summary) => {
            if summary.truncated {
                eprintln!(
                    "Warning: reached --max-pages={}; results may be truncated",
                    cli.max_pages
                );
            }
            println!("Wrote {} rows to {}", summary.rows, summary.path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

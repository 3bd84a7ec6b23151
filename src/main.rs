//! natstat-ingest CLI
//!
//! Exits 0 when the page chain has been followed to the end, 1 on any error.

use clap::Parser;
use natstat_ingest::cli::{Cli, Runner};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let runner = Runner::new(cli);

    if let Err(e) = runner.run().await {
        tracing::error!(kind = ?e.kind(), "Run failed: {e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

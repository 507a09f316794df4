// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use embedly_client::cli::{execute, Cli};
use embedly_client::EmbedlyClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    let outcome = match cli.config() {
        Ok(config) => match EmbedlyClient::new(config) {
            Ok(client) => execute(cli.command, &client).await,
            Err(e) => Err(e.into()),
        },
        Err(e) => Err(e),
    };

    match outcome {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

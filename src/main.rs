// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use seed_gateway::{
    api::{start_server, AppState},
    cli::Cli,
};
use std::env;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let api_config = cli.api_config();
    let roboflow_config = cli.roboflow_config();
    api_config.validate()?;
    roboflow_config.validate()?;

    info!("Starting {}", seed_gateway::version::get_version_string());
    info!("Detection config: {:?}", roboflow_config);

    let state = AppState::from_config(api_config, &roboflow_config)?;
    start_server(state).await
}

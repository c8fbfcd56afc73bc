// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

// Panicking code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
// Debug code that shouldn't be in production
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use exoplanet::{Args, DataService, ServerConfig, loader, run_server};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG takes precedence, fallback to info
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    info!(
        host = %args.host,
        port = args.port,
        data_path = %args.data_path.display(),
        output_dir = %args.output_dir.display(),
        cors_origin = %args.cors_origin,
        "Starting exoplanet-server"
    );

    let config = ServerConfig::try_from(args).context("invalid configuration")?;

    let dataset = loader::load_dataset(&config.data_path).context("failed to load dataset")?;
    let data = DataService::new(dataset).context("failed to render dataset")?;

    run_server(data, config).await
}

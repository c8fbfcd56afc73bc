// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

use std::path::PathBuf;

use axum::http::HeaderValue;
use clap::Parser;

use crate::errors::ConfigError;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATA_PATH: &str = "merged_exoplanet_dataset.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

/// Serve the exoplanet dataset and generated analysis artifacts
#[derive(Parser, Debug, Clone)]
#[command(name = "exoplanet-server")]
#[command(about = "Serve the exoplanet candidate dataset and analysis artifacts over HTTP")]
#[command(version)]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "EXOPLANET_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on; the next port is tried once if this one is taken
    #[arg(short, long, env = "EXOPLANET_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// CSV file with the candidate records, read once at startup
    #[arg(long, env = "EXOPLANET_DATA_PATH", default_value = DEFAULT_DATA_PATH)]
    pub data_path: PathBuf,

    /// Directory holding the generated plots and reports
    #[arg(long, env = "EXOPLANET_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Origin allowed by the cross-origin policy
    #[arg(long, env = "EXOPLANET_CORS_ORIGIN", default_value = DEFAULT_CORS_ORIGIN)]
    pub cors_origin: String,
}

/// Validated server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_path: PathBuf,
    pub output_dir: PathBuf,
    pub cors_origin: HeaderValue,
}

impl TryFrom<Args> for ServerConfig {
    type Error = ConfigError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let origin = args.cors_origin.trim();
        if origin.is_empty() {
            return Err(ConfigError::InvalidOrigin {
                origin: args.cors_origin.clone(),
                reason: "must not be empty".to_string(),
            });
        }
        let cors_origin =
            HeaderValue::from_str(origin).map_err(|e| ConfigError::InvalidOrigin {
                origin: args.cors_origin.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            host: args.host,
            port: args.port,
            data_path: args.data_path,
            output_dir: args.output_dir,
            cors_origin,
        })
    }
}

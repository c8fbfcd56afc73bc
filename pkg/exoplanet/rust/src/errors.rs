// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading the record source at startup.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("data file not found at {}", path.display())]
    FileMissing { path: PathBuf },

    /// A single row was dropped; loading continues with the next one.
    #[error("skipping row {line}: {reason}")]
    RowConversion { line: u64, reason: String },

    #[error("could not read data file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse data file {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Rejections produced by the artifact file gateway.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("no filename provided")]
    MissingName,

    #[error("invalid filename: {0}")]
    UnsafeName(String),

    #[error("file not found: {0}")]
    NotFound(String),

    #[error("could not read {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failures while binding the HTTP listener.
#[derive(Error, Debug)]
pub enum BindError {
    #[error("{host}:{port} and the fallback port are both in use")]
    PortInUse { host: String, port: u16 },

    #[error("could not bind {host}:{port}: {source}")]
    Io {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid CORS origin {origin:?}: {reason}")]
    InvalidOrigin { origin: String, reason: String },
}

// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

//! Serves the exoplanet candidate dataset and generated analysis artifacts.
//!
//! The record source is read once at startup by the [`loader`] into an
//! immutable [`dataset::Dataset`]. The [`server`] exposes it unmodified at
//! `/data` and serves plots and reports from the artifact directory through the
//! exact-match filename policy in [`gateway`].

// Correctness
#![deny(clippy::indexing_slicing)]
#![deny(clippy::string_slice)]
#![deny(clippy::cast_possible_wrap)]
// Panicking code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unimplemented)]
#![deny(clippy::todo)]
// Debug code that shouldn't be in production
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]

pub mod config;
pub mod dataset;
pub mod errors;
pub mod gateway;
pub mod loader;
pub mod server;

pub use config::{Args, ServerConfig};
pub use dataset::{DataService, Dataset, FieldValue, Record};
pub use errors::{BindError, ConfigError, GatewayError, LoadError};
pub use gateway::ArtifactGateway;
pub use server::{AppState, router, run_server};

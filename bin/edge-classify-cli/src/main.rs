// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # edge-classify
//!
//! Command-line interface for the arena-bound classifier runtime.
//!
//! ## Usage
//! ```bash
//! # Classify the reference RR-interval sample with the embedded model
//! edge-classify run
//!
//! # Classify a feature file with a model from disk, five times, as JSON
//! edge-classify run --model ./models/rr_classifier.safetensors --features rr.txt --repeat 5 --json
//!
//! # Inspect model structure and arena requirements
//! edge-classify inspect --model ./models/rr_classifier.safetensors
//!
//! # Write the embedded reference model to disk
//! edge-classify export --out ./rr_classifier.safetensors
//! ```
//!
//! ## Exit codes
//! `0` completed, `1` usage/config/I/O error, `2` invalid model, `3` schema
//! mismatch, `4` allocation failed, `5` invocation error, `6` input
//! mismatch, `7` output mismatch.

mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "edge-classify",
    about = "Fixed-arena binary classifier runtime for embedded targets",
    version,
    author
)]
struct Cli {
    /// Path to a TOML configuration file (CLI arguments take precedence).
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the inference lifecycle on a feature vector.
    Run {
        /// Model artifact (defaults to the embedded reference model).
        #[arg(short, long)]
        model: Option<std::path::PathBuf>,

        /// Feature file: integers 0-255 separated by whitespace or commas
        /// (defaults to the reference RR-interval sample).
        #[arg(short, long)]
        features: Option<std::path::PathBuf>,

        /// Pool size (e.g., "32K", "64KB", "32768").
        #[arg(short, long)]
        pool_size: Option<String>,

        /// Scores strictly above this are positive.
        #[arg(short, long)]
        threshold: Option<f32>,

        /// Number of inferences to run on the bound model.
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        repeat: u32,

        /// Print a JSON report on stdout instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Inspect a model: print its graph, tensors, and arena requirements.
    Inspect {
        /// Model artifact (defaults to the embedded reference model).
        #[arg(short, long)]
        model: Option<std::path::PathBuf>,
    },

    /// Write the embedded reference model to a file.
    Export {
        /// Destination path.
        #[arg(short, long)]
        out: std::path::PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            model,
            features,
            pool_size,
            threshold,
            repeat,
            json,
        } => commands::run::execute(
            cli.config.as_deref(),
            commands::run::RunOptions {
                model,
                features,
                pool_size,
                threshold,
                repeat,
                json,
            },
        ),
        Commands::Inspect { model } => commands::inspect::execute(cli.config.as_deref(), model),
        Commands::Export { out } => commands::export::execute(&out),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

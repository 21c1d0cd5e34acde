// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subcommands and the plumbing they share: logging, configuration, and
//! model loading.

pub mod export;
pub mod inspect;
pub mod run;

use anyhow::Context;
use runtime::RuntimeConfig;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over `-v` when set.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads and validates the configuration file, or returns the defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<RuntimeConfig> {
    let config = match path {
        Some(path) => RuntimeConfig::from_file(path)?,
        None => RuntimeConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Model bytes: embedded, or memory-mapped from a file.
pub enum ModelSource {
    Embedded(&'static [u8]),
    Mapped(memmap2::Mmap),
    /// A zero-length file, which cannot be mapped.
    Empty,
}

impl ModelSource {
    /// Opens `path`, or the embedded reference model when `None`.
    pub fn open(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::Embedded(runtime::reference::REFERENCE_MODEL));
        };
        let file = std::fs::File::open(path)
            .with_context(|| format!("cannot open model '{}'", path.display()))?;
        let len = file
            .metadata()
            .with_context(|| format!("cannot stat model '{}'", path.display()))?
            .len();
        if len == 0 {
            return Ok(Self::Empty);
        }
        // SAFETY: the map is read-only and lives no longer than this
        // process's use of it; the artifact is not expected to change while
        // the command runs.
        let mmap = unsafe { memmap2::Mmap::map(&file) }
            .with_context(|| format!("mmap failed for '{}'", path.display()))?;
        tracing::debug!("mapped {} ({len} bytes)", path.display());
        Ok(Self::Mapped(mmap))
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Embedded(bytes) => *bytes,
            Self::Mapped(mmap) => &mmap[..],
            Self::Empty => &[],
        }
    }
}

/// Display name of a model path for reports.
pub fn model_label(path: Option<&Path>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None => "<embedded reference model>".to_string(),
    }
}

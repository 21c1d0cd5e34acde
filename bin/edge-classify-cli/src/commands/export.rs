// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `edge-classify export` command: write the embedded reference model.

use anyhow::Context;
use model_ir::ModelHandle;
use runtime::reference::REFERENCE_MODEL;
use std::path::Path;
use std::process::ExitCode;

pub fn execute(out: &Path) -> anyhow::Result<ExitCode> {
    std::fs::write(out, REFERENCE_MODEL)
        .with_context(|| format!("cannot write '{}'", out.display()))?;

    let handle = ModelHandle::load(REFERENCE_MODEL)?;
    tracing::info!("wrote {} ({} bytes)", out.display(), REFERENCE_MODEL.len());
    println!("  {}", handle.summary());
    println!("  Written to {}", out.display());
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rr.safetensors");
        execute(&path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes, REFERENCE_MODEL);
        assert!(ModelHandle::load(&bytes).is_ok());
    }

    #[test]
    fn test_export_bad_directory() {
        assert!(execute(Path::new("/nonexistent/dir/rr.safetensors")).is_err());
    }
}

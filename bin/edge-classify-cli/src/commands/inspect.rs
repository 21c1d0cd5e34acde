// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `edge-classify inspect` command: display model structure and arena
//! requirements.
//!
//! Parses the artifact without verifying its schema version, so an
//! incompatible model can still be examined.

use super::{load_config, model_label, ModelSource};
use model_ir::{ModelHandle, SUPPORTED_SCHEMA_VERSION};
use runtime::{FailureKind, OperationRegistry, Placement};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

pub fn execute(config_path: Option<&Path>, model: Option<PathBuf>) -> anyhow::Result<ExitCode> {
    let config = load_config(config_path)?;
    let model_path = model.or(config.model_path.clone());
    let source = ModelSource::open(model_path.as_deref())?;
    let label = model_label(model_path.as_deref());

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║           edge-classify · Model Inspector           ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let handle = match ModelHandle::parse(source.bytes()) {
        Ok(handle) => handle,
        Err(e) => {
            tracing::error!("failed to parse model '{label}': {e}");
            eprintln!("  {}: {e}", FailureKind::InvalidModel);
            return Ok(ExitCode::from(FailureKind::InvalidModel.exit_code()));
        }
    };

    // ── Summary ────────────────────────────────────────────────
    println!("  Source: {label}");
    println!("  {}", handle.summary());
    let schema_note = if handle.schema_version() == SUPPORTED_SCHEMA_VERSION {
        "supported".to_string()
    } else {
        format!("runtime supports v{SUPPORTED_SCHEMA_VERSION}")
    };
    println!("  Schema: v{} ({schema_note})", handle.schema_version());
    println!();

    // ── Operators ──────────────────────────────────────────────
    let registry = OperationRegistry::all_ops();
    println!("  {:<4} {:<16} {:<14} {:<10} {:<10}", "Idx", "Operator", "Inputs", "Outputs", "Kernel");
    println!("  {}", "-".repeat(58));
    for op in handle.operators() {
        let kernel = match registry.get(op.kind) {
            Some(reg) if reg.accepts(op.inputs.len(), op.outputs.len()) => "ok",
            Some(_) => "bad arity",
            None => "missing",
        };
        println!(
            "  {:<4} {:<16} {:<14} {:<10} {:<10}",
            op.index,
            op.kind.as_str(),
            format!("{:?}", op.inputs),
            format!("{:?}", op.outputs),
            kernel,
        );
    }
    println!();

    // ── Tensors ────────────────────────────────────────────────
    let alignment = config.pool_alignment;
    println!(
        "  {:<4} {:<14} {:<6} {:>8} {:<12} {:<9} {:<8}",
        "Idx", "Name", "Type", "Bytes", "Shape", "Storage", "Role",
    );
    println!("  {}", "-".repeat(68));
    let mut offset = 0usize;
    for (i, t) in handle.graph().tensors.iter().enumerate() {
        let storage = if t.constant {
            Placement::Constant
        } else {
            let start = offset.checked_next_multiple_of(alignment).unwrap_or(usize::MAX);
            offset = start.saturating_add(t.size_bytes());
            Placement::Arena(memory_manager::Region::new(start, t.size_bytes()))
        };
        let role = if handle.inputs().contains(&i) {
            "input"
        } else if handle.outputs().contains(&i) {
            "output"
        } else {
            ""
        };
        println!(
            "  {:<4} {:<14} {:<6} {:>8} {:<12} {:<9} {:<8}",
            i,
            truncate(&t.name, 14),
            t.dtype.as_str(),
            t.size_bytes(),
            t.shape.to_string(),
            match storage {
                Placement::Constant => "constant".to_string(),
                Placement::Arena(region) => region.to_string(),
                Placement::Unallocated => "-".to_string(),
            },
            role,
        );
    }
    println!();

    // ── Arena ──────────────────────────────────────────────────
    let required = handle.arena_bytes_required(alignment);
    let budget = config.parse_pool_size()?;
    println!("  Arena:");
    println!("   Required:  {required} bytes (align {alignment})");
    println!(
        "   Pool:      {budget} → {}",
        if required <= budget.as_bytes() { "fits" } else { "does NOT fit" },
    );
    println!();

    Ok(ExitCode::SUCCESS)
}

/// Truncates a string to `max_len` with ellipsis if needed.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_invalid_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.safetensors");
        std::fs::write(&path, b"not a model").unwrap();
        let code = execute(None, Some(path)).unwrap();
        assert_eq!(code, ExitCode::from(2));
    }

    #[test]
    fn test_inspect_reference_model() {
        assert_eq!(execute(None, None).unwrap(), ExitCode::SUCCESS);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("fc1.out", 14), "fc1.out");
        assert_eq!(truncate("a_very_long_tensor_name", 10), "a_very_...");
    }
}

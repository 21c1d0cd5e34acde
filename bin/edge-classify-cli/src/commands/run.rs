// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `edge-classify run` command: drive the inference lifecycle.
//!
//! ```text
//! load → verify schema → bind to pool → (write features → invoke → classify) × repeat
//! ```
//!
//! The process exit code is the failure kind's code, or `0` on completion.

use super::{load_config, model_label, ModelSource};
use anyhow::Context;
use memory_manager::ResourcePool;
use runtime::{
    Classification, FailureKind, InferenceController, InferenceMetrics, LifecycleError,
    LifecycleState, RecordingReporter, Reporter, TracingReporter, REFERENCE_RR_INTERVALS,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Options for one `run` invocation; `None` falls back to the config file.
pub struct RunOptions {
    pub model: Option<PathBuf>,
    pub features: Option<PathBuf>,
    pub pool_size: Option<String>,
    pub threshold: Option<f32>,
    pub repeat: u32,
    pub json: bool,
}

/// JSON report printed with `--json`.
///
/// `results` is all or nothing: when any repetition fails, classifications
/// from earlier repetitions are dropped and only `failure` is set. The
/// completed count is still visible in `metrics.inferences`.
#[derive(serde::Serialize)]
struct RunReport<'a> {
    model: String,
    pool_bytes: usize,
    pool_alignment: usize,
    threshold: f32,
    results: Vec<Classification>,
    failure: Option<FailureReport>,
    history: &'a [LifecycleState],
    metrics: &'a InferenceMetrics,
    log: &'a [String],
}

#[derive(serde::Serialize)]
struct FailureReport {
    kind: FailureKind,
    exit_code: u8,
    message: String,
}

pub fn execute(config_path: Option<&Path>, opts: RunOptions) -> anyhow::Result<ExitCode> {
    let mut config = load_config(config_path)?;
    if let Some(model) = opts.model {
        config.model_path = Some(model);
    }
    if let Some(pool_size) = opts.pool_size {
        config.pool_size = pool_size;
    }
    if let Some(threshold) = opts.threshold {
        config.decision_threshold = threshold;
    }
    config.validate()?;

    let features = load_features(opts.features.as_deref(), config.feature_length)?;
    let budget = config.parse_pool_size()?;
    let mut pool = ResourcePool::with_alignment(budget, config.pool_alignment)?;
    let source = ModelSource::open(config.model_path.as_deref())?;
    let label = model_label(config.model_path.as_deref());

    tracing::info!(
        "model: {label}, pool: {budget} (align {}), threshold: {}",
        config.pool_alignment,
        config.decision_threshold
    );

    if opts.json {
        let mut controller = InferenceController::new(RecordingReporter::new())
            .with_threshold(config.decision_threshold);
        let outcome = drive(&mut controller, source.bytes(), &mut pool, &features, opts.repeat);
        let (results, failure) = match outcome {
            Ok(results) => (results, None),
            Err(e) => (Vec::new(), Some(e)),
        };
        let report = RunReport {
            model: label,
            pool_bytes: pool.capacity(),
            pool_alignment: pool.alignment(),
            threshold: controller.threshold(),
            results,
            failure: failure.as_ref().map(|e| FailureReport {
                kind: e.kind,
                exit_code: e.exit_code(),
                message: e.to_string(),
            }),
            history: controller.history(),
            metrics: controller.metrics(),
            log: controller.reporter().lines(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(exit_code(failure.as_ref()));
    }

    let mut controller =
        InferenceController::new(TracingReporter).with_threshold(config.decision_threshold);
    match drive(&mut controller, source.bytes(), &mut pool, &features, opts.repeat) {
        Ok(results) => {
            for (i, r) in results.iter().enumerate() {
                println!("  [{}] {:<8} score {:.2}", i + 1, r.label, r.score);
            }
            println!("  {}", controller.metrics().summary());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("  {} (exit code {})", e, e.exit_code());
            Ok(exit_code(Some(&e)))
        }
    }
}

/// Runs the lifecycle once, then repeats the inference step on the same
/// binding. The first failure discards every earlier result.
fn drive<R: Reporter>(
    controller: &mut InferenceController<R>,
    model: &[u8],
    pool: &mut ResourcePool,
    features: &[u8],
    repeat: u32,
) -> Result<Vec<Classification>, LifecycleError> {
    let handle = controller.load(model)?;
    let mut ctx = controller.bind(&handle, pool)?;
    (0..repeat.max(1))
        .map(|_| controller.infer(&mut ctx, features))
        .collect()
}

/// Reads a feature file, or returns the reference sample.
fn load_features(path: Option<&Path>, expected_len: usize) -> anyhow::Result<Vec<u8>> {
    let features = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read features '{}'", path.display()))?;
            runtime::parse_features(&text)?
        }
        None => REFERENCE_RR_INTERVALS.to_vec(),
    };
    anyhow::ensure!(
        features.len() == expected_len,
        "feature vector has {} samples, configuration expects {expected_len}",
        features.len()
    );
    Ok(features)
}

fn exit_code(failure: Option<&LifecycleError>) -> ExitCode {
    failure.map_or(ExitCode::SUCCESS, |e| ExitCode::from(e.exit_code()))
}

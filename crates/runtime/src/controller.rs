// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The inference lifecycle controller.
//!
//! ```text
//! Uninitialized
//!     │  parse                  ── InvalidModel
//!     ▼
//! ModelLoaded
//!     │  verify schema          ── SchemaMismatch
//!     ▼
//! VersionVerified
//!     │  bind to pool           ── AllocationFailed (+ tensor diagnostics)
//!     ▼
//! Bound ◄─────────────────────────────┐
//!     │  write features         ── InputMismatch
//!     ▼                               │
//! InputWritten                        │
//!     │  invoke                 ── InvocationError
//!     ▼                               │ infer()
//! Invoked                             │
//!     │  read score             ── OutputMismatch
//!     ▼                               │
//! Completed ──────────────────────────┘
//! ```
//!
//! Every failure moves the controller to `Failed(kind)` and is terminal:
//! nothing is retried.

use crate::{
    classify, Classification, ExecutionContext, FailureKind, InferenceMetrics, Label,
    LifecycleError, OperationRegistry, Reporter, RuntimeError, TracingReporter,
    DEFAULT_DECISION_THRESHOLD,
};
use memory_manager::ResourcePool;
use model_ir::{ModelHandle, Verified, SUPPORTED_SCHEMA_VERSION};
use std::fmt;
use std::time::Instant;

/// A lifecycle stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Uninitialized,
    ModelLoaded,
    VersionVerified,
    Bound,
    InputWritten,
    Invoked,
    Completed,
    Failed(FailureKind),
}

impl LifecycleState {
    pub fn is_failed(self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => f.write_str("uninitialized"),
            Self::ModelLoaded => f.write_str("model loaded"),
            Self::VersionVerified => f.write_str("version verified"),
            Self::Bound => f.write_str("bound"),
            Self::InputWritten => f.write_str("input written"),
            Self::Invoked => f.write_str("invoked"),
            Self::Completed => f.write_str("completed"),
            Self::Failed(kind) => write!(f, "failed ({kind})"),
        }
    }
}

/// Drives a model from raw bytes to a classification, narrating every
/// step to a [`Reporter`].
///
/// # Example
/// ```
/// use memory_manager::{PoolBudget, ResourcePool};
/// use runtime::{reference, InferenceController, LifecycleState, RecordingReporter};
///
/// let mut pool = ResourcePool::new(PoolBudget::default()).unwrap();
/// let mut controller = InferenceController::new(RecordingReporter::new());
/// let result = controller
///     .run(reference::REFERENCE_MODEL, &mut pool, &runtime::REFERENCE_RR_INTERVALS)
///     .unwrap();
///
/// assert!(result.score.is_finite());
/// assert_eq!(controller.state(), LifecycleState::Completed);
/// ```
#[derive(Debug)]
pub struct InferenceController<R: Reporter = TracingReporter> {
    reporter: R,
    registry: OperationRegistry,
    threshold: f32,
    state: LifecycleState,
    history: Vec<LifecycleState>,
    metrics: InferenceMetrics,
}

impl<R: Reporter> InferenceController<R> {
    /// A controller with every built-in operator and the default threshold.
    pub fn new(reporter: R) -> Self {
        Self {
            reporter,
            registry: OperationRegistry::all_ops(),
            threshold: DEFAULT_DECISION_THRESHOLD,
            state: LifecycleState::Uninitialized,
            history: vec![LifecycleState::Uninitialized],
            metrics: InferenceMetrics::new(),
        }
    }

    pub fn with_registry(mut self, registry: OperationRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Every state entered since the current lifecycle began, in order.
    pub fn history(&self) -> &[LifecycleState] {
        &self.history
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn metrics(&self) -> &InferenceMetrics {
        &self.metrics
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn into_reporter(self) -> R {
        self.reporter
    }

    /// Runs the whole lifecycle once: load, verify, bind, write, invoke,
    /// classify.
    pub fn run(
        &mut self,
        model_bytes: &[u8],
        pool: &mut ResourcePool,
        features: &[u8],
    ) -> Result<Classification, LifecycleError> {
        let handle = self.load(model_bytes)?;
        let mut ctx = self.bind(&handle, pool)?;
        self.infer(&mut ctx, features)
    }

    /// Parses and verifies `bytes`, starting a fresh lifecycle.
    pub fn load<'a>(&mut self, bytes: &'a [u8]) -> Result<ModelHandle<'a, Verified>, LifecycleError> {
        self.state = LifecycleState::Uninitialized;
        self.history = vec![LifecycleState::Uninitialized];
        self.metrics = InferenceMetrics::new();

        self.reporter.report("Starting classification...");
        self.reporter.report("Retrieving model...");
        let parsed = match ModelHandle::parse(bytes) {
            Ok(parsed) => parsed,
            Err(e) => {
                self.reporter
                    .report_failure(&format!("Failed to retrieve model: {e}"));
                return Err(self.fail(FailureKind::InvalidModel, e));
            }
        };
        self.reporter.report("Model retrieved successfully.");
        self.enter(LifecycleState::ModelLoaded);

        let verified = match parsed.verify_schema(SUPPORTED_SCHEMA_VERSION) {
            Ok(verified) => verified,
            Err(e) => {
                self.reporter
                    .report_failure(&format!("Model schema version mismatch: {e}"));
                return Err(self.fail(FailureKind::SchemaMismatch, e));
            }
        };
        self.reporter.report("Model schema version verified.");
        tracing::debug!("{}", verified.summary());
        self.enter(LifecycleState::VersionVerified);

        Ok(verified)
    }

    /// Binds a verified model to `pool`.
    ///
    /// On failure, reports one diagnostic line per graph input and output
    /// tensor before returning.
    pub fn bind<'a>(
        &mut self,
        handle: &'a ModelHandle<'a, Verified>,
        pool: &'a mut ResourcePool,
    ) -> Result<ExecutionContext<'a>, LifecycleError> {
        self.ensure_live()?;

        self.reporter.report("Setting up interpreter...");
        self.reporter.report("Allocating tensors...");
        match ExecutionContext::bind(handle, pool, &self.registry) {
            Ok(ctx) => {
                self.reporter.report("Tensor allocation successful.");
                self.metrics.record_binding(
                    handle.operators().len(),
                    ctx.arena_used_bytes(),
                    ctx.pool_capacity(),
                );
                self.enter(LifecycleState::Bound);
                Ok(ctx)
            }
            Err(e) => {
                self.reporter
                    .report_failure("Tensor allocation failed. Checking tensor details:");
                for i in 0..handle.inputs().len() {
                    self.reporter.report_tensor(i, handle.input_descriptor(i));
                }
                for i in 0..handle.outputs().len() {
                    self.reporter.report_tensor(i, handle.output_descriptor(i));
                }
                self.reporter.report_failure(&e.to_string());
                Err(self.fail(FailureKind::AllocationFailed, e))
            }
        }
    }

    /// Writes `features`, invokes the graph and classifies output 0.
    ///
    /// May be called again on the same context for a fresh feature vector.
    pub fn infer(
        &mut self,
        ctx: &mut ExecutionContext<'_>,
        features: &[u8],
    ) -> Result<Classification, LifecycleError> {
        self.ensure_live()?;

        self.reporter.report("Copying feature vector to model input...");
        if let Err(e) = ctx.write_input(0, features) {
            self.reporter
                .report_failure(&format!("Feature vector rejected: {e}"));
            return Err(self.fail(FailureKind::InputMismatch, e));
        }
        self.reporter.report("Feature vector copied to model input.");
        self.enter(LifecycleState::InputWritten);

        self.reporter.report("Running inference...");
        let start = Instant::now();
        if let Err(e) = ctx.invoke() {
            self.reporter
                .report_failure(&format!("Error during model invocation: {e}"));
            return Err(self.fail(FailureKind::InvocationError, e));
        }
        self.metrics.record_invoke(start.elapsed());
        self.reporter.report("Inference completed successfully.");
        self.enter(LifecycleState::Invoked);

        let score = match ctx.read_output(0).and_then(|out| {
            out.first().copied().ok_or_else(|| {
                RuntimeError::OutputMismatch("output tensor has no elements".into())
            })
        }) {
            Ok(score) => score,
            Err(e) => {
                self.reporter
                    .report_failure(&format!("Cannot read model output: {e}"));
                return Err(self.fail(FailureKind::OutputMismatch, e));
            }
        };
        self.reporter.report("Score retrieved from model output.");

        let result = classify(score, self.threshold);
        self.reporter.report(match result.label {
            Label::Positive => "Positive class detected!",
            Label::Negative => "Negative class detected.",
        });
        self.reporter.report(&format!("Score: {score:.2}"));
        self.enter(LifecycleState::Completed);

        Ok(result)
    }

    fn enter(&mut self, state: LifecycleState) {
        tracing::debug!("lifecycle: {} -> {}", self.state, state);
        self.state = state;
        self.history.push(state);
    }

    fn fail(&mut self, kind: FailureKind, source: impl Into<RuntimeError>) -> LifecycleError {
        self.enter(LifecycleState::Failed(kind));
        LifecycleError::new(kind, source)
    }

    fn ensure_live(&self) -> Result<(), LifecycleError> {
        match self.state {
            LifecycleState::Failed(kind) => Err(LifecycleError::new(
                kind,
                RuntimeError::Terminated(self.state),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{reference, RecordingReporter, REFERENCE_RR_INTERVALS};
    use memory_manager::PoolBudget;

    fn pool() -> ResourcePool {
        ResourcePool::new(PoolBudget::default()).unwrap()
    }

    #[test]
    fn test_state_display() {
        assert_eq!(LifecycleState::VersionVerified.to_string(), "version verified");
        assert_eq!(
            LifecycleState::Failed(FailureKind::InvalidModel).to_string(),
            "failed (invalid model)"
        );
    }

    #[test]
    fn test_full_history() {
        let mut pool = pool();
        let mut c = InferenceController::new(RecordingReporter::new());
        c.run(reference::REFERENCE_MODEL, &mut pool, &REFERENCE_RR_INTERVALS)
            .unwrap();
        use LifecycleState::*;
        assert_eq!(
            c.history(),
            &[
                Uninitialized,
                ModelLoaded,
                VersionVerified,
                Bound,
                InputWritten,
                Invoked,
                Completed
            ]
        );
        assert_eq!(c.metrics().inferences, 1);
    }

    #[test]
    fn test_invalid_model() {
        let mut pool = pool();
        let mut c = InferenceController::new(RecordingReporter::new());
        let err = c.run(b"garbage", &mut pool, &REFERENCE_RR_INTERVALS).unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidModel);
        assert_eq!(
            c.history(),
            &[
                LifecycleState::Uninitialized,
                LifecycleState::Failed(FailureKind::InvalidModel)
            ]
        );
        assert!(c.reporter().contains("Failed to retrieve model"));
    }

    #[test]
    fn test_failure_is_terminal() {
        let mut pool = pool();
        let mut c = InferenceController::new(RecordingReporter::new());
        let handle = c.load(reference::REFERENCE_MODEL).unwrap();
        let mut ctx = c.bind(&handle, &mut pool).unwrap();

        let err = c.infer(&mut ctx, &[1, 2, 3]).unwrap_err();
        assert_eq!(err.kind, FailureKind::InputMismatch);

        let err = c.infer(&mut ctx, &REFERENCE_RR_INTERVALS).unwrap_err();
        assert_eq!(err.kind, FailureKind::InputMismatch);
        assert!(matches!(err.source, RuntimeError::Terminated(_)));
        assert_eq!(
            c.state(),
            LifecycleState::Failed(FailureKind::InputMismatch)
        );
    }

    #[test]
    fn test_threshold_override() {
        let mut pool = pool();
        let mut c = InferenceController::new(RecordingReporter::new()).with_threshold(1.0);
        let r = c
            .run(reference::REFERENCE_MODEL, &mut pool, &REFERENCE_RR_INTERVALS)
            .unwrap();
        assert_eq!(r.label, Label::Negative);
        assert!(c.reporter().contains("Negative class detected."));
    }
}

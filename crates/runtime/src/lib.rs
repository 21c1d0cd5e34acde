// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # runtime
//!
//! The inference lifecycle for a binary classifier running out of a fixed
//! memory pool.
//!
//! The runtime takes:
//! - Model artifact bytes, verified by `model-ir` into a `ModelHandle`.
//! - A `ResourcePool` from `memory-manager`, lent for the binding's lifetime.
//! - An [`OperationRegistry`] naming the kernels the binding may use.
//!
//! And runs them through [`InferenceController`]:
//! ```text
//! Uninitialized → ModelLoaded → VersionVerified → Bound
//!               → InputWritten → Invoked → Completed
//! ```
//! with `Failed(kind)` reachable from every stage. Each failure kind maps
//! to its own process exit code ([`FailureKind::exit_code`]).
//!
//! # Synchronous Execution
//! Everything runs on the calling thread. The pool is borrowed `&mut` by
//! one [`ExecutionContext`] at a time, so concurrent use is a compile error.

mod binding;
mod classify;
mod config;
mod controller;
mod error;
mod features;
mod metrics;
pub mod reference;
mod registry;
mod reporter;

pub use binding::{ExecutionContext, Placement};
pub use classify::{classify, Classification, Label, DEFAULT_DECISION_THRESHOLD};
pub use config::{RuntimeConfig, SUPPORTED_ALIGNMENTS};
pub use controller::{InferenceController, LifecycleState};
pub use error::{BindFailure, FailureKind, LifecycleError, RuntimeError};
pub use features::{parse_features, widen_samples, FEATURE_LENGTH, REFERENCE_RR_INTERVALS};
pub use metrics::InferenceMetrics;
pub use registry::{Kernel, OpRegistration, OperationRegistry, MAX_OPERANDS};
pub use reporter::{RecordingReporter, Reporter, TracingReporter};

// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # model-ir
//!
//! Model artifacts for the arena-bound classifier runtime.
//!
//! A model is a single SafeTensors byte buffer:
//!
//! - `__metadata__["schema_version"]` — decimal schema version.
//! - `__metadata__["graph"]` — JSON [`GraphManifest`]: tensors, operators,
//!   graph inputs and outputs.
//! - data section — constant tensors (weights, biases) by name.
//!
//! The crate provides:
//!
//! - [`ModelHandle`] — borrowed view over the bytes with a **type-state
//!   pattern** (`Parsed` → `Verified`).
//! - [`Graph`], [`OperatorDef`], [`OpKind`] — the resolved tensor graph.
//! - [`ModelBuilder`] — writes artifacts in the same format.
//!
//! # Example
//! ```
//! use model_ir::{ModelBuilder, ModelHandle, OpKind};
//! use tensor_core::Shape;
//!
//! let mut b = ModelBuilder::new("tiny");
//! let x = b.input("x", Shape::matrix(1, 2));
//! let w = b.constant_f32("w", Shape::matrix(1, 2), &[0.5, 0.5]);
//! let y = b.activation("y", Shape::matrix(1, 1));
//! b.operator(OpKind::FullyConnected, &[x, w], &[y]).output(y);
//! let bytes = b.build().unwrap();
//!
//! let handle = ModelHandle::load(&bytes).unwrap();
//! println!("{}", handle.summary());
//! for op in handle.operators() {
//!     println!("  {}", op.summary());
//! }
//! ```

mod builder;
mod error;
pub mod graph;
pub mod handle;
mod loader;
pub mod manifest;
mod op;

/// The only schema version this runtime interprets.
pub const SUPPORTED_SCHEMA_VERSION: u32 = 3;

pub use builder::ModelBuilder;
pub use error::ModelError;
pub use graph::Graph;
pub use handle::{HandleState, ModelHandle, Parsed, Verified};
pub use loader::{GRAPH_KEY, SCHEMA_VERSION_KEY};
pub use manifest::GraphManifest;
pub use op::{OpKind, OperatorDef};

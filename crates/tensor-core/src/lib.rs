// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # tensor-core
//!
//! Tensor metadata and reference kernels for arena-bound classifiers.
//!
//! This crate provides:
//! - [`DType`] — element types a model artifact may declare.
//! - [`Shape`] — dimension descriptors.
//! - [`TensorDescriptor`] and [`describe_tensor`] — structured tensor
//!   metadata and the pure formatter used by allocation diagnostics.
//! - [`Operand`] — a read-only kernel input, either an arena activation or
//!   constant bytes taken straight from the model artifact.
//! - Kernels: fully connected, add, ReLU, logistic, tanh, softmax.
//!
//! # Design Goals
//! - Kernels write into caller-provided output slices; they never allocate.
//! - Constant operands are decoded element by element, so weights are never
//!   copied out of the artifact.

mod descriptor;
mod dtype;
mod error;
mod ops;
mod shape;

pub use descriptor::{describe_tensor, TensorDescriptor};
pub use dtype::DType;
pub use error::TensorError;
pub use ops::{add, fully_connected, logistic, relu, softmax, tanh, Operand, OperandIter};
pub use shape::Shape;

// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The reference RR-interval classifier, embedded in the binary.
//!
//! `input[1,40] → fully_connected(8) → relu → fully_connected(1) → logistic`
//!
//! Regenerate with `python3 scripts/gen_reference_model.py`.

/// Artifact bytes of the reference classifier.
pub static REFERENCE_MODEL: &[u8] = include_bytes!("../../../models/rr_classifier.safetensors");

/// Score the reference classifier assigns to
/// [`REFERENCE_RR_INTERVALS`](crate::REFERENCE_RR_INTERVALS).
pub const REFERENCE_SCORE: f32 = 0.575_664;

// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for model loading and graph construction.

/// Errors that can occur when parsing, verifying or building a model artifact.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The bytes are not a readable SafeTensors container.
    #[error("model container is unreadable: {0}")]
    Container(String),

    /// A required metadata entry is absent.
    #[error("model metadata is missing '{0}'")]
    MissingMetadata(&'static str),

    /// The schema version entry is not an unsigned integer.
    #[error("invalid schema version '{0}'")]
    InvalidSchemaVersion(String),

    /// The embedded graph manifest is malformed JSON.
    #[error("failed to parse graph manifest: {0}")]
    ManifestParseError(#[from] serde_json::Error),

    /// A tensor declaration is invalid or disagrees with the stored data.
    #[error("invalid tensor '{tensor}': {detail}")]
    InvalidTensor { tensor: String, detail: String },

    /// An operator declaration is invalid.
    #[error("invalid operator {index}: {detail}")]
    InvalidOperator { index: usize, detail: String },

    /// The graph as a whole is malformed (inputs, outputs, producers).
    #[error("invalid model graph: {0}")]
    InvalidGraph(String),

    /// The artifact's schema version differs from the runtime's.
    #[error("model schema version {found} does not match supported version {supported}")]
    SchemaMismatch { found: u32, supported: u32 },

    /// Writing an artifact failed.
    #[error("failed to serialise model: {0}")]
    Serialise(String),
}

impl ModelError {
    /// Returns `true` for [`ModelError::SchemaMismatch`]; every other
    /// variant means the artifact could not be interpreted at all.
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(self, ModelError::SchemaMismatch { .. })
    }
}

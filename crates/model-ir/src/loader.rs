// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Container parsing.
//!
//! A model artifact is a SafeTensors byte buffer. Its `__metadata__` map
//! carries the schema version and the JSON graph manifest; its data section
//! carries the constant tensors under the names the manifest declares.
//!
//! Parsing borrows the buffer: constant tensor data is handed out as slices
//! of the caller's bytes and never copied.

use crate::{Graph, GraphManifest, ModelError};
use safetensors::tensor::Metadata;
use safetensors::{Dtype, SafeTensors};
use tensor_core::DType;

/// Metadata key holding the schema version as a decimal string.
pub const SCHEMA_VERSION_KEY: &str = "schema_version";

/// Metadata key holding the JSON graph manifest.
pub const GRAPH_KEY: &str = "graph";

/// SafeTensors prefixes the header with its length as a little-endian u64.
const HEADER_LEN_PREFIX: usize = 8;

/// The structurally parsed contents of an artifact.
#[derive(Debug)]
pub(crate) struct ParsedContainer<'a> {
    pub schema_version: u32,
    pub graph: Graph,
    /// Constant data per tensor index; `None` for arena tensors.
    pub constants: Vec<Option<&'a [u8]>>,
}

/// Parses `bytes` as a model container without checking the schema version
/// against anything.
pub(crate) fn parse_container(bytes: &[u8]) -> Result<ParsedContainer<'_>, ModelError> {
    let (header_len, metadata) =
        SafeTensors::read_metadata(bytes).map_err(|e| ModelError::Container(format!("{e:?}")))?;
    let data_start = HEADER_LEN_PREFIX + header_len;

    let entries = metadata
        .metadata()
        .as_ref()
        .ok_or(ModelError::MissingMetadata(SCHEMA_VERSION_KEY))?;

    let raw_version = entries
        .get(SCHEMA_VERSION_KEY)
        .ok_or(ModelError::MissingMetadata(SCHEMA_VERSION_KEY))?;
    let schema_version = raw_version
        .trim()
        .parse::<u32>()
        .map_err(|_| ModelError::InvalidSchemaVersion(raw_version.clone()))?;

    let manifest_json = entries
        .get(GRAPH_KEY)
        .ok_or(ModelError::MissingMetadata(GRAPH_KEY))?;
    let graph = GraphManifest::from_json(manifest_json)?.into_graph()?;

    let constants = resolve_constants(bytes, data_start, &metadata, &graph)?;

    tracing::debug!(
        model = %graph.name,
        schema_version,
        tensors = graph.tensors.len(),
        operators = graph.operators.len(),
        "Parsed model container"
    );

    Ok(ParsedContainer {
        schema_version,
        graph,
        constants,
    })
}

/// Matches every constant tensor in the graph with its stored data.
fn resolve_constants<'a>(
    bytes: &'a [u8],
    data_start: usize,
    metadata: &Metadata,
    graph: &Graph,
) -> Result<Vec<Option<&'a [u8]>>, ModelError> {
    let mut constants = Vec::with_capacity(graph.tensors.len());
    for tensor in &graph.tensors {
        let stored = metadata.info(&tensor.name);
        if !tensor.constant {
            if stored.is_some() {
                tracing::debug!(tensor = %tensor.name, "Ignoring stored data for arena tensor");
            }
            constants.push(None);
            continue;
        }

        let info = stored.ok_or_else(|| ModelError::InvalidTensor {
            tensor: tensor.name.clone(),
            detail: "constant data is missing from the container".into(),
        })?;

        let stored_dtype = convert_dtype(info.dtype).ok_or_else(|| ModelError::InvalidTensor {
            tensor: tensor.name.clone(),
            detail: format!("stored dtype {:?} is not supported", info.dtype),
        })?;
        if stored_dtype != tensor.dtype {
            return Err(ModelError::InvalidTensor {
                tensor: tensor.name.clone(),
                detail: format!("stored as {stored_dtype}, declared as {}", tensor.dtype),
            });
        }
        if info.shape.as_slice() != tensor.shape.dims() {
            return Err(ModelError::InvalidTensor {
                tensor: tensor.name.clone(),
                detail: format!(
                    "stored shape {:?} differs from declared shape {}",
                    info.shape, tensor.shape
                ),
            });
        }

        let (begin, end) = info.data_offsets;
        let data = bytes
            .get(data_start + begin..data_start + end)
            .ok_or_else(|| ModelError::InvalidTensor {
                tensor: tensor.name.clone(),
                detail: "data offsets lie outside the container".into(),
            })?;
        constants.push(Some(data));
    }
    Ok(constants)
}

/// Maps a SafeTensors dtype to the runtime's element type.
pub(crate) fn convert_dtype(dtype: Dtype) -> Option<DType> {
    match dtype {
        Dtype::F32 => Some(DType::F32),
        Dtype::F16 => Some(DType::F16),
        Dtype::I32 => Some(DType::I32),
        Dtype::U8 => Some(DType::U8),
        Dtype::I8 => Some(DType::I8),
        _ => None,
    }
}

/// Inverse of [`convert_dtype`].
pub(crate) fn to_safetensors_dtype(dtype: DType) -> Dtype {
    match dtype {
        DType::F32 => Dtype::F32,
        DType::F16 => Dtype::F16,
        DType::I32 => Dtype::I32,
        DType::U8 => Dtype::U8,
        DType::I8 => Dtype::I8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use safetensors::tensor::TensorView;
    use std::collections::HashMap;

    const MANIFEST: &str = r#"{
        "name": "tiny",
        "tensors": [
            { "name": "input", "dtype": "f32", "shape": [1, 2] },
            { "name": "w", "dtype": "f32", "shape": [1, 2], "constant": true },
            { "name": "out", "dtype": "f32", "shape": [1, 1] }
        ],
        "operators": [ { "op": "fully_connected", "inputs": [0, 1], "outputs": [2] } ],
        "inputs": [0],
        "outputs": [2]
    }"#;

    fn container(meta: &[(&str, &str)], w_dtype: Dtype, w_shape: Vec<usize>) -> Vec<u8> {
        let data: Vec<u8> = [0.5f32, -0.25].iter().flat_map(|v| v.to_le_bytes()).collect();
        let data = &data[..w_shape.iter().product::<usize>() * w_dtype.size()];
        let view = TensorView::new(w_dtype, w_shape, data).unwrap();
        let meta: HashMap<String, String> = meta
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        safetensors::serialize(vec![("w".to_string(), view)], &Some(meta)).unwrap()
    }

    #[test]
    fn test_parse_valid_container() {
        let bytes = container(&[("schema_version", "3"), ("graph", MANIFEST)], Dtype::F32, vec![1, 2]);
        let parsed = parse_container(&bytes).unwrap();
        assert_eq!(parsed.schema_version, 3);
        assert_eq!(parsed.graph.tensors.len(), 3);
        let w = parsed.constants[1].unwrap();
        assert_eq!(w.len(), 8);
        assert_eq!(f32::from_le_bytes([w[0], w[1], w[2], w[3]]), 0.5);
        assert!(parsed.constants[0].is_none());
    }

    #[test]
    fn test_empty_and_garbage_bytes() {
        assert!(matches!(parse_container(&[]), Err(ModelError::Container(_))));
        assert!(matches!(
            parse_container(b"definitely not a model"),
            Err(ModelError::Container(_))
        ));
    }

    #[test]
    fn test_truncated_container() {
        let bytes = container(&[("schema_version", "3"), ("graph", MANIFEST)], Dtype::F32, vec![1, 2]);
        assert!(matches!(
            parse_container(&bytes[..bytes.len() - 3]),
            Err(ModelError::Container(_))
        ));
    }

    #[test]
    fn test_missing_metadata() {
        let bytes = container(&[("graph", MANIFEST)], Dtype::F32, vec![1, 2]);
        assert!(matches!(
            parse_container(&bytes),
            Err(ModelError::MissingMetadata(SCHEMA_VERSION_KEY))
        ));
        let bytes = container(&[("schema_version", "3")], Dtype::F32, vec![1, 2]);
        assert!(matches!(
            parse_container(&bytes),
            Err(ModelError::MissingMetadata(GRAPH_KEY))
        ));
    }

    #[test]
    fn test_non_numeric_version() {
        let bytes = container(&[("schema_version", "three"), ("graph", MANIFEST)], Dtype::F32, vec![1, 2]);
        assert!(matches!(
            parse_container(&bytes),
            Err(ModelError::InvalidSchemaVersion(_))
        ));
    }

    #[test]
    fn test_constant_shape_mismatch() {
        let bytes = container(&[("schema_version", "3"), ("graph", MANIFEST)], Dtype::F32, vec![2, 1]);
        assert!(matches!(
            parse_container(&bytes),
            Err(ModelError::InvalidTensor { .. })
        ));
    }

    #[test]
    fn test_constant_dtype_mismatch() {
        let bytes = container(&[("schema_version", "3"), ("graph", MANIFEST)], Dtype::I32, vec![1, 2]);
        assert!(matches!(
            parse_container(&bytes),
            Err(ModelError::InvalidTensor { .. })
        ));
    }

    #[test]
    fn test_dtype_mapping() {
        for dtype in [DType::F32, DType::F16, DType::I32, DType::U8, DType::I8] {
            assert_eq!(convert_dtype(to_safetensors_dtype(dtype)), Some(dtype));
        }
        assert_eq!(convert_dtype(Dtype::BF16), None);
    }
}

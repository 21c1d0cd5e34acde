// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Operator kinds and operator definitions.

/// The kind of computation an operator performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    /// Dense layer: input × weightsᵀ + bias.
    FullyConnected,
    /// Element-wise addition of two operands.
    Add,
    /// Rectified linear unit.
    Relu,
    /// Logistic sigmoid.
    Logistic,
    /// Hyperbolic tangent.
    Tanh,
    /// Softmax over the whole operand.
    Softmax,
}

impl OpKind {
    /// Every operator kind the artifact format can express.
    pub const ALL: [OpKind; 6] = [
        OpKind::FullyConnected,
        OpKind::Add,
        OpKind::Relu,
        OpKind::Logistic,
        OpKind::Tanh,
        OpKind::Softmax,
    ];

    /// Parses an operator kind from a manifest string.
    ///
    /// Accepts snake_case names and common aliases (`"dense"`, `"sigmoid"`).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fully_connected" | "fullyconnected" | "dense" | "linear" => Some(Self::FullyConnected),
            "add" => Some(Self::Add),
            "relu" => Some(Self::Relu),
            "logistic" | "sigmoid" => Some(Self::Logistic),
            "tanh" => Some(Self::Tanh),
            "softmax" => Some(Self::Softmax),
            _ => None,
        }
    }

    /// Returns the canonical manifest name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullyConnected => "fully_connected",
            Self::Add => "add",
            Self::Relu => "relu",
            Self::Logistic => "logistic",
            Self::Tanh => "tanh",
            Self::Softmax => "softmax",
        }
    }
}

impl std::fmt::Display for OpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of the model graph: an operator and the tensor indices it reads
/// and writes.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OperatorDef {
    /// Position in execution order.
    pub index: usize,
    /// What the operator computes.
    pub kind: OpKind,
    /// Indices of the tensors read, in operand order.
    pub inputs: Vec<usize>,
    /// Indices of the tensors written.
    pub outputs: Vec<usize>,
}

impl OperatorDef {
    /// Returns a one-line summary, e.g. `"#0 fully_connected [0, 1, 2] -> [3]"`.
    pub fn summary(&self) -> String {
        format!("#{} {} {:?} -> {:?}", self.index, self.kind, self.inputs, self.outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_names() {
        for kind in OpKind::ALL {
            assert_eq!(OpKind::from_str_loose(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_aliases() {
        assert_eq!(OpKind::from_str_loose("Dense"), Some(OpKind::FullyConnected));
        assert_eq!(OpKind::from_str_loose("sigmoid"), Some(OpKind::Logistic));
        assert_eq!(OpKind::from_str_loose("lstm"), None);
    }

    #[test]
    fn test_summary() {
        let op = OperatorDef {
            index: 0,
            kind: OpKind::FullyConnected,
            inputs: vec![0, 1, 2],
            outputs: vec![3],
        };
        assert_eq!(op.summary(), "#0 fully_connected [0, 1, 2] -> [3]");
    }
}

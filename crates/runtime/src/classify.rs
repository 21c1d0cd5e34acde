// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Thresholding a model score into a binary decision.

use std::fmt;

/// Scores strictly above this value are positive.
pub const DEFAULT_DECISION_THRESHOLD: f32 = 0.5;

/// The binary decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Positive,
    Negative,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Label::Positive => "positive",
            Label::Negative => "negative",
        })
    }
}

/// A score and the label it maps to.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Classification {
    pub score: f32,
    pub label: Label,
}

/// Classifies `score` against `threshold`.
///
/// The comparison is strict, so a score equal to the threshold is negative.
/// NaN compares false and is negative as well.
pub fn classify(score: f32, threshold: f32) -> Classification {
    let label = if score > threshold {
        Label::Positive
    } else {
        Label::Negative
    };
    Classification { score, label }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (score {:.2})", self.label, self.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_strict() {
        assert_eq!(classify(0.5, 0.5).label, Label::Negative);
        assert_eq!(classify(0.500_000_1, 0.5).label, Label::Positive);
        assert_eq!(classify(0.499_999_9, 0.5).label, Label::Negative);
    }

    #[test]
    fn test_out_of_range_scores() {
        assert_eq!(classify(-1.0, 0.5).label, Label::Negative);
        assert_eq!(classify(7.0, 0.5).label, Label::Positive);
        assert_eq!(classify(f32::NEG_INFINITY, 0.5).label, Label::Negative);
    }

    #[test]
    fn test_nan_is_negative() {
        let c = classify(f32::NAN, 0.5);
        assert_eq!(c.label, Label::Negative);
        assert!(c.score.is_nan());
    }

    #[test]
    fn test_display() {
        assert_eq!(classify(0.734, 0.5).to_string(), "positive (score 0.73)");
    }

    #[test]
    fn test_serialise() {
        let json = serde_json::to_string(&classify(0.25, 0.5)).unwrap();
        assert_eq!(json, r#"{"score":0.25,"label":"negative"}"#);
    }
}

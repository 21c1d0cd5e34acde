// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Feature vectors: the reference RR-interval sample, widening into the
//! input tensor, and parsing from text.

use crate::RuntimeError;

/// Number of samples in one feature vector.
pub const FEATURE_LENGTH: usize = 40;

/// Reference RR-interval magnitudes.
pub const REFERENCE_RR_INTERVALS: [u8; FEATURE_LENGTH] = [
    174, 174, 100, 175, 114, 145, 165, 200, 140, 123, //
    115, 161, 126, 130, 170, 221, 205, 179, 140, 101, //
    125, 109, 114, 176, 148, 181, 164, 248, 126, 137, //
    218, 181, 117, 129, 117, 106, 122, 125, 156, 162,
];

/// Copies `samples` into `out`, widening each byte to the `f32` of the same
/// value. No scaling is applied.
///
/// # Errors
/// [`RuntimeError::InputMismatch`] if the lengths differ.
pub fn widen_samples(samples: &[u8], out: &mut [f32]) -> Result<(), RuntimeError> {
    if samples.len() != out.len() {
        return Err(RuntimeError::InputMismatch(format!(
            "feature vector has {} samples, input tensor holds {} elements",
            samples.len(),
            out.len()
        )));
    }
    for (dst, &src) in out.iter_mut().zip(samples) {
        *dst = f32::from(src);
    }
    Ok(())
}

/// Parses integers 0–255 separated by whitespace and/or commas.
///
/// Lines starting with `#` are ignored.
pub fn parse_features(text: &str) -> Result<Vec<u8>, RuntimeError> {
    text.lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .flat_map(|line| line.split(|c: char| c == ',' || c.is_whitespace()))
        .filter(|tok| !tok.is_empty())
        .map(|tok| {
            tok.parse::<u8>().map_err(|_| {
                RuntimeError::InvalidFeatures(format!("'{tok}' is not an integer in 0..=255"))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widen_every_byte_exactly() {
        let samples: Vec<u8> = (0..=255).collect();
        let mut out = vec![f32::NAN; samples.len()];
        widen_samples(&samples, &mut out).unwrap();
        for (i, v) in out.iter().enumerate() {
            assert_eq!(*v, i as f32);
        }
    }

    #[test]
    fn test_widen_reference() {
        let mut out = [0.0f32; FEATURE_LENGTH];
        widen_samples(&REFERENCE_RR_INTERVALS, &mut out).unwrap();
        assert_eq!(out[0], 174.0);
        assert_eq!(out[2], 100.0);
        assert_eq!(out[27], 248.0);
        assert_eq!(out[39], 162.0);
    }

    #[test]
    fn test_widen_length_mismatch() {
        let mut out = [0.0f32; 3];
        assert!(matches!(
            widen_samples(&[1, 2], &mut out),
            Err(RuntimeError::InputMismatch(_))
        ));
    }

    #[test]
    fn test_parse_mixed_separators() {
        let text = "# rr intervals\n174, 174 100\n\t175,114,\n";
        assert_eq!(parse_features(text).unwrap(), vec![174, 174, 100, 175, 114]);
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!(matches!(
            parse_features("12 256"),
            Err(RuntimeError::InvalidFeatures(_))
        ));
        assert!(parse_features("-1").is_err());
        assert!(parse_features("1.5").is_err());
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_features("").unwrap().is_empty());
    }
}

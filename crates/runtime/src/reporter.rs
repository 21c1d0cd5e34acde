// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Diagnostic reporting.
//!
//! The lifecycle controller narrates every step through a [`Reporter`].
//! Reporting is write-only and infallible: a sink that cannot deliver a line
//! drops it.

use tensor_core::{describe_tensor, TensorDescriptor};

/// A sink for lifecycle diagnostics.
pub trait Reporter {
    /// Emits one progress line.
    fn report(&mut self, event: &str);

    /// Emits one line describing a failure. Defaults to [`report`](Self::report).
    fn report_failure(&mut self, event: &str) {
        self.report(event);
    }

    /// Emits the diagnostic line for tensor `index`.
    fn report_tensor(&mut self, index: usize, tensor: Option<&TensorDescriptor>) {
        self.report(&describe_tensor(index, tensor));
    }
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn report(&mut self, event: &str) {
        (**self).report(event);
    }

    fn report_failure(&mut self, event: &str) {
        (**self).report_failure(event);
    }

    fn report_tensor(&mut self, index: usize, tensor: Option<&TensorDescriptor>) {
        (**self).report_tensor(index, tensor);
    }
}

/// Forwards every line to `tracing`: progress at `info`, failures and tensor
/// diagnostics at `error`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&mut self, event: &str) {
        tracing::info!("{event}");
    }

    fn report_failure(&mut self, event: &str) {
        tracing::error!("{event}");
    }

    fn report_tensor(&mut self, index: usize, tensor: Option<&TensorDescriptor>) {
        tracing::error!("{}", describe_tensor(index, tensor));
    }
}

/// Keeps every line in memory, in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    lines: Vec<String>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// Whether any recorded line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl Reporter for RecordingReporter {
    fn report(&mut self, event: &str) {
        self.lines.push(event.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tensor_core::{DType, Shape};

    #[test]
    fn test_recording_order() {
        let mut r = RecordingReporter::new();
        r.report("first");
        r.report_failure("second");
        r.report_tensor(0, None);
        assert_eq!(r.lines(), &["first", "second", "Tensor 0 is null"]);
        assert!(r.contains("sec"));
        r.clear();
        assert!(r.lines().is_empty());
    }

    #[test]
    fn test_tensor_line() {
        let mut r = RecordingReporter::new();
        let t = TensorDescriptor::activation("input", DType::F32, Shape::matrix(1, 40));
        r.report_tensor(0, Some(&t));
        assert_eq!(
            r.into_lines(),
            vec!["Tensor 0 - Type: f32 (1), Size: 160, Dimensions: [1, 40]".to_string()]
        );
    }

    #[test]
    fn test_forwarding_through_mut_ref() {
        fn emit<R: Reporter>(mut sink: R) {
            sink.report("via ref");
            sink.report_tensor(1, None);
        }
        let mut r = RecordingReporter::new();
        emit(&mut r);
        assert_eq!(r.lines(), &["via ref", "Tensor 1 is null"]);
    }

    #[test]
    fn test_tracing_reporter_does_not_panic() {
        let mut r = TracingReporter;
        r.report("progress");
        r.report_failure("failure");
        r.report_tensor(2, None);
    }
}

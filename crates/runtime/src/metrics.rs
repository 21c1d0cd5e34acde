// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Inference profiling metrics.
//!
//! [`InferenceMetrics`] collects invocation timing and arena usage across
//! the inferences run on one binding.

use std::time::Duration;

/// Aggregate metrics for the inferences run by a controller.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct InferenceMetrics {
    /// Completed invocations.
    pub inferences: usize,
    /// Duration of the most recent invocation.
    pub last_invoke_duration: Duration,
    /// Sum of all invocation durations.
    pub total_invoke_duration: Duration,
    /// Operators executed per invocation.
    pub operators: usize,
    /// Pool bytes claimed by the binding.
    pub arena_used_bytes: usize,
    /// Pool capacity in bytes.
    pub arena_capacity_bytes: usize,
}

impl InferenceMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the arena footprint of a fresh binding.
    pub fn record_binding(&mut self, operators: usize, used: usize, capacity: usize) {
        self.operators = operators;
        self.arena_used_bytes = used;
        self.arena_capacity_bytes = capacity;
    }

    /// Records one completed invocation.
    pub fn record_invoke(&mut self, duration: Duration) {
        self.inferences += 1;
        self.last_invoke_duration = duration;
        self.total_invoke_duration += duration;
    }

    /// Mean invocation time; zero before the first inference.
    pub fn mean_invoke_duration(&self) -> Duration {
        match u32::try_from(self.inferences) {
            Ok(0) | Err(_) => Duration::ZERO,
            Ok(n) => self.total_invoke_duration / n,
        }
    }

    /// Fraction of the pool claimed, in `[0, 1]`.
    pub fn arena_utilisation(&self) -> f64 {
        if self.arena_capacity_bytes == 0 {
            return 0.0;
        }
        self.arena_used_bytes as f64 / self.arena_capacity_bytes as f64
    }

    /// Returns a human-readable summary suitable for CLI output.
    pub fn summary(&self) -> String {
        format!(
            "Inference: {} run(s), {} operators, {:.3}ms mean invoke, \
             arena {} / {} bytes ({:.1}%)",
            self.inferences,
            self.operators,
            self.mean_invoke_duration().as_secs_f64() * 1000.0,
            self.arena_used_bytes,
            self.arena_capacity_bytes,
            self.arena_utilisation() * 100.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_metrics() {
        let m = InferenceMetrics::new();
        assert_eq!(m.mean_invoke_duration(), Duration::ZERO);
        assert_eq!(m.arena_utilisation(), 0.0);
    }

    #[test]
    fn test_record() {
        let mut m = InferenceMetrics::new();
        m.record_binding(4, 8192, 32768);
        m.record_invoke(Duration::from_millis(2));
        m.record_invoke(Duration::from_millis(4));

        assert_eq!(m.inferences, 2);
        assert_eq!(m.last_invoke_duration, Duration::from_millis(4));
        assert_eq!(m.mean_invoke_duration(), Duration::from_millis(3));
        assert!((m.arena_utilisation() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_summary_format() {
        let mut m = InferenceMetrics::new();
        m.record_binding(4, 176, 32768);
        m.record_invoke(Duration::from_micros(50));
        let s = m.summary();
        assert!(s.contains("Inference:"));
        assert!(s.contains("1 run(s)"));
        assert!(s.contains("176 / 32768 bytes"));
    }
}

/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Running totals over everything the scheduler has processed.

use serde::Serialize;

use crate::message::ProcessedRecord;

/// Snapshot of the aggregate counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metrics {
    /// Messages processed since the last reset.  Never decreases.
    pub total_processed: u64,

    /// Running mean latency, truncated to whole milliseconds.
    pub average_latency_ms: u64,
}

/// Folds tick batches into [`Metrics`].
#[derive(Debug, Clone, Default)]
pub struct MetricsAggregator {
    metrics: Metrics,
}

impl MetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    /// Fold one batch into the totals.
    ///
    /// `avg' = floor((avg * total + Σ latency) / (total + n))`
    ///
    /// The previous average is itself truncated, so the result can drift
    /// below the exact mean over many batches; the formula is kept as-is so
    /// numbers match other consumers of the same feed.  Empty batches are a
    /// no-op.
    pub fn apply_batch(&mut self, records: &[ProcessedRecord]) {
        if records.is_empty() {
            return;
        }
        let Metrics {
            total_processed,
            average_latency_ms,
        } = self.metrics;

        let new_total = total_processed + records.len() as u64;
        // Epoch-scale latencies times large counts exceed u64.
        let batch_sum: u128 = records.iter().map(|r| u128::from(r.latency_ms)).sum();
        let weighted = u128::from(average_latency_ms) * u128::from(total_processed) + batch_sum;
        let new_average = u64::try_from(weighted / u128::from(new_total)).unwrap_or(u64::MAX);

        self.metrics = Metrics {
            total_processed: new_total,
            average_latency_ms: new_average,
        };
    }

    pub fn reset(&mut self) {
        self.metrics = Metrics::default();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

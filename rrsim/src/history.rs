/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Bounded display history of scheduler output.
//!
//! Two independent sliding windows:
//!
//! * processed records — **newest first**; a batch is prepended as a block,
//!   then the tail is cut back to the cap.
//! * execution intervals — **oldest first**; a batch is appended, then the
//!   head is cut back to the cap.

use std::collections::VecDeque;

use crate::message::{ExecutionInterval, ProcessedRecord};

/// Default number of processed records kept.
pub const DEFAULT_PROCESSED_CAP: usize = 50;

/// Default number of execution intervals kept.
pub const DEFAULT_INTERVAL_CAP: usize = 200;

#[derive(Debug, Clone)]
pub struct HistoryLog {
    processed: VecDeque<ProcessedRecord>,
    intervals: VecDeque<ExecutionInterval>,
    processed_cap: usize,
    interval_cap: usize,
}

impl HistoryLog {
    pub fn new(processed_cap: usize, interval_cap: usize) -> Self {
        Self {
            processed: VecDeque::with_capacity(processed_cap),
            intervals: VecDeque::with_capacity(interval_cap),
            processed_cap,
            interval_cap,
        }
    }

    /// Prepend `batch` (keeping its internal order at the head) and drop the
    /// oldest records beyond the cap.
    pub fn record_processed(&mut self, batch: &[ProcessedRecord]) {
        for rec in batch.iter().rev() {
            self.processed.push_front(rec.clone());
        }
        self.processed.truncate(self.processed_cap);
    }

    /// Append `batch` and drop the oldest intervals beyond the cap.
    pub fn record_intervals(&mut self, batch: &[ExecutionInterval]) {
        self.intervals.extend(batch.iter().cloned());
        let excess = self.intervals.len().saturating_sub(self.interval_cap);
        self.intervals.drain(..excess);
    }

    /// Newest first.
    pub fn processed(&self) -> &VecDeque<ProcessedRecord> {
        &self.processed
    }

    /// Oldest first.
    pub fn intervals(&self) -> &VecDeque<ExecutionInterval> {
        &self.intervals
    }

    pub fn processed_cap(&self) -> usize {
        self.processed_cap
    }

    pub fn interval_cap(&self) -> usize {
        self.interval_cap
    }

    pub fn clear(&mut self) {
        self.processed.clear();
        self.intervals.clear();
    }
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new(DEFAULT_PROCESSED_CAP, DEFAULT_INTERVAL_CAP)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

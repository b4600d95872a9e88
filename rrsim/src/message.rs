/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Core message data structures for the round-robin simulation.
//!
//! Three types model the life of a message:
//!
//! ```text
//! injector ──► Message ──(QueueStore)──► scheduler tick ──► ProcessedRecord
//!                                                      └──► ExecutionInterval
//! ```
//!
//! # Ownership model
//! A `Message` is **owned** by exactly one client queue from injection until
//! the scheduler dequeues it.  Dequeuing moves it into the emitted
//! [`ProcessedRecord`]; nothing ever mutates it after creation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::client::ClientId;

/// Milliseconds since the Unix epoch.
pub type Millis = u64;

// ── MessageKind ───────────────────────────────────────────────────────────────

/// What a message asks the core to do.  Purely descriptive; the scheduler
/// treats every kind identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageKind {
    Buy,
    Sell,
    Ping,
}

impl MessageKind {
    /// All kinds, in declaration order.  Used by the injector for uniform
    /// selection.
    pub const ALL: [MessageKind; 3] = [MessageKind::Buy, MessageKind::Sell, MessageKind::Ping];

    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Buy => "BUY",
            MessageKind::Sell => "SELL",
            MessageKind::Ping => "PING",
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Message ───────────────────────────────────────────────────────────────────

/// A unit of work waiting in a client queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    /// Unique id (uuid v4 when created by the simulation).
    pub id: String,

    /// Client whose queue the message belongs to.
    pub client_id: ClientId,

    /// Free-form payload shown by the presentation layer.
    pub content: String,

    /// Creation timestamp in ms since the Unix epoch.
    pub created_at: Millis,

    pub kind: MessageKind,
}

impl Message {
    /// Create a message with a fresh random id.
    pub fn new(
        client_id: ClientId,
        kind: MessageKind,
        content: impl Into<String>,
        created_at: Millis,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            client_id,
            content: content.into(),
            created_at,
            kind,
        }
    }
}

// ── Scheduler output ──────────────────────────────────────────────────────────

/// A message that a core dequeued and processed during one tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedRecord {
    pub message: Message,

    /// Tick timestamp at which the core served the message.
    pub processed_at: Millis,

    /// `processed_at - message.created_at`, saturating at zero.
    pub latency_ms: u64,

    /// Core that served the message.
    pub core_id: usize,
}

impl ProcessedRecord {
    /// Build the record for `message` served by `core_id` at `processed_at`.
    pub fn new(message: Message, processed_at: Millis, core_id: usize) -> Self {
        let latency_ms = processed_at.saturating_sub(message.created_at);
        Self {
            message,
            processed_at,
            latency_ms,
            core_id,
        }
    }
}

/// One core's occupied time-slice for one tick in which it served a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionInterval {
    /// Sequence id, unique within one simulation run.
    pub id: u64,
    pub client_id: ClientId,
    pub start_time: Millis,
    pub end_time: Millis,
    pub core_id: usize,
}

impl ExecutionInterval {
    pub fn duration_ms(&self) -> u64 {
        self.end_time.saturating_sub(self.start_time)
    }
}

// ── Clock ─────────────────────────────────────────────────────────────────────

/// Time source for message creation and tick timestamps.
pub trait Clock: Send + Sync {
    /// Current time in ms since the Unix epoch.
    fn now_ms(&self) -> Millis;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> Millis {
        // A system clock set before 1970 reads as the epoch.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as Millis)
            .unwrap_or(0)
    }
}

/// Settable clock.  Clones share the same underlying time, so a test can
/// hand one clone to the simulation and keep another to advance it.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start_ms: Millis) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    pub fn set(&self, ms: Millis) {
        self.now.store(ms, Ordering::SeqCst);
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Millis {
        self.now.load(Ordering::SeqCst)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

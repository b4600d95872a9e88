//! Multi-core round-robin scheduler.
//!
//! [`RoundRobinScheduler`] owns one [`CoreState`] per simulated core.  Each
//! call to [`tick`](RoundRobinScheduler::tick) lets every core attempt exactly
//! one dequeue from the client its rotation index points at, then advances
//! every rotation index by one.
//!
//! # Ordering rules
//!
//! | Topic | Rule |
//! |---|---|
//! | Core order within a tick | ascending `core_id` — lower core wins a collision |
//! | Rotation | advances on **every** tick, hit or miss (fixed-rate round robin) |
//! | Initial rotation | `core_id mod client_count` — cores start offset from each other |
//! | Atomicity | every target queue is validated before any queue or core is mutated |
//!
//! # Example
//! ```rust
//! use rrsim::client::ClientRegistry;
//! use rrsim::message::{Message, MessageKind};
//! use rrsim::queue::QueueStore;
//! use rrsim::scheduler::RoundRobinScheduler;
//!
//! let registry = ClientRegistry::new(["A", "B"]).unwrap();
//! let mut queues = QueueStore::new(&registry);
//! let a = rrsim::client::ClientId::new("A");
//! queues.enqueue(&a, Message::new("A".into(), MessageKind::Buy, "BUY #1", 0)).unwrap();
//!
//! let mut scheduler = RoundRobinScheduler::new(registry, 2, 1_000).unwrap();
//! let batch = scheduler.tick(&mut queues, 250).unwrap();
//! assert_eq!(batch.processed.len(), 1);
//! assert_eq!(batch.processed[0].latency_ms, 250);
//! ```

pub mod error;

pub use error::SimError;

use serde::Serialize;
use tracing::{debug, trace};

use crate::client::{ClientId, ClientRegistry};
use crate::message::{ExecutionInterval, Millis, ProcessedRecord};
use crate::queue::QueueStore;

// ── CoreState ─────────────────────────────────────────────────────────────────

/// Rotation pointer of one simulated core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CoreState {
    pub core_id: usize,

    /// Position in the client registry this core serves next.
    /// Always in `[0, client_count)`.
    pub rotation_index: usize,
}

impl CoreState {
    /// Initial state for core `core_id`: `rotation_index = core_id mod client_count`.
    ///
    /// `client_count` must be non-zero; [`ClientRegistry`] guarantees this.
    pub fn new(core_id: usize, client_count: usize) -> Self {
        Self {
            core_id,
            rotation_index: core_id % client_count,
        }
    }

    /// Move to the next client, wrapping at `client_count`.
    pub fn advance(&mut self, client_count: usize) {
        self.rotation_index = (self.rotation_index + 1) % client_count;
    }
}

// ── TickBatch ─────────────────────────────────────────────────────────────────

/// Everything one tick produced.  Both vectors are ordered by ascending
/// `core_id`; either may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickBatch {
    pub processed: Vec<ProcessedRecord>,
    pub intervals: Vec<ExecutionInterval>,
}

impl TickBatch {
    pub fn is_empty(&self) -> bool {
        self.processed.is_empty()
    }
}

// ── RoundRobinScheduler ───────────────────────────────────────────────────────

/// The tick engine.  Core count and client order are fixed at construction.
#[derive(Debug, Clone)]
pub struct RoundRobinScheduler {
    registry: ClientRegistry,
    cores: Vec<CoreState>,

    /// Width of the execution interval emitted for a served message.
    tick_duration_ms: u64,

    /// Id assigned to the next emitted [`ExecutionInterval`].
    next_interval_id: u64,

    /// Number of completed ticks.
    ticks: u64,
}

impl RoundRobinScheduler {
    /// Create a scheduler with `core_count` cores rotating over `registry`.
    ///
    /// # Errors
    /// [`SimError::InvalidCoreCount`] if `core_count == 0`.
    pub fn new(
        registry: ClientRegistry,
        core_count: usize,
        tick_duration_ms: u64,
    ) -> Result<Self, SimError> {
        if core_count == 0 {
            return Err(SimError::InvalidCoreCount(core_count));
        }
        let client_count = registry.len();
        let cores = (0..core_count)
            .map(|id| CoreState::new(id, client_count))
            .collect();

        Ok(Self {
            registry,
            cores,
            tick_duration_ms,
            next_interval_id: 1,
            ticks: 0,
        })
    }

    pub fn cores(&self) -> &[CoreState] {
        &self.cores
    }

    pub fn core_count(&self) -> usize {
        self.cores.len()
    }

    pub fn registry(&self) -> &ClientRegistry {
        &self.registry
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn tick_duration_ms(&self) -> u64 {
        self.tick_duration_ms
    }

    /// Client each core will serve on the next tick, in core order.
    pub fn targets(&self) -> Vec<&ClientId> {
        self.cores
            .iter()
            .map(|c| &self.registry.as_slice()[c.rotation_index])
            .collect()
    }

    /// Advance every core by one step at time `now`.
    ///
    /// Cores run strictly in ascending `core_id` order against the same
    /// queues, so when two cores target the same client the lower one takes
    /// the head message and the higher one may find the queue empty.
    ///
    /// # Errors
    /// [`SimError::UnknownClient`] if `queues` was not built from this
    /// scheduler's registry.  Nothing is mutated in that case.
    pub fn tick(&mut self, queues: &mut QueueStore, now: Millis) -> Result<TickBatch, SimError> {
        // Validate every target before touching anything so a failure leaves
        // queues and cores exactly as they were.
        for client in self.targets() {
            queues.messages(client)?;
        }

        let client_count = self.registry.len();
        let mut batch = TickBatch::default();

        for core in self.cores.iter_mut() {
            let client = &self.registry.as_slice()[core.rotation_index];

            match queues.dequeue_front(client)? {
                Some(message) => {
                    let record = ProcessedRecord::new(message, now, core.core_id);
                    debug!(
                        core       = core.core_id,
                        client     = %client,
                        message    = %record.message.id,
                        latency_ms = record.latency_ms,
                        "processed"
                    );

                    batch.intervals.push(ExecutionInterval {
                        id: self.next_interval_id,
                        client_id: client.clone(),
                        start_time: now.saturating_sub(self.tick_duration_ms),
                        end_time: now,
                        core_id: core.core_id,
                    });
                    self.next_interval_id += 1;
                    batch.processed.push(record);
                }
                None => {
                    trace!(core = core.core_id, client = %client, "idle");
                }
            }

            core.advance(client_count);
        }

        self.ticks += 1;
        debug!(
            tick      = self.ticks,
            processed = batch.processed.len(),
            idle      = self.cores.len() - batch.processed.len(),
            "tick complete"
        );

        Ok(batch)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

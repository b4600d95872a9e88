/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! The owned simulation state and its public API.
//!
//! [`Simulation`] bundles every piece of mutable state (queues, core
//! rotation, metrics, history) in one value.  A presentation layer holds one
//! `Simulation`, drives it with [`inject_message`](Simulation::inject_message)
//! and [`tick`](Simulation::tick), and renders [`snapshot`](Simulation::snapshot).
//!
//! ```text
//!   unconfigured ──configure(n)──► configured ──tick()──► running
//!        ▲                             │  ▲                  │
//!        └────────── reset() ──────────┘  └─ configure(n) ───┘ (rejected)
//! ```

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::client::{ClientId, ClientRegistry};
use crate::history::{HistoryLog, DEFAULT_INTERVAL_CAP, DEFAULT_PROCESSED_CAP};
use crate::injector::Injector;
use crate::message::{
    Clock, ExecutionInterval, Message, MessageKind, Millis, ProcessedRecord, SystemClock,
};
use crate::metrics::{Metrics, MetricsAggregator};
use crate::queue::QueueStore;
use crate::scheduler::{CoreState, RoundRobinScheduler, SimError, TickBatch};

// ── Settings ──────────────────────────────────────────────────────────────────

/// Construction-time knobs that are not part of the evolving state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimSettings {
    /// Width of each emitted execution interval.
    pub tick_duration_ms: u64,
    pub processed_cap: usize,
    pub interval_cap: usize,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            tick_duration_ms: 1_000,
            processed_cap: DEFAULT_PROCESSED_CAP,
            interval_cap: DEFAULT_INTERVAL_CAP,
        }
    }
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// Pending messages of one client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueSnapshot {
    pub client: ClientId,
    pub messages: Vec<Message>,
}

/// Read-only copy of the whole simulation state for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimSnapshot {
    pub configured: bool,
    pub ticks: u64,
    pub total_injected: u64,
    /// In registry (rotation) order.
    pub queues: Vec<QueueSnapshot>,
    pub cores: Vec<CoreState>,
    pub metrics: Metrics,
    /// Newest first.
    pub processed: Vec<ProcessedRecord>,
    /// Oldest first.
    pub intervals: Vec<ExecutionInterval>,
}

// ── Simulation ────────────────────────────────────────────────────────────────

pub struct Simulation {
    registry: ClientRegistry,
    settings: SimSettings,
    clock: Arc<dyn Clock>,
    injector: Injector,

    queues: QueueStore,
    /// `None` until `configure()`.
    scheduler: Option<RoundRobinScheduler>,
    metrics: MetricsAggregator,
    history: HistoryLog,
    injected: u64,
}

impl Simulation {
    pub fn new(registry: ClientRegistry, settings: SimSettings, clock: Arc<dyn Clock>) -> Self {
        let queues = QueueStore::new(&registry);
        let history = HistoryLog::new(settings.processed_cap, settings.interval_cap);
        Self {
            registry,
            settings,
            clock,
            injector: Injector::from_entropy(),
            queues,
            scheduler: None,
            metrics: MetricsAggregator::new(),
            history,
            injected: 0,
        }
    }

    /// Replace the random source used for message kinds and random clients.
    pub fn with_injector(mut self, injector: Injector) -> Self {
        self.injector = injector;
        self
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    /// Set up `core_count` cores.
    ///
    /// May be repeated until the first tick; each call re-initialises the
    /// core rotation.
    ///
    /// # Errors
    /// * [`SimError::InvalidCoreCount`] for `0`.
    /// * [`SimError::AlreadyStarted`] once a tick has run.
    pub fn configure(&mut self, core_count: usize) -> Result<(), SimError> {
        if let Some(s) = &self.scheduler {
            if s.ticks() > 0 {
                return Err(SimError::AlreadyStarted { ticks: s.ticks() });
            }
        }
        let scheduler = RoundRobinScheduler::new(
            self.registry.clone(),
            core_count,
            self.settings.tick_duration_ms,
        )?;
        self.scheduler = Some(scheduler);

        info!(
            cores   = core_count,
            clients = self.registry.len(),
            tick_duration_ms = self.settings.tick_duration_ms,
            "simulation configured"
        );
        Ok(())
    }

    /// Back to the unconfigured state: queues, cores, history and metrics
    /// are cleared.
    pub fn reset(&mut self) {
        self.queues.clear();
        self.scheduler = None;
        self.metrics.reset();
        self.history.clear();
        self.injected = 0;
        info!("simulation reset");
    }

    pub fn is_configured(&self) -> bool {
        self.scheduler.is_some()
    }

    // ── Injection ─────────────────────────────────────────────────────────────

    /// Enqueue a message of random kind for `client`, stamped with the
    /// current clock.  Returns a copy of the queued message.
    ///
    /// Fails before drawing from the injector when unconfigured, so a
    /// rejected call leaves the random sequence untouched.
    pub fn inject_message(&mut self, client: &ClientId) -> Result<Message, SimError> {
        if !self.is_configured() {
            return Err(SimError::NotConfigured);
        }
        let kind = self.injector.pick_kind();
        let content = format!("{} #{}", kind, self.injected + 1);
        self.inject_message_with(client, kind, content)
    }

    /// Enqueue a message for a randomly chosen client.
    pub fn inject_random(&mut self) -> Result<Message, SimError> {
        if !self.is_configured() {
            return Err(SimError::NotConfigured);
        }
        let client = self
            .injector
            .pick_client(&self.registry)
            .ok_or(SimError::EmptyRegistry)?;
        self.inject_message(&client)
    }

    /// Enqueue a message with caller-chosen kind and content.
    pub fn inject_message_with(
        &mut self,
        client: &ClientId,
        kind: MessageKind,
        content: impl Into<String>,
    ) -> Result<Message, SimError> {
        let created_at = self.clock.now_ms();
        self.inject_at(client, kind, content, created_at)
    }

    /// Enqueue a message with an explicit creation timestamp.
    pub fn inject_at(
        &mut self,
        client: &ClientId,
        kind: MessageKind,
        content: impl Into<String>,
        created_at: Millis,
    ) -> Result<Message, SimError> {
        if self.scheduler.is_none() {
            return Err(SimError::NotConfigured);
        }
        let message = Message::new(client.clone(), kind, content, created_at);
        self.queues.enqueue(client, message.clone())?;
        self.injected += 1;

        debug!(
            client = %client,
            kind   = %kind,
            id     = %message.id,
            depth  = self.queues.len_of(client),
            "message injected"
        );
        Ok(message)
    }

    // ── Scheduling ────────────────────────────────────────────────────────────

    /// Run one tick at the current clock time.
    pub fn tick(&mut self) -> Result<TickBatch, SimError> {
        let now = self.clock.now_ms();
        self.tick_at(now)
    }

    /// Run one tick at `now`, then fold the output into metrics and history.
    pub fn tick_at(&mut self, now: Millis) -> Result<TickBatch, SimError> {
        let scheduler = self.scheduler.as_mut().ok_or(SimError::NotConfigured)?;
        let batch = scheduler.tick(&mut self.queues, now)?;

        self.metrics.apply_batch(&batch.processed);
        self.history.record_processed(&batch.processed);
        self.history.record_intervals(&batch.intervals);
        Ok(batch)
    }

    // ── Read-only accessors ───────────────────────────────────────────────────

    pub fn registry(&self) -> &ClientRegistry {
        &self.registry
    }

    pub fn settings(&self) -> SimSettings {
        self.settings
    }

    pub fn queues(&self) -> &QueueStore {
        &self.queues
    }

    /// Core states in `core_id` order; empty when unconfigured.
    pub fn cores(&self) -> &[CoreState] {
        self.scheduler
            .as_ref()
            .map(RoundRobinScheduler::cores)
            .unwrap_or(&[])
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics.metrics()
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn ticks(&self) -> u64 {
        self.scheduler.as_ref().map_or(0, RoundRobinScheduler::ticks)
    }

    /// Messages injected since the last reset.
    pub fn total_injected(&self) -> u64 {
        self.injected
    }

    pub fn snapshot(&self) -> SimSnapshot {
        SimSnapshot {
            configured: self.is_configured(),
            ticks: self.ticks(),
            total_injected: self.injected,
            queues: self
                .queues
                .iter_in_order(&self.registry)
                .map(|(client, msgs)| QueueSnapshot {
                    client: client.clone(),
                    messages: msgs.iter().cloned().collect(),
                })
                .collect(),
            cores: self.cores().to_vec(),
            metrics: self.metrics(),
            processed: self.history.processed().iter().cloned().collect(),
            intervals: self.history.intervals().iter().cloned().collect(),
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(
            ClientRegistry::default(),
            SimSettings::default(),
            Arc::new(SystemClock),
        )
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

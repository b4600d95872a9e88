/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error type for the round-robin simulation.
//!
//! Steady-state conditions are **not** errors: an empty queue yields
//! `Ok(None)` from [`QueueStore::dequeue_front`] and an idle core simply
//! contributes nothing to a [`TickBatch`].  Every variant below is an API
//! contract violation by the caller and is returned immediately.
//!
//! [`QueueStore::dequeue_front`]: crate::queue::QueueStore::dequeue_front
//! [`TickBatch`]: super::TickBatch

use thiserror::Error;

use crate::client::ClientId;

/// Top-level error type returned by the [`Simulation`] API.
///
/// | Variant | Raised by |
/// |---|---|
/// | `UnknownClient` | `enqueue`, `dequeue_front`, `inject_message` |
/// | `ClientMismatch` | `enqueue` |
/// | `InvalidCoreCount` | `configure` |
/// | `AlreadyStarted` | `configure` after the first tick |
/// | `NotConfigured` | `tick`, `inject_message` before `configure` |
/// | `EmptyRegistry` / `DuplicateClient` | `ClientRegistry::new` |
///
/// [`Simulation`]: crate::simulation::Simulation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// The client is not a member of the fixed [`ClientRegistry`].
    ///
    /// [`ClientRegistry`]: crate::client::ClientRegistry
    #[error("unknown client '{client}' — not in the client registry")]
    UnknownClient { client: ClientId },

    /// A message was pushed onto a queue other than its own client's.
    #[error("message for client '{message}' cannot be queued for client '{queue}'")]
    ClientMismatch { queue: ClientId, message: ClientId },

    /// `configure()` was called with a core count of zero.
    #[error("invalid core count {0} — at least one core is required")]
    InvalidCoreCount(usize),

    /// `configure()` was called after the scheduler already ran.
    #[error("simulation already started ({ticks} tick(s) executed) — call reset() first")]
    AlreadyStarted { ticks: u64 },

    /// `tick()` or `inject_message()` before `configure()`.
    #[error("simulation is not configured — call configure() first")]
    NotConfigured,

    /// A registry needs at least one client to rotate over.
    #[error("client registry is empty")]
    EmptyRegistry,

    /// The same client name appears twice in the rotation order.
    #[error("client '{client}' appears more than once in the registry")]
    DuplicateClient { client: ClientId },
}

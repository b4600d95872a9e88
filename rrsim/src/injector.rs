/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Random message producer.
//!
//! Picks a client and a message kind uniformly at random.  Seeded injectors
//! produce the same sequence every run, which the driver tests rely on.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::client::{ClientId, ClientRegistry};
use crate::message::MessageKind;

#[derive(Debug, Clone)]
pub struct Injector {
    rng: StdRng,
}

impl Injector {
    /// Deterministic injector.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Injector seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded when `seed` is given, otherwise from entropy.
    pub fn with_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }

    /// Uniformly random client from `registry`, `None` if it has no clients.
    pub fn pick_client(&mut self, registry: &ClientRegistry) -> Option<ClientId> {
        registry.as_slice().choose(&mut self.rng).cloned()
    }

    /// Uniformly random message kind.
    pub fn pick_kind(&mut self) -> MessageKind {
        *MessageKind::ALL
            .choose(&mut self.rng)
            .unwrap_or(&MessageKind::Ping)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Client identity and the fixed rotation order.
//!
//! The registry is built once and never changes for the lifetime of a
//! [`Simulation`](crate::simulation::Simulation).  Its order **is** the
//! round-robin order: a core whose rotation index is `i` serves
//! `registry.get(i)`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scheduler::SimError;

// ── ClientId ──────────────────────────────────────────────────────────────────

/// Name of a message producer.
///
/// A thin newtype so client names cannot be confused with message ids or
/// content strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClientId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// ── ClientRegistry ────────────────────────────────────────────────────────────

/// Client names used when no configuration supplies its own list.
pub const DEFAULT_CLIENTS: [&str; 4] = ["A", "B", "C", "D"];

/// Ordered, immutable set of clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientRegistry {
    clients: Vec<ClientId>,
}

impl ClientRegistry {
    /// Build a registry from `clients` in rotation order.
    ///
    /// # Errors
    /// [`SimError::EmptyRegistry`] for an empty list and
    /// [`SimError::DuplicateClient`] if a name repeats.
    pub fn new<I, C>(clients: I) -> Result<Self, SimError>
    where
        I: IntoIterator<Item = C>,
        C: Into<ClientId>,
    {
        let mut list: Vec<ClientId> = Vec::new();
        for client in clients {
            let client = client.into();
            if list.contains(&client) {
                return Err(SimError::DuplicateClient { client });
            }
            list.push(client);
        }
        if list.is_empty() {
            return Err(SimError::EmptyRegistry);
        }
        Ok(Self { clients: list })
    }

    /// Number of clients; the modulus for every rotation index.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Always `false` — construction rejects empty lists.
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Client at rotation position `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&ClientId> {
        self.clients.get(index)
    }

    /// Rotation position of `client`.
    pub fn position(&self, client: &ClientId) -> Option<usize> {
        self.clients.iter().position(|c| c == client)
    }

    pub fn contains(&self, client: &ClientId) -> bool {
        self.position(client).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClientId> {
        self.clients.iter()
    }

    pub fn as_slice(&self) -> &[ClientId] {
        &self.clients
    }
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self {
            clients: DEFAULT_CLIENTS.iter().map(|&c| ClientId::new(c)).collect(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_is_a_to_d_in_order() {
        let reg = ClientRegistry::default();
        let names: Vec<&str> = reg.iter().map(ClientId::as_str).collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn position_follows_insertion_order() {
        let reg = ClientRegistry::new(["x", "y", "z"]).unwrap();
        assert_eq!(reg.position(&"z".into()), Some(2));
        assert_eq!(reg.get(1).map(ClientId::as_str), Some("y"));
        assert_eq!(reg.get(3), None);
    }

    #[test]
    fn empty_registry_is_rejected() {
        let empty: [&str; 0] = [];
        assert_eq!(ClientRegistry::new(empty), Err(SimError::EmptyRegistry));
    }

    #[test]
    fn duplicate_client_is_rejected() {
        let err = ClientRegistry::new(["A", "B", "A"]).unwrap_err();
        assert_eq!(
            err,
            SimError::DuplicateClient {
                client: ClientId::new("A")
            }
        );
    }

    #[test]
    fn unknown_client_is_not_contained() {
        let reg = ClientRegistry::default();
        assert!(!reg.contains(&ClientId::new("Q")));
        assert!(reg.contains(&ClientId::new("C")));
    }
}

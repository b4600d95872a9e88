/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Per-client FIFO message queues.
//!
//! Queues are created for every registry client up front and are never added
//! or removed afterwards.  Addressing a client outside the registry is a
//! caller bug and returns [`SimError::UnknownClient`].

use std::collections::{BTreeMap, VecDeque};

use crate::client::{ClientId, ClientRegistry};
use crate::message::Message;
use crate::scheduler::SimError;

/// Mapping from client to its pending messages (head = oldest).
///
/// `BTreeMap` keeps iteration deterministic; use
/// [`iter_in_order`](Self::iter_in_order) to walk queues in rotation order.
#[derive(Debug, Clone, Default)]
pub struct QueueStore {
    queues: BTreeMap<ClientId, VecDeque<Message>>,
}

impl QueueStore {
    /// One empty queue per registry client.
    pub fn new(registry: &ClientRegistry) -> Self {
        let queues = registry
            .iter()
            .map(|c| (c.clone(), VecDeque::new()))
            .collect();
        Self { queues }
    }

    /// Append `message` to the tail of `client`'s queue.  No capacity limit.
    ///
    /// `message.client_id` must equal `client`.
    pub fn enqueue(&mut self, client: &ClientId, message: Message) -> Result<(), SimError> {
        let queue = self.queue_mut(client)?;
        if message.client_id != *client {
            return Err(SimError::ClientMismatch {
                queue: client.clone(),
                message: message.client_id,
            });
        }
        queue.push_back(message);
        Ok(())
    }

    /// Remove and return the head of `client`'s queue.
    ///
    /// `Ok(None)` means the queue is empty — the normal idle case.
    pub fn dequeue_front(&mut self, client: &ClientId) -> Result<Option<Message>, SimError> {
        Ok(self.queue_mut(client)?.pop_front())
    }

    /// Pending messages for `client`, head first.
    pub fn messages(&self, client: &ClientId) -> Result<&VecDeque<Message>, SimError> {
        self.queues
            .get(client)
            .ok_or_else(|| SimError::UnknownClient {
                client: client.clone(),
            })
    }

    /// Length of `client`'s queue (`0` for unknown clients).
    pub fn len_of(&self, client: &ClientId) -> usize {
        self.queues.get(client).map_or(0, VecDeque::len)
    }

    /// Sum of all queue lengths.
    pub fn total_len(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.values().all(VecDeque::is_empty)
    }

    /// Queues in `registry` order.
    pub fn iter_in_order<'a>(
        &'a self,
        registry: &'a ClientRegistry,
    ) -> impl Iterator<Item = (&'a ClientId, &'a VecDeque<Message>)> + 'a {
        registry
            .iter()
            .filter_map(move |c| self.queues.get_key_value(c))
    }

    /// Drop every pending message, keeping the (empty) queues.
    pub fn clear(&mut self) {
        for q in self.queues.values_mut() {
            q.clear();
        }
    }

    fn queue_mut(&mut self, client: &ClientId) -> Result<&mut VecDeque<Message>, SimError> {
        self.queues
            .get_mut(client)
            .ok_or_else(|| SimError::UnknownClient {
                client: client.clone(),
            })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageKind;

    fn msg(client: &str, content: &str) -> Message {
        Message::new(ClientId::new(client), MessageKind::Buy, content, 0)
    }

    fn store() -> QueueStore {
        QueueStore::new(&ClientRegistry::default())
    }

    #[test]
    fn new_store_has_empty_queue_per_client() {
        let s = store();
        assert!(s.is_empty());
        assert_eq!(s.total_len(), 0);
        assert!(s.messages(&"D".into()).unwrap().is_empty());
    }

    #[test]
    fn dequeue_is_fifo() {
        let mut s = store();
        let a: ClientId = "A".into();
        s.enqueue(&a, msg("A", "first")).unwrap();
        s.enqueue(&a, msg("A", "second")).unwrap();
        s.enqueue(&a, msg("A", "third")).unwrap();

        let order: Vec<String> = std::iter::from_fn(|| s.dequeue_front(&a).unwrap())
            .map(|m| m.content)
            .collect();
        assert_eq!(order, vec!["first", "second", "third"]);
    }

    #[test]
    fn dequeue_from_empty_queue_is_none_not_error() {
        let mut s = store();
        assert_eq!(s.dequeue_front(&"B".into()), Ok(None));
    }

    #[test]
    fn queues_are_independent() {
        let mut s = store();
        s.enqueue(&"A".into(), msg("A", "a1")).unwrap();
        s.enqueue(&"C".into(), msg("C", "c1")).unwrap();
        assert_eq!(s.len_of(&"A".into()), 1);
        assert_eq!(s.len_of(&"B".into()), 0);
        assert_eq!(s.len_of(&"C".into()), 1);
        assert_eq!(s.total_len(), 2);
    }

    #[test]
    fn unknown_client_fails_fast() {
        let mut s = store();
        let z: ClientId = "Z".into();
        assert_eq!(
            s.enqueue(&z, msg("Z", "x")),
            Err(SimError::UnknownClient { client: z.clone() })
        );
        assert!(s.dequeue_front(&z).is_err());
        assert!(s.messages(&z).is_err());
        assert_eq!(s.total_len(), 0, "rejected enqueue must not store anything");
    }

    #[test]
    fn message_for_another_client_is_rejected() {
        let mut s = store();
        let err = s.enqueue(&"A".into(), msg("B", "b1")).unwrap_err();
        assert_eq!(
            err,
            SimError::ClientMismatch {
                queue: "A".into(),
                message: "B".into(),
            }
        );
        assert!(s.is_empty());
    }

    #[test]
    fn iter_in_order_follows_registry_not_key_order() {
        let reg = ClientRegistry::new(["zeta", "alpha", "mu"]).unwrap();
        let s = QueueStore::new(&reg);
        let names: Vec<&str> = s.iter_in_order(&reg).map(|(c, _)| c.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mu"]);
    }

    #[test]
    fn clear_empties_all_queues() {
        let mut s = store();
        s.enqueue(&"A".into(), msg("A", "a")).unwrap();
        s.enqueue(&"B".into(), msg("B", "b")).unwrap();
        s.clear();
        assert!(s.is_empty());
        assert!(s.enqueue(&"A".into(), msg("A", "again")).is_ok());
    }
}

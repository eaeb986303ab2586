// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Card change subscription and follow-up detail queries.

use crate::audio::types::CardSnapshot;
use tracing::{debug, trace, warn};

/// Requests the pipeline issues against the audio service.
///
/// Both calls are fire-and-forget: results arrive later as session events.
pub trait AudioClient {
    /// Register the card notification handler and subscribe to card events.
    fn subscribe_cards(&mut self);

    /// Ask for the full card description of `index`.
    fn request_card_info(&mut self, index: u32);
}

/// Kind of change a card notification reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    New,
    Changed,
    Removed,
}

/// A card notification from the subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardEvent {
    pub kind: ChangeKind,
    pub index: u32,
}

impl CardEvent {
    #[cfg(test)]
    pub fn changed(index: u32) -> Self {
        Self {
            kind: ChangeKind::Changed,
            index,
        }
    }
}

/// One step of a detail query completion: zero or more cards, then a sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardQueryResult {
    Item(CardSnapshot),
    End,
    Failed(String),
}

/// Tracks subscription registration and outstanding detail queries.
#[derive(Debug, Default)]
pub struct SubscriptionPipeline {
    registered: bool,
    queries_issued: u64,
    in_flight: usize,
}

impl SubscriptionPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn is_registered(&self) -> bool {
        self.registered
    }

    #[cfg(test)]
    fn queries_issued(&self) -> u64 {
        self.queries_issued
    }

    #[cfg(test)]
    fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Register for card events. Returns false if already registered.
    pub fn on_ready(&mut self, client: &mut dyn AudioClient) -> bool {
        if self.registered {
            debug!("Card subscription already registered, skipping");
            return false;
        }
        client.subscribe_cards();
        self.registered = true;
        debug!("Subscribed to card events");
        true
    }

    /// Handle a card notification. Only property changes trigger a query;
    /// returns whether one was issued.
    pub fn on_event(&mut self, event: CardEvent, client: &mut dyn AudioClient) -> bool {
        debug!("Card event: {:?} on card {}", event.kind, event.index);

        if event.kind != ChangeKind::Changed {
            return false;
        }

        client.request_card_info(event.index);
        self.queries_issued += 1;
        self.in_flight += 1;
        trace!(
            "Card query #{} issued, {} in flight",
            self.queries_issued,
            self.in_flight
        );
        true
    }

    /// Handle one completion step of a detail query.
    ///
    /// Returns the snapshot to resolve, if the step carried one. Completions
    /// of different queries may interleave in any order.
    pub fn on_query_result(&mut self, result: CardQueryResult) -> Option<CardSnapshot> {
        match result {
            CardQueryResult::Item(card) => {
                trace!(
                    "Card info for card {} {} ({} ports)",
                    card.index,
                    card.name,
                    card.ports.len()
                );
                Some(card)
            }
            CardQueryResult::End => {
                self.in_flight = self.in_flight.saturating_sub(1);
                None
            }
            CardQueryResult::Failed(description) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                warn!("Failed to get card information: {}", description);
                None
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// In-memory client recording what was asked of the service.
    #[derive(Debug, Default)]
    pub(crate) struct FakeClient {
        pub subscribe_calls: usize,
        pub queries: Vec<u32>,
    }

    impl AudioClient for FakeClient {
        fn subscribe_cards(&mut self) {
            self.subscribe_calls += 1;
        }

        fn request_card_info(&mut self, index: u32) {
            self.queries.push(index);
        }
    }

    #[test]
    fn test_on_ready_registers_once() {
        let mut pipeline = SubscriptionPipeline::new();
        let mut client = FakeClient::default();
        assert!(pipeline.on_ready(&mut client));
        assert!(!pipeline.on_ready(&mut client));
        assert_eq!(client.subscribe_calls, 1);
        assert!(pipeline.is_registered());
    }

    #[test]
    fn test_only_changes_issue_queries() {
        let mut pipeline = SubscriptionPipeline::new();
        let mut client = FakeClient::default();

        let new = CardEvent {
            kind: ChangeKind::New,
            index: 1,
        };
        let removed = CardEvent {
            kind: ChangeKind::Removed,
            index: 1,
        };
        assert!(!pipeline.on_event(new, &mut client));
        assert!(!pipeline.on_event(removed, &mut client));
        assert!(client.queries.is_empty());

        assert!(pipeline.on_event(CardEvent::changed(1), &mut client));
        assert_eq!(client.queries, vec![1]);
    }

    #[test]
    fn test_in_flight_tracks_sentinels() {
        let mut pipeline = SubscriptionPipeline::new();
        let mut client = FakeClient::default();
        pipeline.on_event(CardEvent::changed(0), &mut client);
        pipeline.on_event(CardEvent::changed(1), &mut client);
        assert_eq!(pipeline.in_flight(), 2);

        // Second query finishes first.
        let card = CardSnapshot::new(1, "card1");
        assert_eq!(pipeline.on_query_result(CardQueryResult::Item(card.clone())), Some(card));
        assert_eq!(pipeline.in_flight(), 2);
        assert!(pipeline.on_query_result(CardQueryResult::End).is_none());
        assert!(pipeline
            .on_query_result(CardQueryResult::Failed("No such entity".into()))
            .is_none());
        assert_eq!(pipeline.in_flight(), 0);
        assert_eq!(pipeline.queries_issued(), 2);
    }

    #[test]
    fn test_empty_sequence_yields_nothing() {
        let mut pipeline = SubscriptionPipeline::new();
        assert!(pipeline.on_query_result(CardQueryResult::End).is_none());
        assert_eq!(pipeline.in_flight(), 0);
    }
}

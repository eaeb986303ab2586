// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Port monitor: reacts to session events and drives the hot-plug pipeline.
//!
//! The monitor owns all per-session state (lifecycle, subscription,
//! bindings, action sink) and is handed to the event loop by value. It never
//! blocks; every request to the audio service goes through [`AudioClient`]
//! and its result comes back as another [`SessionEvent`].

use crate::audio::session::{ExitOutcome, SessionMachine, SessionState, StateAction};
use crate::audio::subscription::{AudioClient, CardEvent, CardQueryResult, SubscriptionPipeline};
use crate::hotplug::{resolve, BindingTable, Dispatcher};
use tracing::{debug, warn};

/// Everything the event loop can report to the monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The connection changed state. `error` holds the last error description.
    StateChanged {
        state: SessionState,
        error: Option<String>,
    },
    /// The subscribe request completed.
    Subscribed(bool),
    /// A card notification arrived.
    Card(CardEvent),
    /// One completion step of a card detail query.
    CardInfo(CardQueryResult),
}

pub struct Monitor {
    session: SessionMachine,
    subscription: SubscriptionPipeline,
    bindings: BindingTable,
    dispatcher: Dispatcher,
}

impl Monitor {
    pub fn new(bindings: BindingTable, dispatcher: Dispatcher) -> Self {
        Self {
            session: SessionMachine::new(),
            subscription: SubscriptionPipeline::new(),
            bindings,
            dispatcher,
        }
    }

    #[cfg(test)]
    fn outcome(&self) -> Option<&ExitOutcome> {
        self.session.outcome()
    }

    /// Handle one event. Returns the exit outcome once the session is over.
    pub fn handle(&mut self, event: SessionEvent, client: &mut dyn AudioClient) -> Option<ExitOutcome> {
        if let Some(outcome) = self.session.outcome() {
            debug!("Session finished, dropping {:?}", event);
            return Some(outcome.clone());
        }

        match event {
            SessionEvent::StateChanged { state, error } => {
                match self.session.on_state_change(state, error.as_deref()) {
                    StateAction::Wait => {}
                    StateAction::Subscribe => {
                        self.subscription.on_ready(client);
                    }
                    StateAction::Exit(outcome) => return Some(outcome),
                }
            }
            SessionEvent::Subscribed(success) => {
                if !success {
                    warn!("Subscribing to card events failed");
                }
            }
            SessionEvent::Card(event) => {
                self.subscription.on_event(event, client);
            }
            SessionEvent::CardInfo(result) => {
                if let Some(card) = self.subscription.on_query_result(result) {
                    for port in resolve(&card, &self.bindings) {
                        if let Some(binding) = self.bindings.get(&port.name) {
                            self.dispatcher.dispatch(&port, binding);
                        }
                    }
                }
            }
        }

        None
    }

    #[cfg(test)]
    fn dispatched(&self) -> u64 {
        self.dispatcher.dispatched()
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! PulseAudio session and event loop.
//!
//! Owns the standard (single-threaded) mainloop and the context. Library
//! callbacks only push notifications into a channel; after each blocking
//! iteration the loop drains the channel and hands the events to the
//! [`Monitor`], so no component logic ever runs inside a libpulse callback.

use crate::audio::session::{ExitOutcome, SessionState};
use crate::audio::subscription::{AudioClient, CardEvent, CardQueryResult, ChangeKind};
use crate::audio::types::CardSnapshot;
use crate::monitor::{Monitor, SessionEvent};
use libpulse_binding::callbacks::ListResult;
use libpulse_binding::context::subscribe::{Facility, InterestMaskSet, Operation as SubscribeOp};
use libpulse_binding::context::{Context, FlagSet as ContextFlagSet, State as ContextState};
use libpulse_binding::error::PAErr;
use libpulse_binding::mainloop::standard::{IterateResult, Mainloop};
use std::sync::mpsc;
use thiserror::Error;
use tracing::{debug, info, trace};

#[derive(Debug, Error)]
pub enum PulseError {
    #[error("Failed to create PulseAudio mainloop")]
    MainloopCreate,
    #[error("Failed to create PulseAudio context")]
    ContextCreate,
    #[error("Failed to connect to PulseAudio: {0}")]
    Connect(String),
    #[error("PulseAudio mainloop failed: {0}")]
    Mainloop(String),
}

/// Raw notifications pushed from libpulse callbacks.
enum Notification {
    StateChanged,
    Subscribed(bool),
    Card(CardEvent),
    CardInfo(CardSnapshot),
    CardInfoEnd,
    CardInfoFailed,
}

/// Session with the audio service.
///
/// Field order matters: the context must be dropped before its mainloop.
pub struct PulseSession {
    context: Context,
    mainloop: Mainloop,
    tx: mpsc::Sender<Notification>,
    rx: mpsc::Receiver<Notification>,
    last_state: Option<SessionState>,
}

impl PulseSession {
    /// Create the mainloop and context and install the state callback.
    pub fn new(client_name: &str) -> Result<Self, PulseError> {
        let mainloop = Mainloop::new().ok_or(PulseError::MainloopCreate)?;
        let mut context = Context::new(&mainloop, client_name).ok_or(PulseError::ContextCreate)?;

        let (tx, rx) = mpsc::channel();
        let state_tx = tx.clone();
        context.set_state_callback(Some(Box::new(move || {
            let _ = state_tx.send(Notification::StateChanged);
        })));

        Ok(Self {
            context,
            mainloop,
            tx,
            rx,
            last_state: None,
        })
    }

    /// Start connecting. `None` uses the library's default server.
    pub fn connect(&mut self, server: Option<&str>) -> Result<(), PulseError> {
        info!("Connecting to {}", server.unwrap_or("default PulseAudio server"));
        self.context
            .connect(server, ContextFlagSet::NOFLAGS, None)
            .map_err(|e| PulseError::Connect(describe(e)))
    }

    /// Run the loop until the monitor reports an exit outcome.
    pub fn run(mut self, monitor: &mut Monitor) -> Result<ExitOutcome, PulseError> {
        loop {
            match self.mainloop.iterate(true) {
                IterateResult::Success(_) => {}
                IterateResult::Quit(retval) => {
                    debug!("Mainloop quit with {}", retval.0);
                    return Ok(match retval.0 {
                        0 => ExitOutcome::success(),
                        code => ExitOutcome::failure(format!("mainloop quit with {}", code)),
                    });
                }
                IterateResult::Err(e) => return Err(PulseError::Mainloop(describe(e))),
            }

            while let Ok(notification) = self.rx.try_recv() {
                let Some(event) = self.session_event(notification) else {
                    continue;
                };

                let mut client = PulseClient {
                    context: &mut self.context,
                    tx: &self.tx,
                };
                if let Some(outcome) = monitor.handle(event, &mut client) {
                    self.context.disconnect();
                    return Ok(outcome);
                }
            }
        }
    }

    /// Turn a raw notification into a monitor event, reading the context
    /// state and last error where the notification needs them.
    ///
    /// The state is read when the channel is drained, so two transitions in
    /// one iteration both report the later state; the repeat is dropped.
    fn session_event(&mut self, notification: Notification) -> Option<SessionEvent> {
        let event = match notification {
            Notification::StateChanged => {
                let state = session_state(self.context.get_state());
                if !observe_state(&mut self.last_state, state) {
                    trace!("Context state {:?} already seen", state);
                    return None;
                }
                let error = (state == SessionState::Failed).then(|| self.last_error());
                SessionEvent::StateChanged { state, error }
            }
            Notification::Subscribed(success) => SessionEvent::Subscribed(success),
            Notification::Card(event) => SessionEvent::Card(event),
            Notification::CardInfo(card) => SessionEvent::CardInfo(CardQueryResult::Item(card)),
            Notification::CardInfoEnd => SessionEvent::CardInfo(CardQueryResult::End),
            Notification::CardInfoFailed => {
                SessionEvent::CardInfo(CardQueryResult::Failed(self.last_error()))
            }
        };
        Some(event)
    }

    fn last_error(&self) -> String {
        describe(self.context.errno())
    }
}

/// [`AudioClient`] backed by the live context.
struct PulseClient<'a> {
    context: &'a mut Context,
    tx: &'a mpsc::Sender<Notification>,
}

impl AudioClient for PulseClient<'_> {
    fn subscribe_cards(&mut self) {
        let event_tx = self.tx.clone();
        self.context
            .set_subscribe_callback(Some(Box::new(move |facility, operation, index| {
                if let Some(event) = card_event(facility, operation, index) {
                    let _ = event_tx.send(Notification::Card(event));
                }
            })));

        let ack_tx = self.tx.clone();
        // Dropping the operation handle does not cancel it.
        let _ = self.context.subscribe(InterestMaskSet::CARD, move |success| {
            let _ = ack_tx.send(Notification::Subscribed(success));
        });
    }

    fn request_card_info(&mut self, index: u32) {
        trace!("Requesting card info for card {}", index);
        let info_tx = self.tx.clone();
        let _ = self
            .context
            .introspect()
            .get_card_info_by_index(index, move |result| {
                let notification =
                    card_info_notification(result, |card| CardSnapshot::from_pulse(card));
                let _ = info_tx.send(notification);
            });
    }
}

/// Map the library's context state onto the session lifecycle. Anything that
/// is not a known transit, ready or terminated state counts as a failure.
fn session_state(state: ContextState) -> SessionState {
    match state {
        ContextState::Connecting => SessionState::Connecting,
        ContextState::Authorizing => SessionState::Authorizing,
        ContextState::SettingName => SessionState::NegotiatingName,
        ContextState::Ready => SessionState::Ready,
        ContextState::Terminated => SessionState::Terminated,
        _ => SessionState::Failed,
    }
}

/// Card event for a subscription notification. Other facilities and
/// notifications without an operation are ignored.
fn card_event(
    facility: Option<Facility>,
    operation: Option<SubscribeOp>,
    index: u32,
) -> Option<CardEvent> {
    if !matches!(facility, Some(Facility::Card)) {
        return None;
    }
    let kind = match operation? {
        SubscribeOp::New => ChangeKind::New,
        SubscribeOp::Changed => ChangeKind::Changed,
        SubscribeOp::Removed => ChangeKind::Removed,
    };
    Some(CardEvent { kind, index })
}

/// One step of a card info query: a row, the end marker, or a failure.
fn card_info_notification<T>(
    result: ListResult<&T>,
    snapshot: impl FnOnce(&T) -> CardSnapshot,
) -> Notification {
    match result {
        ListResult::Item(card) => Notification::CardInfo(snapshot(card)),
        ListResult::End => Notification::CardInfoEnd,
        ListResult::Error => Notification::CardInfoFailed,
    }
}

/// Record `state` as the last one seen. Returns false if it repeats it.
fn observe_state(last: &mut Option<SessionState>, state: SessionState) -> bool {
    if *last == Some(state) {
        return false;
    }
    *last = Some(state);
    true
}

fn describe(err: PAErr) -> String {
    format!("{}", err)
}

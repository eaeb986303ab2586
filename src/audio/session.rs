// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Connection lifecycle of the audio service session.
//!
//! The machine is driven by state-change notifications from the connection.
//! It decides when to subscribe and when the process has to stop; it never
//! talks to the service itself.

use std::fmt;
use tracing::{debug, error, info};

/// Lifecycle states of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Authorizing,
    NegotiatingName,
    Ready,
    Terminated,
    Failed,
}

/// Final status the process exits with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitOutcome {
    pub code: u8,
    pub message: Option<String>,
}

impl ExitOutcome {
    pub fn success() -> Self {
        Self {
            code: 0,
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            code: 1,
            message: Some(message.into()),
        }
    }
}

impl fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "exit {} ({})", self.code, msg),
            None => write!(f, "exit {}", self.code),
        }
    }
}

/// What the caller has to do after a state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateAction {
    /// Transit state, nothing to do.
    Wait,
    /// Session became ready: register for card events.
    Subscribe,
    /// Session is over; stop the event loop with this outcome.
    Exit(ExitOutcome),
}

/// Session state machine.
#[derive(Debug, Default)]
pub struct SessionMachine {
    state: Option<SessionState>,
    outcome: Option<ExitOutcome>,
}

impl SessionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn state(&self) -> Option<SessionState> {
        self.state
    }

    /// Whether the session reached a terminal state. No callback may act on
    /// the session after this returns true.
    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<&ExitOutcome> {
        self.outcome.as_ref()
    }

    /// Apply a state-change notification.
    ///
    /// `error` is the connection's last error description, used when the
    /// session fails.
    pub fn on_state_change(&mut self, state: SessionState, error: Option<&str>) -> StateAction {
        if self.is_finished() {
            debug!("Ignoring state {:?} after session end", state);
            return StateAction::Wait;
        }

        self.state = Some(state);

        match state {
            SessionState::Connecting | SessionState::Authorizing | SessionState::NegotiatingName => {
                debug!("Session state: {:?}", state);
                StateAction::Wait
            }
            SessionState::Ready => {
                info!("Connected to audio service");
                StateAction::Subscribe
            }
            SessionState::Terminated => {
                info!("Terminating.");
                self.finish(ExitOutcome::success())
            }
            SessionState::Failed => {
                let description = error.unwrap_or("unknown error");
                error!("Connection error: {}", description);
                self.finish(ExitOutcome::failure(format!("Connection error: {}", description)))
            }
        }
    }

    fn finish(&mut self, outcome: ExitOutcome) -> StateAction {
        let outcome = self.outcome.get_or_insert(outcome).clone();
        StateAction::Exit(outcome)
    }
}

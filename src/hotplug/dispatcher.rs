// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Maps a resolved availability to the bound action.

use crate::actions::ActionSink;
use crate::audio::types::Availability;
use crate::hotplug::binding::PortBinding;
use crate::hotplug::resolver::ResolvedPort;
use tracing::{trace, warn};

pub struct Dispatcher {
    sink: Box<dyn ActionSink>,
    dispatched: u64,
}

impl Dispatcher {
    pub fn new(sink: Box<dyn ActionSink>) -> Self {
        Self {
            sink,
            dispatched: 0,
        }
    }

    /// Number of actions handed to the sink so far.
    #[cfg(test)]
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    /// Fire the action for `port`. Sink failures are logged and dropped.
    pub fn dispatch(&mut self, port: &ResolvedPort, binding: &PortBinding) {
        let result = match port.availability {
            Availability::Available => self.sink.plugged(port, binding),
            Availability::NotAvailable => self.sink.unplugged(port, binding),
            Availability::Unknown => {
                trace!("{} availability unknown, no action", port.name);
                return;
            }
        };
        self.dispatched += 1;

        if let Err(e) = result {
            warn!("{} action for {} failed: {}", self.sink.name(), port.name, e);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::actions::ActionError;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Transition recorded by [`RecordingSink`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum Fired {
        Plugged(String),
        Unplugged(String),
    }

    /// Sink that records every call into a shared log.
    #[derive(Clone, Default)]
    pub(crate) struct RecordingSink {
        pub fired: Rc<RefCell<Vec<Fired>>>,
    }

    impl ActionSink for RecordingSink {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn plugged(&mut self, port: &ResolvedPort, _binding: &PortBinding) -> Result<(), ActionError> {
            self.fired.borrow_mut().push(Fired::Plugged(port.name.clone()));
            Ok(())
        }

        fn unplugged(&mut self, port: &ResolvedPort, _binding: &PortBinding) -> Result<(), ActionError> {
            self.fired.borrow_mut().push(Fired::Unplugged(port.name.clone()));
            Ok(())
        }
    }

    struct FailingSink;

    impl ActionSink for FailingSink {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn plugged(&mut self, _port: &ResolvedPort, _binding: &PortBinding) -> Result<(), ActionError> {
            Err(std::io::Error::other("sink gone").into())
        }

        fn unplugged(&mut self, _port: &ResolvedPort, _binding: &PortBinding) -> Result<(), ActionError> {
            Err(std::io::Error::other("sink gone").into())
        }
    }

    fn port(availability: Availability) -> ResolvedPort {
        ResolvedPort {
            card_index: 0,
            name: "analog-output-headphones".to_string(),
            description: "Headphones".to_string(),
            availability,
        }
    }

    #[test]
    fn test_availability_selects_action() {
        let sink = RecordingSink::default();
        let fired = Rc::clone(&sink.fired);
        let mut dispatcher = Dispatcher::new(Box::new(sink));
        let binding = PortBinding::new("analog-output-headphones");

        dispatcher.dispatch(&port(Availability::Available), &binding);
        dispatcher.dispatch(&port(Availability::NotAvailable), &binding);
        dispatcher.dispatch(&port(Availability::Unknown), &binding);

        assert_eq!(
            *fired.borrow(),
            vec![
                Fired::Plugged("analog-output-headphones".into()),
                Fired::Unplugged("analog-output-headphones".into()),
            ]
        );
        assert_eq!(dispatcher.dispatched(), 2);
    }

    #[test]
    fn test_sink_failure_is_not_fatal() {
        let mut dispatcher = Dispatcher::new(Box::new(FailingSink));
        let binding = PortBinding::new("analog-output-headphones");
        dispatcher.dispatch(&port(Availability::Available), &binding);
        dispatcher.dispatch(&port(Availability::Available), &binding);
        assert_eq!(dispatcher.dispatched(), 2);
    }
}

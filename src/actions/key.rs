// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Key press action.

use super::{ActionError, ActionSink};
use crate::hotplug::binding::PortBinding;
use crate::hotplug::resolver::ResolvedPort;
use crate::input::{InputError, Keysym};
use tracing::{debug, info};

/// Injects key presses into the display/input service.
pub trait KeySynthesizer {
    /// Press and release `keysym`, flushed so listeners see it immediately.
    fn synthesize_key(&mut self, keysym: Keysym) -> Result<(), InputError>;
}

/// Presses the key bound to the transition, if any.
pub struct KeySink<K: KeySynthesizer> {
    keyboard: K,
}

impl<K: KeySynthesizer> KeySink<K> {
    pub fn new(keyboard: K) -> Self {
        Self { keyboard }
    }

    fn press(&mut self, port: &ResolvedPort, key: Option<Keysym>) -> Result<(), ActionError> {
        let Some(key) = key else {
            debug!("No key bound for {} ({})", port.name, port.availability);
            return Ok(());
        };
        info!(
            "Card {} port {} {}: sending {}",
            port.card_index, port.name, port.availability, key
        );
        self.keyboard.synthesize_key(key)?;
        Ok(())
    }

    #[cfg(test)]
    fn keyboard(&self) -> &K {
        &self.keyboard
    }
}

impl<K: KeySynthesizer> ActionSink for KeySink<K> {
    fn name(&self) -> &'static str {
        "key"
    }

    fn plugged(&mut self, port: &ResolvedPort, binding: &PortBinding) -> Result<(), ActionError> {
        self.press(port, binding.plugged)
    }

    fn unplugged(&mut self, port: &ResolvedPort, binding: &PortBinding) -> Result<(), ActionError> {
        self.press(port, binding.unplugged)
    }
}

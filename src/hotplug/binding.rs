// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Port-action bindings, fixed at startup.

use crate::input::Keysym;
use std::collections::HashMap;

/// What to do for one port on each transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortBinding {
    pub port: String,
    pub plugged: Option<Keysym>,
    pub unplugged: Option<Keysym>,
}

impl PortBinding {
    pub fn new(port: &str) -> Self {
        Self {
            port: port.to_string(),
            plugged: None,
            unplugged: None,
        }
    }

    pub fn with_keys(mut self, plugged: Option<Keysym>, unplugged: Option<Keysym>) -> Self {
        self.plugged = plugged;
        self.unplugged = unplugged;
        self
    }
}

/// Read-only lookup from stable port name to its binding.
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    bindings: HashMap<String, PortBinding>,
}

impl BindingTable {
    /// Build the table. Returns the offending name if a port is bound twice.
    pub fn new(bindings: impl IntoIterator<Item = PortBinding>) -> Result<Self, String> {
        let mut map = HashMap::new();
        for binding in bindings {
            if map.contains_key(&binding.port) {
                return Err(binding.port);
            }
            map.insert(binding.port.clone(), binding);
        }
        Ok(Self { bindings: map })
    }

    pub fn get(&self, port: &str) -> Option<&PortBinding> {
        self.bindings.get(port)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn port_names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let table = BindingTable::new([PortBinding::new("analog-output-headphones")]).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.get("analog-output-headphones").is_some());
        assert!(table.get("analog-output-speaker").is_none());
    }

    #[test]
    fn test_duplicate_port_rejected() {
        let err = BindingTable::new([
            PortBinding::new("analog-input-mic"),
            PortBinding::new("analog-input-mic"),
        ])
        .unwrap_err();
        assert_eq!(err, "analog-input-mic");
    }
}

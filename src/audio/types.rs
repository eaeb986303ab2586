// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Card and port snapshot types.

use libpulse_binding::context::introspect::{CardInfo, CardPortInfo};
use libpulse_binding::def::PortAvailable;
use std::fmt;

/// Presence of whatever is plugged into a port.
///
/// `Unknown` is kept distinct: it means the hardware cannot report presence,
/// not that the port is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Availability {
    Available,
    NotAvailable,
    Unknown,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::NotAvailable => "not available",
            Self::Unknown => "unknown",
        }
    }
}

impl From<PortAvailable> for Availability {
    fn from(available: PortAvailable) -> Self {
        match available {
            PortAvailable::Yes => Self::Available,
            PortAvailable::No => Self::NotAvailable,
            PortAvailable::Unknown => Self::Unknown,
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One port of a card as reported by a single detail query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSnapshot {
    /// Stable port name, e.g. `analog-output-headphones`.
    pub name: String,
    pub description: String,
    pub availability: Availability,
}

impl PortSnapshot {
    #[cfg(test)]
    pub fn new(name: &str, description: &str, availability: Availability) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            availability,
        }
    }

    fn from_pulse(port: &CardPortInfo<'_>) -> Option<Self> {
        // A port without a name cannot be bound, so it is dropped here.
        let name = port.name.as_ref()?.to_string();
        let description = port
            .description
            .as_ref()
            .map(|d| d.to_string())
            .unwrap_or_else(|| name.clone());
        Some(Self {
            name,
            description,
            availability: port.available.into(),
        })
    }
}

/// Point-in-time view of a card's ports. Consumed once, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSnapshot {
    pub index: u32,
    pub name: String,
    pub ports: Vec<PortSnapshot>,
}

impl CardSnapshot {
    #[cfg(test)]
    pub fn new(index: u32, name: &str) -> Self {
        Self {
            index,
            name: name.to_string(),
            ports: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn with_port(mut self, port: PortSnapshot) -> Self {
        self.ports.push(port);
        self
    }

    pub fn from_pulse(card: &CardInfo<'_>) -> Self {
        Self {
            index: card.index,
            name: card
                .name
                .as_ref()
                .map(|n| n.to_string())
                .unwrap_or_default(),
            ports: card.ports.iter().filter_map(PortSnapshot::from_pulse).collect(),
        }
    }
}

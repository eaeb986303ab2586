// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Picks the bound ports out of a card snapshot.
//!
//! No history is kept: every snapshot is treated as a fresh observation, so
//! repeated identical notifications resolve to the same ports again.

use crate::audio::types::{Availability, CardSnapshot};
use crate::hotplug::binding::BindingTable;
use tracing::trace;

/// A bound port and its current availability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPort {
    pub card_index: u32,
    pub name: String,
    pub description: String,
    pub availability: Availability,
}

/// Resolve every port of `card` that has a binding, in card order.
pub fn resolve(card: &CardSnapshot, bindings: &BindingTable) -> Vec<ResolvedPort> {
    card.ports
        .iter()
        .filter(|port| {
            let bound = bindings.get(&port.name).is_some();
            if !bound {
                trace!("Ignoring unbound port {} on card {}", port.name, card.index);
            }
            bound
        })
        .map(|port| ResolvedPort {
            card_index: card.index,
            name: port.name.clone(),
            description: port.description.clone(),
            availability: port.availability,
        })
        .collect()
}

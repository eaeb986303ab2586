// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Actions performed when a bound port is plugged or unplugged.
//!
//! Every variant implements [`ActionSink`]; the dispatcher only ever sees the
//! trait object, so adding a new sink does not touch the dispatch path.

pub mod key;
pub mod log;

use crate::hotplug::binding::PortBinding;
use crate::hotplug::resolver::ResolvedPort;
use crate::input::InputError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Input synthesis failed: {0}")]
    Input(#[from] InputError),
}

/// Something to do on a port transition.
pub trait ActionSink {
    /// Human-readable name for logging.
    fn name(&self) -> &'static str;

    /// The port became available.
    fn plugged(&mut self, port: &ResolvedPort, binding: &PortBinding) -> Result<(), ActionError>;

    /// The port became not available.
    fn unplugged(&mut self, port: &ResolvedPort, binding: &PortBinding) -> Result<(), ActionError>;
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Status line action.

use super::{ActionError, ActionSink};
use crate::hotplug::binding::PortBinding;
use crate::hotplug::resolver::ResolvedPort;
use std::io::{self, Write};

/// Writes `<port>: <description> (<availability>)` for every transition.
pub struct LogSink<W: Write> {
    out: W,
}

impl LogSink<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> LogSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn write_status(&mut self, port: &ResolvedPort) -> Result<(), ActionError> {
        writeln!(
            self.out,
            "\t{}: {} ({})",
            port.name, port.description, port.availability
        )?;
        self.out.flush()?;
        Ok(())
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ActionSink for LogSink<W> {
    fn name(&self) -> &'static str {
        "log"
    }

    fn plugged(&mut self, port: &ResolvedPort, _binding: &PortBinding) -> Result<(), ActionError> {
        self.write_status(port)
    }

    fn unplugged(&mut self, port: &ResolvedPort, _binding: &PortBinding) -> Result<(), ActionError> {
        self.write_status(port)
    }
}
